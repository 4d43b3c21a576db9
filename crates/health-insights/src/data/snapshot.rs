use super::model::{HealthRecord, TransportRecord};
use super::source::{DataSource, DataSourceError, HEALTH_TABLE, TRANSPORT_TABLE};
use super::sql::parse_date;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Reads table exports named `<table>.csv` from a directory. Columns match the
/// relational tables, so `COPY … TO … CSV HEADER` output can be used as is.
#[derive(Debug, Clone)]
pub struct CsvSnapshotSource {
    dir: PathBuf,
}

impl CsvSnapshotSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }
}

impl DataSource for CsvSnapshotSource {
    async fn load_health_data(&self) -> Result<Vec<HealthRecord>, DataSourceError> {
        let bytes = tokio::fs::read(self.table_path(HEALTH_TABLE)).await?;
        parse_health(bytes.as_slice())
    }

    async fn load_transport_data(&self) -> Result<Vec<TransportRecord>, DataSourceError> {
        let bytes = tokio::fs::read(self.table_path(TRANSPORT_TABLE)).await?;
        parse_transport(bytes.as_slice())
    }

    fn describe(&self) -> String {
        format!("csv snapshot at {}", self.dir.display())
    }
}

pub(crate) fn parse_health<R: Read>(reader: R) -> Result<Vec<HealthRecord>, DataSourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<HealthRecord>().enumerate() {
        let record = row?;
        if !(1..=12).contains(&record.month) {
            return Err(DataSourceError::InvalidRow {
                table: HEALTH_TABLE,
                row: index,
                detail: format!("month {} is not between 1 and 12", record.month),
            });
        }
        records.push(record);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct TransportCsvRow {
    date: String,
    city: String,
    journeys: f64,
}

pub(crate) fn parse_transport<R: Read>(
    reader: R,
) -> Result<Vec<TransportRecord>, DataSourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<TransportCsvRow>().enumerate() {
        let row = row?;
        let date = parse_date(&row.date).ok_or_else(|| DataSourceError::InvalidRow {
            table: TRANSPORT_TABLE,
            row: index,
            detail: format!("'{}' is not a date", row.date),
        })?;
        records.push(TransportRecord::new(date, row.city, row.journeys));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    #[test]
    fn parses_health_rows_with_extra_columns() {
        let csv = "year,month,city,diagnosis_group,admission_count,avg_pollution,source\n\
2023,1,Leeds,Respiratory,104,31.5,nhs\n\
2023,2,Leeds,Respiratory,98,29.25,nhs\n";
        let records = parse_health(Cursor::new(csv)).expect("health rows parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].month, 2);
        assert_eq!(records[1].avg_pollution, 29.25);
    }

    #[test]
    fn rejects_invalid_month() {
        let csv = "year,month,city,diagnosis_group,admission_count,avg_pollution\n\
2023,14,Leeds,Respiratory,104,31.5\n";
        let error = parse_health(Cursor::new(csv)).expect_err("month 14 is invalid");
        assert!(matches!(error, DataSourceError::InvalidRow { row: 0, .. }));
    }

    #[test]
    fn parses_transport_rows_and_derives_year() {
        let csv = "date,city,journeys\n2022-12-26,Leeds,51000\n2023-01-02 00:00:00,Leeds,48210\n";
        let records = parse_transport(Cursor::new(csv)).expect("transport rows parse");
        assert_eq!(records[0].year(), 2022);
        assert_eq!(records[1].year(), 2023);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
    }

    #[test]
    fn reports_non_numeric_cells_as_csv_errors() {
        let csv = "date,city,journeys\n2023-01-02,Leeds,lots\n";
        let error = parse_transport(Cursor::new(csv)).expect_err("journeys must be numeric");
        assert!(matches!(error, DataSourceError::Csv(_)));
    }

    #[tokio::test]
    async fn missing_snapshot_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = CsvSnapshotSource::new(dir.path());
        let error = source
            .load_health_data()
            .await
            .expect_err("no snapshot written");
        assert!(matches!(error, DataSourceError::Io(_)));
    }

    #[tokio::test]
    async fn loads_both_tables_from_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(format!("{HEALTH_TABLE}.csv")),
            "year,month,city,diagnosis_group,admission_count,avg_pollution\n\
2023,1,Leeds,Respiratory,104,31.5\n",
        )
        .expect("health snapshot written");
        std::fs::write(
            dir.path().join(format!("{TRANSPORT_TABLE}.csv")),
            "date,city,journeys\n2023-01-02,Leeds,51000\n",
        )
        .expect("transport snapshot written");

        let source = CsvSnapshotSource::new(dir.path());
        let health = source.load_health_data().await.expect("health loads");
        let transport = source.load_transport_data().await.expect("transport loads");

        assert_eq!(health.len(), 1);
        assert_eq!(health[0].city, "Leeds");
        assert_eq!(transport.len(), 1);
        assert_eq!(transport[0].journeys, 51_000.0);
    }
}
