use crate::data::{FilterSelection, HealthRecord, TransportRecord};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

/// A health record placed on the time axis at the first day of its month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedHealthRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub record: HealthRecord,
}

/// Health records of one selection, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredHealthSeries {
    pub selection: FilterSelection,
    pub rows: Vec<DatedHealthRecord>,
}

impl FilteredHealthSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Transport records of one (year, city) pair, in load order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredTransportSeries {
    pub year: i32,
    pub city: String,
    pub rows: Vec<TransportRecord>,
}

impl FilteredTransportSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn filter_health(data: &[HealthRecord], selection: &FilterSelection) -> FilteredHealthSeries {
    let mut rows: Vec<DatedHealthRecord> = data
        .iter()
        .filter(|record| {
            record.year == selection.year
                && record.city == selection.city
                && record.diagnosis_group == selection.diagnosis_group
        })
        .filter_map(|record| match record.period_start() {
            Some(date) => Some(DatedHealthRecord {
                date,
                record: record.clone(),
            }),
            None => {
                warn!(
                    year = record.year,
                    month = record.month,
                    "skipping health record without a valid period"
                );
                None
            }
        })
        .collect();

    // stable: rows sharing a month keep load order
    rows.sort_by_key(|row| row.date);

    FilteredHealthSeries {
        selection: selection.clone(),
        rows,
    }
}

pub fn filter_transport(data: &[TransportRecord], year: i32, city: &str) -> FilteredTransportSeries {
    let rows = data
        .iter()
        .filter(|record| record.year() == year && record.city == city)
        .cloned()
        .collect();

    FilteredTransportSeries {
        year,
        city: city.to_string(),
        rows,
    }
}
