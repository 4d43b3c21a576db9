use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One row of `merged_health_pollution_data`: admissions for a diagnosis group
/// in a city and month, joined with the month's mean pollution reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub year: i32,
    pub month: u32,
    pub city: String,
    pub diagnosis_group: String,
    pub admission_count: f64,
    pub avg_pollution: f64,
}

impl HealthRecord {
    /// First calendar day of the record's period, or `None` for an impossible
    /// year/month pair.
    pub fn period_start(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// One row of `transport_data`. The year is derived from `date` when the
/// record is built so filters never recompute it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportRecord {
    pub date: NaiveDate,
    pub city: String,
    pub journeys: f64,
    year: i32,
}

impl TransportRecord {
    pub fn new(date: NaiveDate, city: impl Into<String>, journeys: f64) -> Self {
        Self {
            date,
            city: city.into(),
            journeys,
            year: date.year(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

/// The three keys a viewer picks from the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    pub year: i32,
    pub city: String,
    pub diagnosis_group: String,
}

impl FilterSelection {
    pub fn new(year: i32, city: impl Into<String>, diagnosis_group: impl Into<String>) -> Self {
        Self {
            year,
            city: city.into(),
            diagnosis_group: diagnosis_group.into(),
        }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.year, self.city, self.diagnosis_group)
    }
}

/// Snapshot of both tables taken by a single load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub health: Vec<HealthRecord>,
    pub transport: Vec<TransportRecord>,
}

impl Dataset {
    pub fn new(health: Vec<HealthRecord>, transport: Vec<TransportRecord>) -> Self {
        Self { health, transport }
    }

    /// Sorted distinct values of the health table's filter keys.
    pub fn selection_options(&self) -> SelectionOptions {
        let mut years = BTreeSet::new();
        let mut cities = BTreeSet::new();
        let mut diagnosis_groups = BTreeSet::new();

        for record in &self.health {
            years.insert(record.year);
            cities.insert(record.city.as_str());
            diagnosis_groups.insert(record.diagnosis_group.as_str());
        }

        SelectionOptions {
            years: years.into_iter().collect(),
            cities: cities.into_iter().map(str::to_string).collect(),
            diagnosis_groups: diagnosis_groups.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Values offered by the three selection inputs, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionOptions {
    pub years: Vec<i32>,
    pub cities: Vec<String>,
    pub diagnosis_groups: Vec<String>,
}

impl SelectionOptions {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.cities.is_empty() || self.diagnosis_groups.is_empty()
    }

    /// Fills missing keys with the first option and rejects values that were
    /// never observed in the health data.
    pub fn resolve(
        &self,
        year: Option<i32>,
        city: Option<&str>,
        diagnosis_group: Option<&str>,
    ) -> Result<FilterSelection, SelectionError> {
        if self.is_empty() {
            return Err(SelectionError::NoHealthData);
        }

        let year = match year {
            Some(year) if self.years.contains(&year) => year,
            Some(year) => return Err(SelectionError::UnknownYear(year)),
            None => self.years[0],
        };

        let city = pick(&self.cities, city)
            .map_err(|value| SelectionError::UnknownCity(value.to_string()))?;
        let diagnosis_group = pick(&self.diagnosis_groups, diagnosis_group)
            .map_err(|value| SelectionError::UnknownDiagnosisGroup(value.to_string()))?;

        Ok(FilterSelection::new(year, city, diagnosis_group))
    }
}

fn pick<'a>(options: &'a [String], requested: Option<&'a str>) -> Result<&'a str, &'a str> {
    match requested {
        Some(value) => options
            .iter()
            .find(|option| option.as_str() == value)
            .map(String::as_str)
            .ok_or(value),
        None => Ok(options[0].as_str()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no health records are loaded, nothing to select")]
    NoHealthData,
    #[error("year {0} is not in the dataset")]
    UnknownYear(i32),
    #[error("city '{0}' is not in the dataset")]
    UnknownCity(String),
    #[error("diagnosis group '{0}' is not in the dataset")]
    UnknownDiagnosisGroup(String),
}
