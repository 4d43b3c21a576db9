use super::filter::{FilteredHealthSeries, FilteredTransportSeries};
use serde::Serialize;

pub const NO_TRANSPORT_DATA: &str = "No public transport data available for this selection.";

/// Direction between the first and last value of a series.
///
/// Only a strictly larger last value counts as an increase, so a flat series
/// reads as `Decreased`.
// TODO: product review of the flat-series wording; "unchanged" may be the intended reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increased,
    Decreased,
}

impl Trend {
    pub fn between(first: f64, last: f64) -> Self {
        if last > first {
            Self::Increased
        } else {
            Self::Decreased
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Increased => "increased",
            Self::Decreased => "decreased",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthFacts {
    pub avg_admissions: i64,
    pub avg_pollution: f64,
    pub pollution_trend: Trend,
    pub admission_trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportFacts {
    pub avg_journeys: i64,
    pub trend: Trend,
}

/// Figures behind the summary block plus its rendered text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryInsight {
    pub city: String,
    pub year: i32,
    pub diagnosis_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthFacts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportFacts>,
    pub text: String,
}

pub fn summarize(
    health: &FilteredHealthSeries,
    transport: &FilteredTransportSeries,
) -> SummaryInsight {
    let selection = &health.selection;
    let health_facts = health_facts(health);
    let transport_facts = transport_facts(transport);

    let transport_line = match &transport_facts {
        Some(facts) => format!(
            "Public transport usage has **{}**, averaging **{}** journeys weekly.",
            facts.trend.label(),
            group_thousands(facts.avg_journeys)
        ),
        None => NO_TRANSPORT_DATA.to_string(),
    };

    let text = match &health_facts {
        Some(facts) => format!(
            "In **{city}**, during **{year}**, the average monthly hospital admissions for \
             **{group}** were **{admissions}**, with average pollution levels at \
             **{pollution} μg/m³**.\n\n\
             Pollution has **{pollution_trend}** and hospital admissions have \
             **{admission_trend}**, possibly indicating a connection.\n\n\
             {transport_line}",
            city = selection.city,
            year = selection.year,
            group = selection.diagnosis_group,
            admissions = group_thousands(facts.avg_admissions),
            pollution = facts.avg_pollution,
            pollution_trend = facts.pollution_trend.label(),
            admission_trend = facts.admission_trend.label(),
        ),
        None => format!(
            "No hospital admission data for **{group}** in **{city}** during **{year}** \
             for this selection.\n\n{transport_line}",
            city = selection.city,
            year = selection.year,
            group = selection.diagnosis_group,
        ),
    };

    SummaryInsight {
        city: selection.city.clone(),
        year: selection.year,
        diagnosis_group: selection.diagnosis_group.clone(),
        health: health_facts,
        transport: transport_facts,
        text,
    }
}

fn health_facts(series: &FilteredHealthSeries) -> Option<HealthFacts> {
    let first = series.rows.first()?;
    let last = series.rows.last()?;

    let admissions = mean(series.rows.iter().map(|row| row.record.admission_count))?;
    let pollution = mean(series.rows.iter().map(|row| row.record.avg_pollution))?;

    Some(HealthFacts {
        avg_admissions: admissions.round() as i64,
        avg_pollution: (pollution * 100.0).round() / 100.0,
        pollution_trend: Trend::between(first.record.avg_pollution, last.record.avg_pollution),
        admission_trend: Trend::between(
            first.record.admission_count,
            last.record.admission_count,
        ),
    })
}

fn transport_facts(series: &FilteredTransportSeries) -> Option<TransportFacts> {
    let first = series.rows.first()?;
    let last = series.rows.last()?;
    let journeys = mean(series.rows.iter().map(|row| row.journeys))?;

    Some(TransportFacts {
        avg_journeys: journeys.round() as i64,
        trend: Trend::between(first.journeys, last.journeys),
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    (count > 0).then(|| sum / count as f64)
}

/// `1234567` → `"1,234,567"`.
pub(crate) fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
