//! Declarative chart documents (Vega-Lite v5) with their data inlined.
//! The browser page hands them to vega-embed unchanged.

use crate::insights::{FilteredHealthSeries, FilteredTransportSeries};
use serde::Serialize;
use serde_json::{json, Value};

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const ADMISSIONS_COLOR: &str = "steelblue";
const POLLUTION_COLOR: &str = "orange";
const TRANSPORT_COLOR: &str = "green";
const PANEL_HEIGHT: u32 = 300;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub admissions_vs_pollution: Value,
    pub monthly_admissions: Value,
    pub pollution_trend: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_usage: Option<Value>,
}

impl DashboardCharts {
    pub fn build(health: &FilteredHealthSeries, transport: &FilteredTransportSeries) -> Self {
        let values = health_values(health);

        Self {
            admissions_vs_pollution: admissions_vs_pollution(&values),
            monthly_admissions: monthly_admissions(&values),
            pollution_trend: pollution_trend(&values),
            transport_usage: (!transport.is_empty()).then(|| transport_usage(transport)),
        }
    }
}

fn health_values(series: &FilteredHealthSeries) -> Value {
    Value::Array(
        series
            .rows
            .iter()
            .map(|row| {
                json!({
                    "date": row.date,
                    "month": row.record.month,
                    "admission_count": row.record.admission_count,
                    "avg_pollution": row.record.avg_pollution,
                })
            })
            .collect(),
    )
}

/// Admissions and pollution over time on independent y axes.
fn admissions_vs_pollution(values: &Value) -> Value {
    json!({
        "$schema": SCHEMA,
        "title": "Pollution vs Hospital Admissions Over Time",
        "width": "container",
        "data": { "values": values },
        "encoding": { "x": { "field": "date", "type": "temporal" } },
        "layer": [
            {
                "mark": { "type": "line", "color": ADMISSIONS_COLOR },
                "encoding": {
                    "y": {
                        "field": "admission_count",
                        "type": "quantitative",
                        "axis": { "title": "Admissions" }
                    }
                }
            },
            {
                "mark": { "type": "line", "color": POLLUTION_COLOR },
                "encoding": {
                    "y": {
                        "field": "avg_pollution",
                        "type": "quantitative",
                        "axis": { "title": "Avg Pollution" }
                    }
                }
            }
        ],
        "resolve": { "scale": { "y": "independent" } }
    })
}

fn monthly_admissions(values: &Value) -> Value {
    let months: Vec<u32> = (1..=12).collect();
    json!({
        "$schema": SCHEMA,
        "title": "Monthly Hospital Admissions",
        "width": "container",
        "height": PANEL_HEIGHT,
        "data": { "values": values },
        "mark": { "type": "bar", "color": ADMISSIONS_COLOR },
        "encoding": {
            "x": { "field": "month", "type": "ordinal", "title": "Month", "sort": months },
            "y": { "field": "admission_count", "type": "quantitative", "title": "Admissions" }
        }
    })
}

fn pollution_trend(values: &Value) -> Value {
    json!({
        "$schema": SCHEMA,
        "title": "Monthly Pollution Trend",
        "width": "container",
        "height": PANEL_HEIGHT,
        "data": { "values": values },
        "mark": { "type": "area", "opacity": 0.4, "color": POLLUTION_COLOR },
        "encoding": {
            "x": { "field": "date", "type": "temporal", "title": "Date" },
            "y": { "field": "avg_pollution", "type": "quantitative", "title": "Pollution (μg/m³)" }
        }
    })
}

fn transport_usage(series: &FilteredTransportSeries) -> Value {
    let values: Vec<Value> = series
        .rows
        .iter()
        .map(|row| json!({ "date": row.date, "journeys": row.journeys }))
        .collect();

    json!({
        "$schema": SCHEMA,
        "title": "Weekly Public Transport Usage",
        "width": "container",
        "height": PANEL_HEIGHT,
        "data": { "values": values },
        "mark": { "type": "line", "color": TRANSPORT_COLOR },
        "encoding": {
            "x": { "field": "date", "type": "temporal", "title": "Week" },
            "y": { "field": "journeys", "type": "quantitative", "title": "Total Journeys" }
        }
    })
}
