//! Data pipeline behind the city health & pollution dashboard: load the two
//! tables once, filter them by the viewer's selection, jitter the charted
//! values for presentation and summarize the result.

pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod insights;
pub mod telemetry;
