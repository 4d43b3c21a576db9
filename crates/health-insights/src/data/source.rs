use super::model::{HealthRecord, TransportRecord};
use std::future::Future;

pub const HEALTH_TABLE: &str = "merged_health_pollution_data";
pub const TRANSPORT_TABLE: &str = "transport_data";

/// Read-only access to the two dashboard tables. Each call reads a whole
/// table; callers are expected to go through [`super::DatasetCache`] rather
/// than calling these on every filter change.
pub trait DataSource: Send + Sync {
    fn load_health_data(
        &self,
    ) -> impl Future<Output = Result<Vec<HealthRecord>, DataSourceError>> + Send;

    fn load_transport_data(
        &self,
    ) -> impl Future<Output = Result<Vec<TransportRecord>, DataSourceError>> + Send;

    /// Short label used in logs.
    fn describe(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("unable to reach the data store: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("query against `{table}` failed: {source}")]
    Query {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row} of `{table}` is invalid: {detail}")]
    InvalidRow {
        table: &'static str,
        row: usize,
        detail: String,
    },
}

/// Tables already held in memory, e.g. fixtures in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    health: Vec<HealthRecord>,
    transport: Vec<TransportRecord>,
}

impl InMemoryDataSource {
    pub fn new(health: Vec<HealthRecord>, transport: Vec<TransportRecord>) -> Self {
        Self { health, transport }
    }
}

impl DataSource for InMemoryDataSource {
    async fn load_health_data(&self) -> Result<Vec<HealthRecord>, DataSourceError> {
        Ok(self.health.clone())
    }

    async fn load_transport_data(&self) -> Result<Vec<TransportRecord>, DataSourceError> {
        Ok(self.transport.clone())
    }

    fn describe(&self) -> String {
        "in-memory tables".to_string()
    }
}
