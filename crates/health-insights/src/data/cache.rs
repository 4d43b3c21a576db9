use super::model::Dataset;
use super::source::{DataSource, DataSourceError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Holds the one load of both tables shared by every page render. Filter
/// changes read from it; only [`DatasetCache::invalidate`] or a restart makes
/// the next request query the store again.
#[derive(Debug, Default)]
pub struct DatasetCache {
    slot: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached dataset, loading it from `source` on first use.
    /// Concurrent first calls issue a single load.
    pub async fn get_or_load<S: DataSource>(
        &self,
        source: &S,
    ) -> Result<Arc<Dataset>, DataSourceError> {
        if let Some(dataset) = self.slot.read().await.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let mut slot = self.slot.write().await;
        if let Some(dataset) = slot.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let health = source.load_health_data().await?;
        let transport = source.load_transport_data().await?;
        info!(
            source = %source.describe(),
            health_rows = health.len(),
            transport_rows = transport.len(),
            "dataset loaded"
        );

        let dataset = Arc::new(Dataset::new(health, transport));
        *slot = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drops the cached load. Returns whether anything was cached.
    pub async fn invalidate(&self) -> bool {
        let dropped = self.slot.write().await.take().is_some();
        if dropped {
            info!("dataset cache invalidated");
        }
        dropped
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }
}
