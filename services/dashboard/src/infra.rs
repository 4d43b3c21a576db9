use health_insights::config::{AppConfig, DataSourceConfig};
use health_insights::dashboard::{render_dashboard, DashboardPage};
use health_insights::data::{
    CsvSnapshotSource, DataSource, DataSourceError, DatasetCache, HealthRecord,
    SelectionOptions, SqlDataSource, TransportRecord,
};
use health_insights::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The data source picked by configuration.
pub(crate) enum ConfiguredSource {
    Sql(SqlDataSource),
    Snapshot(CsvSnapshotSource),
}

impl ConfiguredSource {
    pub(crate) async fn from_config(config: &AppConfig) -> Result<Self, DataSourceError> {
        match &config.data.source {
            DataSourceConfig::Database { url } => Ok(Self::Sql(SqlDataSource::connect(url).await?)),
            DataSourceConfig::Snapshot { dir } => Ok(Self::Snapshot(CsvSnapshotSource::new(dir))),
        }
    }
}

impl DataSource for ConfiguredSource {
    async fn load_health_data(&self) -> Result<Vec<HealthRecord>, DataSourceError> {
        match self {
            Self::Sql(source) => source.load_health_data().await,
            Self::Snapshot(source) => source.load_health_data().await,
        }
    }

    async fn load_transport_data(&self) -> Result<Vec<TransportRecord>, DataSourceError> {
        match self {
            Self::Sql(source) => source.load_transport_data().await,
            Self::Snapshot(source) => source.load_transport_data().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Sql(source) => source.describe(),
            Self::Snapshot(source) => source.describe(),
        }
    }
}

/// Selection keys as they arrive from the page or the command line. Missing
/// keys fall back to the first available option.
#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    pub(crate) year: Option<i32>,
    #[serde(default)]
    pub(crate) city: Option<String>,
    #[serde(default)]
    pub(crate) diagnosis_group: Option<String>,
}

/// Owns the source and the cached load it feeds; every page render goes
/// through here.
pub(crate) struct DashboardService<S> {
    source: S,
    cache: DatasetCache,
    jitter_seed: u64,
}

impl<S: DataSource> DashboardService<S> {
    pub(crate) fn new(source: S, jitter_seed: u64) -> Self {
        Self {
            source,
            cache: DatasetCache::new(),
            jitter_seed,
        }
    }

    pub(crate) async fn warm(&self) -> Result<(), AppError> {
        self.cache.get_or_load(&self.source).await?;
        Ok(())
    }

    pub(crate) async fn options(&self) -> Result<SelectionOptions, AppError> {
        let dataset = self.cache.get_or_load(&self.source).await?;
        Ok(dataset.selection_options())
    }

    pub(crate) async fn page(&self, query: &DashboardQuery) -> Result<DashboardPage, AppError> {
        let dataset = self.cache.get_or_load(&self.source).await?;
        let selection = dataset.selection_options().resolve(
            query.year,
            query.city.as_deref(),
            query.diagnosis_group.as_deref(),
        )?;
        Ok(render_dashboard(&dataset, &selection, self.jitter_seed))
    }

    pub(crate) async fn invalidate(&self) -> bool {
        self.cache.invalidate().await
    }
}
