use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredSource, DashboardService};
use crate::routes::{dashboard_router, with_operational_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use health_insights::config::AppConfig;
use health_insights::error::AppError;
use health_insights::telemetry::{self, LogOutput};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, LogOutput::Stdout)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = ConfiguredSource::from_config(&config).await?;
    let service = Arc::new(DashboardService::new(source, config.data.jitter_seed));
    // A store that cannot be read at startup is fatal.
    service.warm().await?;

    let app = with_operational_routes(dashboard_router(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "city health dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
