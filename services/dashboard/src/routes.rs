use crate::infra::{AppState, DashboardQuery, DashboardService};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use health_insights::dashboard::DashboardPage;
use health_insights::data::{DataSource, SelectionOptions};
use health_insights::error::AppError;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

const INDEX_HTML: &str = include_str!("../assets/index.html");

pub(crate) fn dashboard_router<S>(service: Arc<DashboardService<S>>) -> Router
where
    S: DataSource + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/api/v1/options", get(options_endpoint::<S>))
        .route("/api/v1/dashboard", get(dashboard_endpoint::<S>))
        .route("/api/v1/cache/invalidate", post(invalidate_endpoint::<S>))
        .with_state(service)
}

pub(crate) fn with_operational_routes(router: Router) -> Router {
    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn options_endpoint<S: DataSource>(
    State(service): State<Arc<DashboardService<S>>>,
) -> Result<Json<SelectionOptions>, AppError> {
    Ok(Json(service.options().await?))
}

async fn dashboard_endpoint<S: DataSource>(
    State(service): State<Arc<DashboardService<S>>>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardPage>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidQuery(rejection.body_text()))?;
    Ok(Json(service.page(&query).await?))
}

async fn invalidate_endpoint<S: DataSource>(
    State(service): State<Arc<DashboardService<S>>>,
) -> Json<serde_json::Value> {
    let invalidated = service.invalidate().await;
    info!(invalidated, "cache invalidation requested");
    Json(json!({ "invalidated": invalidated }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use health_insights::data::{HealthRecord, InMemoryDataSource, TransportRecord};
    use health_insights::insights::NO_TRANSPORT_DATA;
    use serde_json::Value;
    use tower::ServiceExt;

    fn weekly(raw: &str, city: &str, journeys: f64) -> TransportRecord {
        TransportRecord::new(raw.parse().expect("valid ISO date"), city, journeys)
    }

    fn health(year: i32, month: u32, city: &str, admissions: f64, pollution: f64) -> HealthRecord {
        HealthRecord {
            year,
            month,
            city: city.to_string(),
            diagnosis_group: "Respiratory".to_string(),
            admission_count: admissions,
            avg_pollution: pollution,
        }
    }

    fn router() -> Router {
        let health = vec![
            health(2023, 2, "Leeds", 1_200.0, 35.0),
            health(2023, 1, "Leeds", 1_000.0, 30.0),
            health(2023, 1, "York", 400.0, 18.0),
        ];
        let transport: Vec<TransportRecord> = vec![
            weekly("2023-01-02", "Leeds", 51_000.0),
            weekly("2023-01-09", "Leeds", 53_000.0),
        ];
        let source = InMemoryDataSource::new(health, transport);
        dashboard_router(Arc::new(DashboardService::new(source, 42)))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    #[test]
    fn index_page_writes_store_values_as_text() {
        assert!(!INDEX_HTML.contains("<option>${"));
        assert!(!INDEX_HTML.contains("${notice}"));
        assert!(INDEX_HTML.contains("option.textContent = String(value)"));
        assert!(INDEX_HTML.contains("paragraph.textContent = notice"));
        assert!(INDEX_HTML.contains("escapeHtml(page.summary.text)"));
    }

    #[tokio::test]
    async fn options_lists_sorted_values() {
        let (status, body) = get_json(router(), "/api/v1/options").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["years"], json!([2023]));
        assert_eq!(body["cities"], json!(["Leeds", "York"]));
        assert_eq!(body["diagnosis_groups"], json!(["Respiratory"]));
    }

    #[tokio::test]
    async fn dashboard_renders_selection() {
        let (status, body) = get_json(
            router(),
            "/api/v1/dashboard?year=2023&city=Leeds&diagnosis_group=Respiratory",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"]["city"], "Leeds");
        let rows = body["health"]["rows"].as_array().expect("health rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2023-01-01");
        assert_eq!(rows[1]["date"], "2023-02-01");
        assert!(body["charts"]["transport_usage"].is_object());
        assert_eq!(body["summary"]["transport"]["avg_journeys"], 52_000);
        assert_eq!(body["summary"]["transport"]["trend"], "increased");
    }

    #[tokio::test]
    async fn dashboard_defaults_missing_keys_and_flags_missing_transport() {
        let (status, body) = get_json(router(), "/api/v1/dashboard?city=York").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"]["year"], 2023);
        assert_eq!(body["selection"]["diagnosis_group"], "Respiratory");
        assert!(body["charts"].get("transport_usage").is_none());
        assert_eq!(body["notices"][0], "No transport data found for York in 2023.");
        let text = body["summary"]["text"].as_str().expect("summary text");
        assert!(text.ends_with(NO_TRANSPORT_DATA));
    }

    #[tokio::test]
    async fn unknown_city_is_a_bad_request() {
        let (status, body) = get_json(router(), "/api/v1/dashboard?city=Atlantis").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("Atlantis"));
    }

    #[tokio::test]
    async fn malformed_year_is_a_json_bad_request() {
        let (status, body) = get_json(router(), "/api/v1/dashboard?year=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().expect("error message");
        assert!(message.starts_with("invalid query:"), "{message}");
    }

    #[tokio::test]
    async fn invalidate_reports_whether_cache_was_loaded() {
        let app = router();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/cache/invalidate")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["invalidated"], false);

        let (status, _) = get_json(app.clone(), "/api/v1/options").await;
        assert_eq!(status, StatusCode::OK);

        let response = app
            .oneshot(
                Request::post("/api/v1/cache/invalidate")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["invalidated"], true);
    }
}
