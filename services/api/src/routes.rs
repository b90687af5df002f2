use crate::infra::{deserialize_checkbox, AppState};
use crate::page::{AssessmentPage, RequestEcho};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fair_report::assessment::{build_report, AssessmentRequest};
use fair_report::error::AppError;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentForm {
    #[serde(default)]
    pub(crate) pid: String,
    #[serde(default)]
    pub(crate) service_url: Option<String>,
    #[serde(default)]
    pub(crate) service_type: Option<String>,
    #[serde(default)]
    pub(crate) metric_version: Option<String>,
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub(crate) use_datacite: bool,
}

pub(crate) fn with_assessment_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/assessments",
            axum::routing::post(assessment_endpoint),
        )
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

pub(crate) async fn assessment_endpoint(
    Extension(state): Extension<AppState>,
    Json(form): Json<AssessmentForm>,
) -> Result<Json<AssessmentPage>, AppError> {
    let AssessmentForm {
        pid,
        service_url,
        service_type,
        metric_version,
        use_datacite,
    } = form;

    let request = AssessmentRequest::new(
        &pid,
        service_url.as_deref().unwrap_or_default(),
        service_type.as_deref().unwrap_or_default(),
        metric_version.as_deref().unwrap_or_default(),
        use_datacite,
        state.client.config().use_github,
    )?;

    let response = state.client.send(&request).await?;
    let report = build_report(response)?;
    info!(
        identifier = request.object_identifier(),
        results = report.result_count(),
        "assessment report ready"
    );

    Ok(Json(AssessmentPage {
        request: Some(RequestEcho::from_request(&request)),
        report,
    }))
}
