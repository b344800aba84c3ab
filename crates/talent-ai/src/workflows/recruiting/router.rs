use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::JobId;
use super::filters::NewTriageFilter;
use super::service::{TriageError, TriageService};

/// Router builder exposing ranking, triage and filter configuration endpoints.
pub fn triage_router(service: Arc<TriageService>) -> Router {
    Router::new()
        .route("/api/v1/jobs/:job_id/ranking", get(ranking_handler))
        .route("/api/v1/jobs/:job_id/triage", post(triage_handler))
        .route(
            "/api/v1/jobs/:job_id/triage/results",
            get(results_handler),
        )
        .route(
            "/api/v1/jobs/:job_id/triage/statistics",
            get(statistics_handler),
        )
        .route(
            "/api/v1/triage/filters",
            post(create_filter_handler).get(list_filters_handler),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FilterQuery {
    #[serde(default)]
    pub(crate) job_id: Option<String>,
}

pub(crate) fn error_response(err: TriageError) -> Response {
    let status = match &err {
        TriageError::NotFound(_) => StatusCode::NOT_FOUND,
        TriageError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TriageError::Persistence(_) | TriageError::Unaudited { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        TriageError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

/// Run blocking service work off the async executor.
async fn blocking<T, F>(service: Arc<TriageService>, work: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&TriageService) -> Result<T, TriageError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || work(&service)).await {
        Ok(result) => result.map_err(error_response),
        Err(join_error) => {
            error!(error = %join_error, "triage worker task failed");
            let payload = json!({ "error": "triage worker task failed" });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}

pub(crate) async fn ranking_handler(
    State(service): State<Arc<TriageService>>,
    Path(job_id): Path<String>,
) -> Response {
    let job_id = JobId(job_id);
    let lookup = job_id.clone();
    match blocking(service, move |service| service.rank_candidates(&lookup)).await {
        Ok(candidates) => {
            let payload = json!({ "job_id": job_id, "candidates": candidates });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn triage_handler(
    State(service): State<Arc<TriageService>>,
    Path(job_id): Path<String>,
) -> Response {
    let job_id = JobId(job_id);
    match blocking(service, move |service| service.run_automatic_triage(&job_id)).await {
        Ok(run) => (StatusCode::OK, axum::Json(run)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn results_handler(
    State(service): State<Arc<TriageService>>,
    Path(job_id): Path<String>,
) -> Response {
    match service.triage_results(&JobId(job_id)) {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn statistics_handler(
    State(service): State<Arc<TriageService>>,
    Path(job_id): Path<String>,
) -> Response {
    let job_id = JobId(job_id);
    match blocking(service, move |service| service.triage_statistics(&job_id)).await {
        Ok(statistics) => (StatusCode::OK, axum::Json(statistics)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn create_filter_handler(
    State(service): State<Arc<TriageService>>,
    axum::Json(definition): axum::Json<NewTriageFilter>,
) -> Response {
    match service.create_filter(definition) {
        Ok(filter) => (StatusCode::CREATED, axum::Json(filter)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_filters_handler(
    State(service): State<Arc<TriageService>>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let job_id = query.job_id.map(JobId);
    match service.list_filters(job_id.as_ref()) {
        Ok(filters) => (StatusCode::OK, axum::Json(filters)).into_response(),
        Err(err) => error_response(err),
    }
}
