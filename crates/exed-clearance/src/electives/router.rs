use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::service::{ClearanceService, ServiceError};

/// Router exposing the course list and per-course clearance tables.
pub fn clearance_router(service: Arc<ClearanceService>) -> Router {
    Router::new()
        .route("/api/v1/courses", get(courses_handler))
        .route("/api/v1/courses/:code/clearance", get(clearance_handler))
        .with_state(service)
}

pub(crate) async fn courses_handler(State(service): State<Arc<ClearanceService>>) -> Response {
    (StatusCode::OK, axum::Json(service.courses())).into_response()
}

pub(crate) async fn clearance_handler(
    State(service): State<Arc<ClearanceService>>,
    Path(code): Path<String>,
) -> Response {
    match service.clearance(&code) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(ServiceError::UnknownCourse(code)) => {
            let payload = json!({
                "error": "unknown course",
                "course": code,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
