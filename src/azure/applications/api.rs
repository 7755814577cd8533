use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::server::server::AppState;

/// Header set by the bundled Swagger UI; responses to it are truncated so
/// the browser widget is not flooded with the full directory.
pub const UI_ORIGIN_HEADER: &str = "x-from-swagger-ui";
const UI_RESULT_CAP: usize = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/apps", get(all_applications))
        .route("/api/apps/{id}", get(application_by_id))
}

/// Show all applications cached in the exporter, keyed by id. Requests
/// originating from the UI get at most `UI_RESULT_CAP` entries.
async fn all_applications(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let applications = state.applications.snapshot().await;

    if headers.contains_key(UI_ORIGIN_HEADER) {
        let truncated: HashMap<_, _> = applications.into_iter().take(UI_RESULT_CAP).collect();
        return Json(truncated).into_response();
    }

    Json(applications).into_response()
}

/// Show one application by id, 404 when it is not cached.
async fn application_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.applications.get(&id).await {
        Some(application) => Json(application).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
