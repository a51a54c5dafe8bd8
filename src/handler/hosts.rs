use std::sync::Arc;

use axum::{extract::Path, response::IntoResponse, routing::get, Extension, Json, Router};
use uuid::Uuid;

use crate::{error::HttpError, AppState};

pub fn host_handler() -> Router {
    Router::new().route("/:host_id/matching-requests", get(get_matching_requests))
}

pub fn property_match_handler() -> Router {
    Router::new().route("/:property_id/check/:request_id", get(check_property_against_request))
}

/// Open rental requests that fit each of the host's active listings.
pub async fn get_matching_requests(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(host_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let results = app_state
        .matching_service
        .find_requests_for_host(host_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "properties": results,
            "total": results.len()
        }
    })))
}

pub async fn check_property_against_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((property_id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpError> {
    let check = app_state
        .matching_service
        .check_pair_by_ids(property_id, request_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": check
    })))
}
