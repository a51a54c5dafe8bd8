use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::rentalrequestdtos::{CreateRentalRequestDto, RentalRequestCriteriaDto, RequestQueryDto},
    error::HttpError,
    AppState,
};

pub fn rental_request_handler() -> Router {
    Router::new()
        .route("/", post(create_rental_request))
        .route("/user/:user_id", get(get_user_rental_requests))
        .route(
            "/:request_id",
            get(get_rental_request)
                .put(update_rental_request)
                .delete(cancel_rental_request),
        )
        .route("/:request_id/fulfil", post(fulfil_rental_request))
        .route("/:request_id/matches", get(get_rental_request_matches))
}

pub async fn create_rental_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateRentalRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (request, matches) = app_state
        .rental_request_service
        .create_request(body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Rental request submitted",
            "data": {
                "rental_request": request,
                "matches": matches,
                "total_matches": matches.len()
            }
        })),
    ))
}

pub async fn get_rental_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let request = app_state
        .rental_request_service
        .get_request(request_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "rental_request": request
        }
    })))
}

pub async fn get_user_rental_requests(
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let requests = app_state
        .rental_request_service
        .list_for_user(user_id, page, limit)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "rental_requests": requests,
            "pagination": {
                "page": page,
                "limit": limit,
                "total": requests.len()
            }
        }
    })))
}

pub async fn update_rental_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<RentalRequestCriteriaDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (request, matches) = app_state
        .rental_request_service
        .update_request(request_id, body)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Rental request updated",
        "data": {
            "rental_request": request,
            "matches": matches,
            "total_matches": matches.len()
        }
    })))
}

pub async fn cancel_rental_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let request = app_state
        .rental_request_service
        .cancel_request(request_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Rental request cancelled",
        "data": {
            "rental_request": request
        }
    })))
}

pub async fn fulfil_rental_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let request = app_state
        .rental_request_service
        .mark_fulfilled(request_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Rental request marked as fulfilled",
        "data": {
            "rental_request": request
        }
    })))
}

/// Ranks the current catalog for a request. Read only; the stored matched
/// set only changes on submit and edit.
pub async fn get_rental_request_matches(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (request, matches) = app_state
        .matching_service
        .matches_for_request(request_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "request_id": request.id,
            "request_status": request.status,
            "matches": matches,
            "total": matches.len()
        }
    })))
}
