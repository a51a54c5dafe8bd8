// routes.rs
use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        hosts::{host_handler, property_match_handler},
        rental_requests::rental_request_handler,
    },
    AppState,
};

async fn health_check(Extension(app_state): Extension<Arc<AppState>>) -> Json<serde_json::Value> {
    let (size, idle) = app_state.db_client.pool_status();
    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "pool": { "size": size, "idle": idle },
        "pair_check_mode": format!("{:?}", app_state.env.pair_check_mode).to_lowercase()
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .route("/healthchecker", get(health_check))
        .nest("/rental-requests", rental_request_handler())
        .nest("/hosts", host_handler())
        .nest("/properties", property_match_handler())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new().nest("/api", api_route)
}
