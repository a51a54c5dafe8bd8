mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod models;
mod routes;
mod service;

use std::sync::Arc;

use axum::http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use config::Config;
use crate::db::db::DBClient;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use service::{
    matching_service::MatchingService,
    rental_request_service::RentalRequestService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub matching_service: Arc<MatchingService>,
    pub rental_request_service: Arc<RentalRequestService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        let matching_service = Arc::new(MatchingService::new(
            db_client_arc.clone(),
            db_client_arc.clone(),
            config.matching(),
        ));

        let rental_request_service = Arc::new(RentalRequestService::new(
            db_client_arc.clone(),
            matching_service.clone(),
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            matching_service,
            rental_request_service,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            tracing::error!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let allowed_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app_state = Arc::new(AppState::new(DBClient::new(pool), config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    tracing::info!(
        "🚀 Server is running on http://localhost:{} (pair checks: {:?}, candidate limit: {})",
        config.port,
        config.pair_check_mode,
        config.match_candidate_limit
    );

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port)).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
