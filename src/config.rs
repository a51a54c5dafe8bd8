// config.rs
use crate::service::matching_service::{MatchingConfig, PairCheckMode};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub cors_origins: Vec<String>,
    pub match_candidate_limit: i64,
    pub pair_check_mode: PairCheckMode,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        Self::from_lookup(database_url, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(database_url: String, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8000);

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        // Candidate fetch bound for the bulk matcher
        let match_candidate_limit = lookup("MATCH_CANDIDATE_LIMIT")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(500);

        let pair_check_mode = match lookup("PAIR_CHECK_MODE") {
            Some(raw) => raw.parse::<PairCheckMode>().unwrap_or_else(|e| {
                tracing::warn!("{}; falling back to legacy pair checks", e);
                PairCheckMode::Legacy
            }),
            None => PairCheckMode::Legacy,
        };

        Config {
            database_url,
            port,
            max_connections,
            cors_origins,
            match_candidate_limit,
            pair_check_mode,
        }
    }

    pub fn matching(&self) -> MatchingConfig {
        MatchingConfig {
            candidate_limit: self.match_candidate_limit,
            pair_check_mode: self.pair_check_mode,
        }
    }
}
