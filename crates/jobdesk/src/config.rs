//! Environment-driven configuration.
//!
//! Replaces hardcoded connection settings with `DATABASE_URL` (read from the
//! environment or a `.env` file).

use crate::error::{BoardError, BoardResult};
use crate::pool;
use deadpool_postgres::Pool;

const DEFAULT_POOL_SIZE: usize = 16;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub pool_size: usize,
}

impl AppConfig {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// `DATABASE_URL` is required; `JOBDESK_POOL_SIZE` optionally overrides
    /// the pool size.
    pub fn from_env() -> BoardResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            BoardError::Connection("DATABASE_URL must be set in .env or environment".to_string())
        })?;
        let pool_size = std::env::var("JOBDESK_POOL_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);

        Ok(Self {
            database_url,
            pool_size,
        })
    }

    /// Build a connection pool from this configuration.
    pub fn create_pool(&self) -> BoardResult<Pool> {
        pool::create_pool_with_config(&self.database_url, self.pool_size)
    }
}
