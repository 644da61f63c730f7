use crate::config::{parse_env, require_env};
use crate::core::{AppError, Result};
use serde::Deserialize;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

/// Connection settings for the MySQL store holding catalogs, closings and the ledger
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: require_env("DATABASE_URL")?,
            pool_size: parse_env("DATABASE_POOL_SIZE", "5")?,
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", "10")?,
        })
    }

    pub async fn create_pool(&self) -> Result<MySqlPool> {
        MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.pool_size.min(self.max_connections))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(&self.url)
            .await
            .map_err(AppError::Database)
    }

    /// Apply the schema in `migrations/`
    pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::Database(e.into()))
    }

    /// Round-trip a trivial query; used by the readiness probe
    pub async fn ping(pool: &MySqlPool) -> Result<()> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
