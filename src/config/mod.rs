use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Placeholder shipped in `.env.example`; never a usable key
const PLACEHOLDER_API_KEY: &str = "sua_chave_aqui";

/// Read `key`, falling back to `default` when unset
pub(crate) fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse `key`; a value that does not parse is a configuration error
pub(crate) fn parse_env<T: FromStr>(key: &str, default: &str) -> Result<T> {
    env_or(key, default)
        .trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", key)))
}

/// Read a variable that has no default
pub(crate) fn require_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| AppError::Configuration(format!("{} not set", key)))
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub extraction: ExtractionConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// Chat-completion endpoint used to extract ledger entries
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Argon2 hash of the key clients send in `X-API-Key`
    pub api_key_hash: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env_or("APP_ENV", "development"),
                log_level: env_or("LOG_LEVEL", "info"),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            extraction: ExtractionConfig {
                api_key: require_env("EXTRACTION_API_KEY")?,
                base_url: env_or("EXTRACTION_BASE_URL", "https://api.groq.com/openai/v1"),
                model: env_or("EXTRACTION_MODEL", "llama-3.1-8b-instant"),
                max_retries: parse_env("EXTRACTION_MAX_RETRIES", "2")?,
            },
            security: SecurityConfig {
                api_key_hash: require_env("API_KEY_HASH")?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let key = self.extraction.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(AppError::Configuration(
                "EXTRACTION_API_KEY must be set to a real key".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::Configuration(
                "Database pool must allow at least one connection".to_string(),
            ));
        }

        Ok(())
    }
}
