use crate::config::{env_or, parse_env};
use crate::core::Result;

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            workers: num_cpus::get(),
        }
    }

    /// `SERVER_HOST`, `SERVER_PORT` and optionally `SERVER_WORKERS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            env_or("SERVER_HOST", "127.0.0.1"),
            parse_env("SERVER_PORT", "8080")?,
        );
        config.workers = parse_env("SERVER_WORKERS", &config.workers.to_string())?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
