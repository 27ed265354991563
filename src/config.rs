//! Configuration loading from TOML.
//!
//! Reads `config.toml` (or the file named by `PROGNOSIS_CONFIG`) and
//! deserializes into strongly-typed structs. Every section is optional and
//! falls back to the defaults below.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

use crate::stats::StatsSnapshot;

/// Env var naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "PROGNOSIS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    /// Replaces the compiled-in statistics snapshot when present.
    #[serde(default)]
    pub stats: Option<StatsSnapshot>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8001,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Page size for `GET /api/predictions` when `limit` is omitted.
    pub default_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// `"*"` allows any origin.
    pub allow_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".into()],
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Path from `PROGNOSIS_CONFIG`, else `config.toml`.
    pub fn default_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// The snapshot to serve: configured one, else the sample.
    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.stats.clone().unwrap_or_else(StatsSnapshot::sample)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .with_context(|| format!("Invalid server address: {addr}"))
    }
}
