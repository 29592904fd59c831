use std::net::SocketAddr;

use crate::errors::AppError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ALPHAVANTAGE_DOMAIN: &str = "https://www.alphavantage.co";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR {:?} is invalid: {}", bind_addr, e)))?;

        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            bind_addr,
            max_connections: max_connections(&lookup)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub domain: String,
    pub api_key: String,
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub alphavantage: AlphaVantageConfig,
    /// Six-field cron expression; `None` runs ingestion once and exits.
    pub schedule: Option<String>,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            max_connections: max_connections(&lookup)?,
            alphavantage: AlphaVantageConfig {
                domain: optional(&lookup, "ALPHAVANTAGE_DOMAIN")
                    .unwrap_or_else(|| DEFAULT_ALPHAVANTAGE_DOMAIN.to_string()),
                api_key: required(&lookup, "ALPHAVANTAGE_APIKEY")?,
                http_proxy: optional(&lookup, "http_proxy")
                    .or_else(|| optional(&lookup, "HTTP_PROXY")),
                https_proxy: optional(&lookup, "https_proxy")
                    .or_else(|| optional(&lookup, "HTTPS_PROXY")),
            },
            schedule: optional(&lookup, "INGEST_CRON"),
        })
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    optional(lookup, name).ok_or_else(|| AppError::Config(format!("{} must be set", name)))
}

fn max_connections(lookup: &impl Fn(&str) -> Option<String>) -> Result<u32, AppError> {
    match optional(lookup, "DATABASE_MAX_CONNECTIONS") {
        None => Ok(DEFAULT_MAX_CONNECTIONS),
        Some(raw) => raw.parse().map_err(|e| {
            AppError::Config(format!("DATABASE_MAX_CONNECTIONS {:?} is invalid: {}", raw, e))
        }),
    }
}
