// Server configuration from environment variables
//
// DATABASE_URL                  Postgres URL; unset runs in-memory dev mode
// DATABASE_MAX_CONNECTIONS      pool size (default: 5)
// DATABASE_ACQUIRE_TIMEOUT_SECS pool acquire timeout (default: 5)
// DATABASE_INIT_SCHEMA          create the events table on startup (default: false)
// BIND_ADDR                     HTTP listen address (default: 0.0.0.0:9000)
// API_PREFIX                    prefix for API routes, e.g. "/v1" (default: none)
// CORS_ALLOWED_ORIGINS          comma-separated origins or "*" (default: CORS off)

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::time::Duration;

use crate::storage::PoolSettings;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";

/// Cross-origin policy for the HTTP API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfig {
    /// No CORS layer (same-origin requests only)
    Disabled,
    /// Any origin, without credentials
    Any,
    /// Explicit origin list, with credentials
    Origins(Vec<HeaderValue>),
}

impl CorsConfig {
    fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Disabled;
        };
        if raw == "*" {
            return Self::Any;
        }

        let origins: Vec<HeaderValue> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(origin, "Ignoring invalid CORS origin: {}", e);
                    None
                }
            })
            .collect();
        if origins.is_empty() {
            Self::Disabled
        } else {
            Self::Origins(origins)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: Option<String>,
    pub pool: PoolSettings,
    pub init_schema: bool,
    pub bind_addr: String,
    pub api_prefix: String,
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PoolSettings::default();

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => defaults.max_connections,
        };
        let acquire_timeout = match lookup("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.trim()
                    .parse()
                    .context("DATABASE_ACQUIRE_TIMEOUT_SECS must be a number of seconds")?,
            ),
            None => defaults.acquire_timeout,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            pool: PoolSettings {
                max_connections,
                acquire_timeout,
            },
            init_schema: lookup("DATABASE_INIT_SCHEMA")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
            bind_addr: lookup("BIND_ADDR")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            api_prefix: normalize_prefix(&lookup("API_PREFIX").unwrap_or_default()),
            cors: CorsConfig::parse(lookup("CORS_ALLOWED_ORIGINS").as_deref()),
        })
    }
}

/// "api/" and "/api/" both become "/api"; blank stays blank
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
