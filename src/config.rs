//! Configuration loader for the `iotdb-reports` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Nothing else in the crate reads `env::var` for
//! settings.
//!
use std::{env, time::Duration};

use anyhow::{anyhow, Result};

use crate::reports::SensorTypeSource;

/// Parse an optional environment variable into `$ty` with a default value.
macro_rules! parse_env {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// PostgreSQL connection string for the document store.
    pub db_url: String,

    /// Port the HTTP server listens on.
    pub port: u16,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// Connect/acquire timeout for store connections.
    pub db_connect_timeout: Duration,

    /// Server-side statement timeout applied to every store query.
    pub db_statement_timeout: Duration,

    /// Where the sensor-type-per-environment report reads sensor types from.
    pub sensor_type_source: SensorTypeSource,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DATABASE_URL` – PostgreSQL connection string
///
/// Optional:
/// - `PORT` – listening port (default: 8000)
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `DB_CONNECT_TIMEOUT_SECS` – connect/acquire timeout (default: 5)
/// - `DB_STATEMENT_TIMEOUT_SECS` – per-statement timeout (default: 5)
/// - `ENV_SENSOR_TYPE_SOURCE` – `embedded` or `joined` (default: `embedded`)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|key| env::var(key).ok())
}

/// Same as [`load_from_env`] but reads variables through `lookup`.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let db_url = require_env!(lookup, "DATABASE_URL");
    let port = parse_env!(lookup, "PORT", u16, 8000);
    let db_pool_max = parse_env!(lookup, "DB_POOL_MAX", u32, 5);
    let connect_secs = parse_env!(lookup, "DB_CONNECT_TIMEOUT_SECS", u64, 5);
    let statement_secs = parse_env!(lookup, "DB_STATEMENT_TIMEOUT_SECS", u64, 5);
    let sensor_type_source = parse_env!(
        lookup,
        "ENV_SENSOR_TYPE_SOURCE",
        SensorTypeSource,
        SensorTypeSource::Embedded
    );

    if db_pool_max == 0 {
        return Err(anyhow!("Invalid DB_POOL_MAX: must be at least 1"));
    }

    Ok(Config {
        db_url,
        port,
        db_pool_max,
        db_connect_timeout: Duration::from_secs(connect_secs),
        db_statement_timeout: Duration::from_secs(statement_secs),
        sensor_type_source,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the database password while showing all other values.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL              : {}", mask_db_url(&self.db_url));
        tracing::info!("  PORT                      : {}", self.port);
        tracing::info!("  DB_POOL_MAX               : {}", self.db_pool_max);
        tracing::info!("  DB_CONNECT_TIMEOUT_SECS   : {}", self.db_connect_timeout.as_secs());
        tracing::info!("  DB_STATEMENT_TIMEOUT_SECS : {}", self.db_statement_timeout.as_secs());
        tracing::info!("  ENV_SENSOR_TYPE_SOURCE    : {}", self.sensor_type_source);
    }
}

/// Replace the password in `user:password@host` style URLs with `****`.
pub fn mask_db_url(db_url: &str) -> String {
    // ---
    let Some(at_pos) = db_url.rfind('@') else {
        return db_url.to_string();
    };
    match db_url[..at_pos].rfind(':') {
        // `postgres://host` has its only colon before the `//`
        Some(colon_pos) if !db_url[colon_pos..at_pos].starts_with("://") => {
            format!("{}:****{}", &db_url[..colon_pos], &db_url[at_pos..])
        }
        _ => db_url.to_string(),
    }
}
