//! Application configuration.
//!
//! Defaults live here as constants. [`AppConfig::from_env`] loads `.env`
//! (if any) and overrides them from `SCHOOLREPORT_*` variables; CLI flags
//! override the result.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Directory holding `schools.json`, `observations.json`, `aggregates.json`.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Per-school render budget in a batch.
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

/// HTTP server port.
pub const DEFAULT_PORT: u16 = 3000;

pub const ENV_DATA_DIR: &str = "SCHOOLREPORT_DATA_DIR";
pub const ENV_RENDERER_URL: &str = "SCHOOLREPORT_RENDERER_URL";
pub const ENV_PACING_MS: &str = "SCHOOLREPORT_PACING_MS";
pub const ENV_RENDER_TIMEOUT_SECS: &str = "SCHOOLREPORT_RENDER_TIMEOUT_SECS";
pub const ENV_PORT: &str = "SCHOOLREPORT_PORT";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// External renderer; the text renderer is used when unset.
    pub renderer_url: Option<String>,
    /// Delay between schools in a batch (zero means no pacing).
    pub pacing: Duration,
    pub render_timeout: Duration,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            renderer_url: None,
            pacing: Duration::ZERO,
            render_timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try loading .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        config.renderer_url = get(ENV_RENDERER_URL);
        if let Some(ms) = get(ENV_PACING_MS) {
            config.pacing = Duration::from_millis(parse_var(ENV_PACING_MS, &ms)?);
        }
        if let Some(secs) = get(ENV_RENDER_TIMEOUT_SECS) {
            let secs: u64 = parse_var(ENV_RENDER_TIMEOUT_SECS, &secs)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    name: ENV_RENDER_TIMEOUT_SECS.to_string(),
                    value: secs.to_string(),
                    message: "timeout must be at least 1 second".to_string(),
                });
            }
            config.render_timeout = Duration::from_secs(secs);
        }
        if let Some(port) = get(ENV_PORT) {
            config.port = parse_var(ENV_PORT, &port)?;
        }

        Ok(config)
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}
