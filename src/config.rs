use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use crate::domain::stats::label::LabelFormatter;

pub const BIND_ADDR_ENV: &str = "TICKET_STATS_BIND_ADDR";
pub const DATA_DIR_ENV: &str = "TICKET_STATS_DATA_DIR";
pub const LOG_DIR_ENV: &str = "TICKET_STATS_LOG_DIR";
pub const UTC_OFFSET_ENV: &str = "TICKET_STATS_UTC_OFFSET_MINUTES";
pub const API_URL_ENV: &str = "TICKET_STATS_API_URL";
pub const DEBUG_MODE_ENV: &str = "TICKET_STATS_DEBUG_MODE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: invalid socket address {value:?}")]
    BindAddr { key: &'static str, value: String },

    #[error("{key}: expected whole minutes below one day, got {value:?}")]
    UtcOffset { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    /// Daily log files are written here when set.
    pub log_dir: Option<PathBuf>,
    pub formatter: LabelFormatter,
    pub api_url: String,
    pub debug_mode: bool,
}

impl AppConfig {
    /// Load `.env` (if any), then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_map(vars: &HashMap<&str, &str>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = var(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::BindAddr {
            key: BIND_ADDR_ENV,
            value: bind_raw.clone(),
        })?;

        let formatter = match var(UTC_OFFSET_ENV) {
            None => LabelFormatter::utc(),
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .and_then(LabelFormatter::from_offset_minutes)
                .ok_or(ConfigError::UtcOffset {
                    key: UTC_OFFSET_ENV,
                    value: raw,
                })?,
        };

        Ok(Self {
            bind_addr,
            data_dir: PathBuf::from(var(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            log_dir: var(LOG_DIR_ENV).map(PathBuf::from),
            formatter,
            api_url: var(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            debug_mode: var(DEBUG_MODE_ENV)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
        })
    }
}
