use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_VALERA_API: &str = "http://localhost:3000/api/";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Base URL of the VALERA API, without a trailing slash.
    pub valera_api: String,
    pub upstream_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub logo_path: Option<PathBuf>,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let valera_api = read("VALERA_API")
            .unwrap_or_else(|| DEFAULT_VALERA_API.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if valera_api.is_empty() {
            return Err(ConfigError::Empty("VALERA_API"));
        }

        let timeout_secs: u64 = parse_number("UPSTREAM_TIMEOUT_SECS", read("UPSTREAM_TIMEOUT_SECS"), 30)?;
        let port: u16 = parse_number("EXPORT_PORT", read("EXPORT_PORT"), 7000)?;

        let cors_allowed_origins = read("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            valera_api,
            upstream_timeout: Duration::from_secs(timeout_secs),
            host: read("EXPORT_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            logo_path: read("EXPORT_LOGO_PATH").map(PathBuf::from),
            cors_allowed_origins,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
