//! Runtime configuration for the dashboard binary.
//!
//! The only knob is the backend base address, read from `DASHBOARD_API_URL`
//! (a `.env` file in the working directory is honoured).

use std::path::PathBuf;

use dashboard_engine::{BackendSettings, EngineSettings, DEFAULT_BASE_URL};
use thiserror::Error;
use url::Url;

pub const API_URL_ENV: &str = "DASHBOARD_API_URL";

const DOWNLOAD_DIR: &str = "downloads";
const LOG_FILE: &str = "dashboard.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{API_URL_ENV} is not a valid URL ({value}): {reason}")]
    InvalidBaseUrl { value: String, reason: String },
    #[error("{API_URL_ENV} must use http or https, got {scheme}")]
    UnsupportedScheme { scheme: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: String,
    pub download_dir: PathBuf,
    pub log_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            Some(raw) => parse_base_url(&raw)?,
            None => DEFAULT_BASE_URL.to_string(),
        };
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Ok(Self {
            base_url,
            download_dir: cwd.join(DOWNLOAD_DIR),
            log_path: cwd.join(LOG_FILE),
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings::new(
            BackendSettings::with_base_url(self.base_url.clone()),
            self.download_dir.clone(),
        )
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
        value: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(ConfigError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}
