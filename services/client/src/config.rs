//! services/client/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use reqwest::Url;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the learning-assistant backend.
    pub api_base_url: Url,
    pub log_level: Level,
    /// Maximum number of messages fetched per history load.
    pub history_limit: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_url =
            std::env::var("STUDYMATE_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let history_limit =
            std::env::var("STUDYMATE_HISTORY_LIMIT").unwrap_or_else(|_| "50".to_string());

        Self::build(api_url, log_level, history_limit)
    }

    fn build(
        api_url: String,
        log_level: String,
        history_limit: String,
    ) -> Result<Self, ConfigError> {
        let api_base_url = api_url.parse::<Url>().map_err(|e| {
            ConfigError::InvalidValue("STUDYMATE_API_URL".to_string(), e.to_string())
        })?;

        let log_level = log_level.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level),
            )
        })?;

        let history_limit = history_limit.parse::<usize>().map_err(|e| {
            ConfigError::InvalidValue("STUDYMATE_HISTORY_LIMIT".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            log_level,
            history_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_cleanly() {
        let config = Config::build(
            "http://localhost:8000".to_string(),
            "INFO".to_string(),
            "50".to_string(),
        )
        .unwrap();
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn malformed_api_url_is_rejected() {
        let err = Config::build(
            "not a url".to_string(),
            "INFO".to_string(),
            "50".to_string(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("STUDYMATE_API_URL"));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let err = Config::build(
            "http://localhost:8000".to_string(),
            "chatty".to_string(),
            "50".to_string(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("RUST_LOG"));
    }
}
