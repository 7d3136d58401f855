//! # Configuration
//!
//! Client configuration shared by the web and terminal front ends.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

/// Default API origin used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
/// Storage key of the persisted session record.
pub const DEFAULT_STORAGE_KEY: &str = "ace_auth";
/// Route of the login entry point.
pub const LOGIN_PATH: &str = "/login";

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    /// The file extension is neither YAML nor JSON.
    #[error("unsupported configuration format; use 'yaml' or 'json'")]
    UnsupportedFormat,
    /// A value failed validation.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field or variable.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Resolved client configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the remote API, without trailing slash.
    pub api_base: String,

    /// Key under which the session record is persisted.
    pub storage_key: String,

    /// Where a forced logout sends the user.
    pub login_path: String,

    /// Logging level for the terminal client.
    pub log_level: String,

    /// Also treat error messages containing "expired token" as an
    /// authentication failure, not only HTTP 401.
    pub match_expired_message: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            login_path: LOGIN_PATH.to_string(),
            log_level: "info".to_string(),
            match_expired_message: true,
        }
    }

    /// Configuration baked into the browser bundle at compile time.
    #[must_use]
    pub fn for_browser() -> Self {
        Self {
            api_base: option_env!("EXPLORER_API_BASE")
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            ..Self::with_defaults()
        }
    }

    /// Point the configuration at another API origin.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// File values win over defaults; environment variables apply only to
    /// values the file left at their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resolved values fail [`ClientConfig::validate`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                let content = fs::read_to_string(&path)?;
                match path.extension().and_then(|ext| ext.to_str()) {
                    Some("yaml" | "yml") => serde_yml::from_str(&content)
                        .map_err(|err| ConfigError::Parse(err.to_string()))?,
                    Some("json") => serde_json::from_str(&content)
                        .map_err(|err| ConfigError::Parse(err.to_string()))?,
                    _ => return Err(ConfigError::UnsupportedFormat),
                }
            }
            None => Self::with_defaults(),
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.api_base = config.api_base.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Apply `EXPLORER_*` overrides for values still at their defaults.
    ///
    /// # Errors
    /// Returns an error if `EXPLORER_MATCH_EXPIRED_MESSAGE` is not a boolean.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::with_defaults();

        if self.api_base == defaults.api_base {
            if let Some(api_base) = lookup("EXPLORER_API_BASE") {
                self.api_base = api_base;
            }
        }
        if self.storage_key == defaults.storage_key {
            if let Some(storage_key) = lookup("EXPLORER_STORAGE_KEY") {
                self.storage_key = storage_key;
            }
        }
        if self.log_level == defaults.log_level {
            if let Some(log_level) = lookup("EXPLORER_LOG_LEVEL") {
                self.log_level = log_level;
            }
        }
        if self.match_expired_message == defaults.match_expired_message {
            if let Some(flag) = lookup("EXPLORER_MATCH_EXPIRED_MESSAGE") {
                self.match_expired_message =
                    flag.trim().parse().map_err(|_| ConfigError::Invalid {
                        field: "EXPLORER_MATCH_EXPIRED_MESSAGE",
                        reason: format!("expected true or false, got '{flag}'"),
                    })?;
            }
        }

        Ok(())
    }

    /// Validate the resolved values.
    ///
    /// # Errors
    /// Returns an error when `api_base` is not an absolute http(s) URL or the
    /// storage key is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_base).map_err(|err| ConfigError::Invalid {
            field: "api_base",
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "api_base",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
