//! Typed configuration from environment variables or a TOML file.
//!
//! Loads once at startup and fails fast on malformed values. Every setting
//! is optional; unset values fall back to the controller defaults.

use crate::controller::{AutoFocusConfig, DEFAULT_INTERVAL};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Delay between a focus result and the next focus request.
    pub interval: Duration,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            otel_endpoint: None,
            log_level: "info".to_string(),
        }
    }
}

/// On-disk form, e.g. `interval_ms = 1500`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    interval_ms: Option<u64>,
    otel_endpoint: Option<String>,
    log_level: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let interval = match std::env::var("AUTOFOCUS_INTERVAL_MS") {
            Ok(raw) => parse_interval(&raw)?,
            Err(_) => DEFAULT_INTERVAL,
        };
        Ok(Self {
            interval,
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Parse configuration from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(s).map_err(|e| Error::Config(format!("invalid config: {e}")))?;
        let defaults = Self::default();
        let interval = match file.interval_ms {
            Some(0) => return Err(Error::Config("interval_ms must be positive".to_string())),
            Some(ms) => Duration::from_millis(ms),
            None => defaults.interval,
        };
        Ok(Self {
            interval,
            otel_endpoint: file.otel_endpoint,
            log_level: file.log_level.unwrap_or(defaults.log_level),
        })
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn autofocus(&self) -> AutoFocusConfig {
        AutoFocusConfig {
            interval: self.interval,
        }
    }
}

fn parse_interval(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(Error::Config(format!(
            "AUTOFOCUS_INTERVAL_MS must be a positive integer, got {raw:?}"
        ))),
        Ok(ms) => Ok(Duration::from_millis(ms)),
    }
}
