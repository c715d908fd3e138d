//! # Rotator Configuration
//!
//! Process-level settings loaded from environment variables.
//!
//! Log verbosity is the only externally tunable behaviour. Stage names, the
//! rotated field set, and the key length are fixed in [`crate::constants`].

use crate::constants::{DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL, LOG_FORMAT_ENV, LOG_LEVEL_ENV};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable text
    Text,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Rotator configuration
#[derive(Debug, Clone)]
pub struct RotatorConfig {
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: LogFormat,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::parse(DEFAULT_LOG_FORMAT),
        }
    }
}

impl RotatorConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            log_level: env_var_or_default_str(LOG_LEVEL_ENV, DEFAULT_LOG_LEVEL),
            log_format: LogFormat::parse(&env_var_or_default_str(
                LOG_FORMAT_ENV,
                DEFAULT_LOG_FORMAT,
            )),
        }
    }

    /// `tracing` filter directive for the configured level
    ///
    /// Unknown levels fall back to `info` rather than silencing the process.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        let level = self.log_level.trim().to_ascii_lowercase();
        match level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" | "off" => level,
            "warning" => "warn".to_string(),
            "critical" | "fatal" => "error".to_string(),
            _ => "info".to_string(),
        }
    }
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
