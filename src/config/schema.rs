//! Configuration schema definitions.
//!
//! The four top-level fields (`path`, `key`, `uri`, `port`) are the historical
//! `config.json` layout and are required. Everything else is optional and
//! falls back to defaults.

use serde::{Deserialize, Serialize};

/// Root configuration for the dial service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialerConfig {
    /// Location of the settings document on disk.
    pub path: String,

    /// Name of the setting inside the document.
    pub key: String,

    /// Route path the dial page is served on.
    pub uri: String,

    /// Listen port.
    pub port: u16,

    /// Host part of the bind address.
    #[serde(default = "default_bind_host")]
    pub bind_host: String,

    /// Timeout configuration.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

impl DialerConfig {
    /// Minimal config for the given document, key and route.
    pub fn new(path: impl Into<String>, key: impl Into<String>, uri: impl Into<String>, port: u16) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            uri: uri.into(),
            port,
            bind_host: default_bind_host(),
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    /// Address the listener binds to (e.g. "0.0.0.0:8080").
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted request body in bytes (the POST form is tiny).
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_body_bytes: 4096 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
