//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use secrecy::Secret;
use serde::{Deserialize, Serialize};

/// Default upstream model when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default upstream host for the generation API.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream generation API settings, including the credential.
    pub upstream: UpstreamConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8787").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8787".to_string(),
        }
    }
}

/// How the credential is attached to the outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialTransport {
    /// `x-goog-api-key` request header.
    #[default]
    Header,
    /// `key` query parameter.
    Query,
}

/// Upstream generation API configuration.
///
/// The credential is optional at load time: its absence is reported per
/// request rather than refusing to start, so the catch-all route keeps
/// answering healthchecks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme and host of the generation API, without a trailing path.
    pub base_url: String,

    /// Model identifier placed in the `models/{model}:generateContent` path.
    pub model: String,

    /// API key. Usually injected through `GEMINI_API_KEY`.
    pub api_key: Option<Secret<String>>,

    /// Credential transport.
    pub credential_transport: CredentialTransport,

    /// Outbound call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            credential_transport: CredentialTransport::Header,
            timeout_secs: 30,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024, // 64KiB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
