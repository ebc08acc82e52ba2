//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the provider gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, request deadline).
    pub listener: ListenerConfig,

    /// Credential lifecycle settings.
    pub session: SessionConfig,

    /// Retry and backoff policy for upstream calls.
    pub retries: RetryConfig,

    /// Score thresholds used by risk classification.
    pub risk: RiskConfig,

    /// Company registry provider (D&B Direct style).
    pub dnb: DnbConfig,

    /// Sanctions screening provider (Bridger style).
    pub bridger: BridgerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Total time allowed for one inbound request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Credential session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long an issued token is valid upstream, in seconds.
    pub token_lifetime_secs: u64,

    /// Margin subtracted from expiry before a token is treated as stale.
    pub validity_buffer_secs: u64,

    /// Consecutive authentication failures before the session locks.
    pub max_failed_attempts: u32,
}

impl SessionConfig {
    pub fn token_lifetime(&self) -> Duration {
        Duration::from_secs(self.token_lifetime_secs)
    }

    pub fn validity_buffer(&self) -> Duration {
        Duration::from_secs(self.validity_buffer_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_lifetime_secs: 86_400, // 24 hours
            validity_buffer_secs: 300,   // 5 minutes
            max_failed_attempts: 3,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first.
    pub max_retries: u32,

    /// Base of the exponential backoff.
    pub backoff_factor: f64,

    /// Length of one backoff time unit in milliseconds.
    pub backoff_unit_ms: u64,

    /// Deadline for a single attempt in seconds.
    pub attempt_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 2.0,
            backoff_unit_ms: 1000,
            attempt_timeout_secs: 30,
        }
    }
}

/// Risk classification thresholds (canonical 0-100 scores).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RiskConfig {
    /// A PEP match at or above this score is HIGH risk.
    pub pep_high_score: u8,

    /// Any match at or above this score is at least MEDIUM risk.
    pub medium_score: u8,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            pep_high_score: 90,
            medium_score: 70,
        }
    }
}

/// Company registry provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DnbConfig {
    /// Serve deterministic fixtures instead of calling upstream.
    pub use_mock: bool,

    /// Upstream base URL.
    pub base_url: String,

    pub username: String,

    pub password: String,

    /// REST API version segment (e.g. "5.0").
    pub api_version: String,

    /// Authentication API version segment (e.g. "2.0").
    pub auth_version: String,

    /// Contracted queries-per-second ceiling. Reported, not enforced.
    pub rate_limit_qps: u32,
}

impl DnbConfig {
    /// Authentication endpoint derived from the base URL.
    pub fn auth_url(&self) -> String {
        format!(
            "{}/Authentication/V{}/",
            self.base_url.trim_end_matches('/'),
            self.auth_version
        )
    }
}

impl Default for DnbConfig {
    fn default() -> Self {
        Self {
            use_mock: true,
            base_url: "https://direct.dnb.com".to_string(),
            username: "mock_user".to_string(),
            password: "mock_password".to_string(),
            api_version: "5.0".to_string(),
            auth_version: "2.0".to_string(),
            rate_limit_qps: 10,
        }
    }
}

/// Sanctions screening provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgerConfig {
    /// Serve deterministic fixtures instead of calling upstream.
    pub use_mock: bool,

    /// Upstream base URL for the JSON screening endpoints.
    pub base_url: String,

    pub username: String,

    pub password: String,

    /// Upper bound on subjects of one batch screened concurrently.
    pub batch_concurrency: usize,
}

impl Default for BridgerConfig {
    fn default() -> Self {
        Self {
            use_mock: true,
            base_url: "https://sandbox.lexisnexis.com/bridger".to_string(),
            username: "mock_user".to_string(),
            password: "mock_password".to_string(),
            batch_concurrency: 4,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

/// Placeholder key shipped in defaults; startup warns when it is still in use.
pub const PLACEHOLDER_ADMIN_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: PLACEHOLDER_ADMIN_KEY.to_string(),
        }
    }
}
