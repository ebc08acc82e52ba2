//! Gateway error taxonomy.
//!
//! # Responsibilities
//! - Name every way an upstream call or credential exchange can fail
//! - Carry enough context (endpoint, status, cause) for logs and responses
//! - Expose vendor-style error codes and severities for API consumers
//!
//! # Design Decisions
//! - One enum for the whole crate; retry classification lives in
//!   `resilience::retries`, HTTP status mapping in `http::response`
//! - `ExhaustedRetries` boxes the last classified error rather than flattening it

use std::time::Duration;
use thiserror::Error;

/// Boxed error used for opaque causes (authenticator failures, parse errors).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the session, executor and provider clients.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credential exchange with the upstream authority failed.
    #[error("authentication failed: {source}")]
    Authentication {
        #[source]
        source: BoxError,
    },

    /// Too many consecutive authentication failures; refresh is refused.
    #[error("authentication locked after {failed_attempts} consecutive failures; operator reset required")]
    AuthLocked { failed_attempts: u32 },

    /// Upstream rejected the credential presented with a call.
    #[error("credential rejected by {endpoint}")]
    CredentialRejected { endpoint: String },

    /// Network-level failure (connect, read, per-attempt timeout).
    #[error("transport error calling {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },

    /// Requested resource does not exist upstream.
    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    /// Upstream is throttling this client.
    #[error("rate limited by {endpoint}")]
    RateLimited { endpoint: String },

    /// Upstream returned a 5xx-equivalent.
    #[error("service unavailable at {endpoint} (status {status})")]
    ServiceUnavailable { endpoint: String, status: u16 },

    /// Upstream returned a status outside the classified set.
    #[error("{endpoint} returned {status}: {body}")]
    Upstream {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Retry budget spent on retryable failures.
    #[error("gave up after {attempts} attempts: {last}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last: Box<GatewayError>,
    },

    /// The caller's context was cancelled mid-call or mid-backoff.
    #[error("operation cancelled")]
    Cancelled,

    /// Caller-supplied input failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// How loudly an error should be reported to API consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Fatal => "Fatal",
            Severity::Error => "Error",
        }
    }
}

impl GatewayError {
    /// Wrap an authenticator failure.
    pub fn authentication(source: impl Into<BoxError>) -> Self {
        GatewayError::Authentication {
            source: source.into(),
        }
    }

    /// Build a transport error for an attempt that exceeded its deadline.
    pub fn timeout(endpoint: impl Into<String>, after: Duration) -> Self {
        GatewayError::Transport {
            endpoint: endpoint.into(),
            reason: format!("timed out after {}ms", after.as_millis()),
        }
    }

    /// Stable error code, in the style of the upstream vendors' result IDs.
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Authentication { .. } | GatewayError::CredentialRejected { .. } => "SC001",
            GatewayError::AuthLocked { .. } => "SC002",
            GatewayError::Transport { .. } => "TR001",
            GatewayError::NotFound { .. } => "NF001",
            GatewayError::RateLimited { .. } => "RL001",
            GatewayError::ServiceUnavailable { .. } => "SU001",
            GatewayError::Upstream { .. } => "UP001",
            GatewayError::ExhaustedRetries { .. } => "RT001",
            GatewayError::Cancelled => "CN001",
            GatewayError::Validation(_) => "VE001",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            GatewayError::Authentication { .. } | GatewayError::AuthLocked { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::AuthLocked { failed_attempts: 3 };
        assert!(err.to_string().contains("3 consecutive failures"));

        let err = GatewayError::timeout("/v5/organizations", Duration::from_secs(30));
        assert_eq!(
            err.to_string(),
            "transport error calling /v5/organizations: timed out after 30000ms"
        );
    }

    #[test]
    fn test_exhausted_retries_keeps_last_error() {
        let err = GatewayError::ExhaustedRetries {
            attempts: 3,
            last: Box::new(GatewayError::ServiceUnavailable {
                endpoint: "/screen".into(),
                status: 503,
            }),
        };
        assert_eq!(err.error_code(), "RT001");
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("503"));
    }

    #[test]
    fn test_error_codes_and_severity() {
        let err = GatewayError::authentication("bad password");
        assert_eq!(err.error_code(), "SC001");
        assert_eq!(err.severity(), Severity::Fatal);

        let err = GatewayError::RateLimited { endpoint: "/x".into() };
        assert_eq!(err.error_code(), "RL001");
        assert_eq!(err.severity().as_str(), "Error");
    }
}
