//! Retry classification.
//!
//! # Responsibilities
//! - Decide whether a classified failure is worth another attempt
//! - Decide whether a failure should invalidate the credential first
//!
//! # Design Decisions
//! - Transport failures (including per-attempt timeouts) are retryable
//! - 5xx-equivalents are retryable
//! - A rejected credential is retryable once the session has been invalidated
//! - Not-found is final: asking again will not make the resource appear
//! - Rate limiting is final: retrying blind, without a retry-after signal,
//!   adds load to a limit shared by every caller
//! - Credential acquisition failures are final; the session already counted them

use crate::error::GatewayError;

/// What the executor should do with a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after backoff.
    Retry,
    /// Invalidate the credential, then try again after backoff.
    RefreshAndRetry,
    /// Surface the error immediately.
    Fail,
}

/// Classify a failed attempt.
pub fn classify(error: &GatewayError) -> RetryDecision {
    match error {
        GatewayError::Transport { .. } | GatewayError::ServiceUnavailable { .. } => {
            RetryDecision::Retry
        }
        GatewayError::CredentialRejected { .. } => RetryDecision::RefreshAndRetry,
        GatewayError::NotFound { .. }
        | GatewayError::RateLimited { .. }
        | GatewayError::Authentication { .. }
        | GatewayError::AuthLocked { .. }
        | GatewayError::Upstream { .. }
        | GatewayError::ExhaustedRetries { .. }
        | GatewayError::Cancelled
        | GatewayError::Validation(_) => RetryDecision::Fail,
    }
}

/// Shorthand for `classify(error) != Fail`.
pub fn is_retryable(error: &GatewayError) -> bool {
    classify(error) != RetryDecision::Fail
}
