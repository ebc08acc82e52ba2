//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, thresholds within the score scale)
//! - Check that live providers have usable base URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    MustBePositive { field: &'static str },

    #[error("session.validity_buffer_secs ({buffer}) must be smaller than session.token_lifetime_secs ({lifetime})")]
    BufferExceedsLifetime { buffer: u64, lifetime: u64 },

    #[error("retries.backoff_factor must be a finite number >= 1.0, got {0}")]
    InvalidBackoffFactor(f64),

    #[error("{field} must be within 0..=100, got {value}")]
    ScoreOutOfRange { field: &'static str, value: u8 },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
}

/// Check a configuration, collecting every violation.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let session = &config.session;
    if session.token_lifetime_secs == 0 {
        errors.push(ValidationError::MustBePositive { field: "session.token_lifetime_secs" });
    } else if session.validity_buffer_secs >= session.token_lifetime_secs {
        errors.push(ValidationError::BufferExceedsLifetime {
            buffer: session.validity_buffer_secs,
            lifetime: session.token_lifetime_secs,
        });
    }
    if session.max_failed_attempts == 0 {
        errors.push(ValidationError::MustBePositive { field: "session.max_failed_attempts" });
    }

    let retries = &config.retries;
    if retries.max_retries == 0 {
        errors.push(ValidationError::MustBePositive { field: "retries.max_retries" });
    }
    if !retries.backoff_factor.is_finite() || retries.backoff_factor < 1.0 {
        errors.push(ValidationError::InvalidBackoffFactor(retries.backoff_factor));
    }
    if retries.attempt_timeout_secs == 0 {
        errors.push(ValidationError::MustBePositive { field: "retries.attempt_timeout_secs" });
    }

    if config.bridger.batch_concurrency == 0 {
        errors.push(ValidationError::MustBePositive { field: "bridger.batch_concurrency" });
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::MustBePositive { field: "listener.request_timeout_secs" });
    }

    for (field, value) in [
        ("risk.pep_high_score", config.risk.pep_high_score),
        ("risk.medium_score", config.risk.medium_score),
    ] {
        if value > 100 {
            errors.push(ValidationError::ScoreOutOfRange { field, value });
        }
    }

    if !config.dnb.use_mock && Url::parse(&config.dnb.base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "dnb.base_url",
            value: config.dnb.base_url.clone(),
        });
    }
    if !config.bridger.use_mock && Url::parse(&config.bridger.base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "bridger.base_url",
            value: config.bridger.base_url.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.session.validity_buffer_secs = config.session.token_lifetime_secs;
        config.retries.max_retries = 0;
        config.retries.backoff_factor = f64::NAN;
        config.risk.medium_score = 150;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::MustBePositive { field: "retries.max_retries" }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::BufferExceedsLifetime { .. })));
    }

    #[test]
    fn test_batch_concurrency_must_be_positive() {
        let mut config = GatewayConfig::default();
        config.bridger.batch_concurrency = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MustBePositive { field: "bridger.batch_concurrency" }]
        );
    }

    #[test]
    fn test_live_provider_requires_url() {
        let mut config = GatewayConfig::default();
        config.bridger.use_mock = false;
        config.bridger.base_url = "not a url".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidUrl {
                field: "bridger.base_url",
                value: "not a url".into(),
            }]
        );
    }
}
