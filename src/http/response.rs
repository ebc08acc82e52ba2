//! Error responses.
//!
//! # Responsibilities
//! - Map `GatewayError` onto HTTP status codes
//! - Render the vendor-style error body consumed by API clients
//!
//! # Design Decisions
//! - `ExhaustedRetries` reports the status of the last underlying error
//! - Cancellation uses the non-standard 499 (client closed request)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub error_code: String,
    pub message: String,
    pub severity: String,
}

/// `{ "error": { ... }, "timestamp": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn from_error(error: &GatewayError) -> Self {
        Self {
            error: ErrorDetail {
                error_code: error.error_code().to_string(),
                message: error.to_string(),
                severity: error.severity().as_str().to_string(),
            },
            timestamp: Utc::now(),
        }
    }
}

/// HTTP status for an error.
pub fn status_for(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::Authentication { .. } | GatewayError::CredentialRejected { .. } => {
            StatusCode::UNAUTHORIZED
        }
        GatewayError::AuthLocked { .. } => StatusCode::LOCKED,
        GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
        GatewayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        GatewayError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        GatewayError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        GatewayError::Transport { .. } => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::ExhaustedRetries { last, .. } => status_for(last),
        GatewayError::Cancelled => {
            StatusCode::from_u16(499).unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
        }
        GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        } else {
            tracing::warn!(error = %self, code = self.error_code(), "Request rejected");
        }
        (status, Json(ErrorBody::from_error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&GatewayError::AuthLocked { failed_attempts: 3 }),
            StatusCode::LOCKED
        );
        assert_eq!(
            status_for(&GatewayError::NotFound { resource: "x".into() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&GatewayError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&GatewayError::Cancelled).as_u16(), 499);
    }

    #[test]
    fn test_exhausted_uses_last_error() {
        let error = GatewayError::ExhaustedRetries {
            attempts: 3,
            last: Box::new(GatewayError::ServiceUnavailable {
                endpoint: "/x".into(),
                status: 503,
            }),
        };
        assert_eq!(status_for(&error), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::from_error(&GatewayError::AuthLocked { failed_attempts: 3 });
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["error"]["error_code"], "SC002");
        assert_eq!(value["error"]["severity"], "Fatal");
        assert!(value["timestamp"].is_string());
    }
}
