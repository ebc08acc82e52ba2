//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap each upstream attempt with its own deadline
//! - Turn an elapsed deadline into a retryable transport failure
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the timed-out future is dropped
//! - Timeout errors are transport errors, not fatal errors

use std::future::Future;
use std::time::Duration;

use crate::error::{GatewayError, GatewayResult};

/// Run `attempt`, failing with a transport error if it outlives `limit`.
pub async fn with_timeout<T, F>(operation: &str, limit: Duration, attempt: F) -> GatewayResult<T>
where
    F: Future<Output = GatewayResult<T>>,
{
    match tokio::time::timeout(limit, attempt).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::timeout(operation, limit)),
    }
}
