//! Credential exchange collaborators.
//!
//! The session decides *when* to authenticate; an [`Authenticator`] decides
//! *how*. Provider-specific network exchanges live in `providers`.

use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::BoxError;

/// Performs one credential exchange and returns the raw token.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc` by a session used from many tasks.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self) -> BoxFuture<'_, Result<String, BoxError>>;
}

/// Deterministic token generator for mock mode.
#[derive(Debug, Default)]
pub struct MockAuthenticator {
    issued: AtomicU64,
}

impl MockAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Authenticator for MockAuthenticator {
    fn authenticate(&self) -> BoxFuture<'_, Result<String, BoxError>> {
        Box::pin(async move {
            let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("mock-token-{n:06}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_tokens_are_sequential() {
        let auth = MockAuthenticator::new();
        assert_eq!(auth.authenticate().await.unwrap(), "mock-token-000001");
        assert_eq!(auth.authenticate().await.unwrap(), "mock-token-000002");
        assert_eq!(auth.issued(), 2);
    }
}
