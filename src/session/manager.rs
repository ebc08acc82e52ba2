//! Credential session: caching, refresh, invalidation and lockout.
//!
//! # State
//! ```text
//! Empty ──refresh ok──▶ Holding(credential) ──expiry - buffer──▶ Stale
//!   ▲                        │                                   │
//!   └──────invalidate────────┘              get_credential ◀─────┘ (refresh)
//!
//! failed_attempts >= max_failed_attempts ⇒ Locked (until reset_lockout)
//! ```
//!
//! # Design Decisions
//! - The cached credential sits behind a short-held std mutex; the refresh path
//!   is serialized by an async mutex so at most one exchange is in flight
//! - Callers that queued behind a refresh re-check the cache before refreshing
//! - The failure counter is only incremented while the refresh lock is held

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::config::SessionConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::observability::metrics;
use crate::session::authenticator::Authenticator;
use crate::session::clock::{Clock, SystemClock};
use crate::session::credential::Credential;

/// Owns one provider credential and its failure counter.
pub struct CredentialSession {
    /// Provider label used in logs and status output.
    provider: String,
    authenticator: Arc<dyn Authenticator>,
    clock: Arc<dyn Clock>,
    token_lifetime: Duration,
    validity_buffer: Duration,
    max_failed_attempts: u32,
    current: Mutex<Option<Credential>>,
    failed_attempts: AtomicU32,
    refresh_lock: tokio::sync::Mutex<()>,
}

/// Point-in-time view of a session, safe to expose (no token).
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub provider: String,
    pub has_credential: bool,
    pub credential_valid: bool,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub failed_attempts: u32,
    pub max_failed_attempts: u32,
    pub locked: bool,
}

impl CredentialSession {
    /// Create a session on the system clock.
    pub fn new(
        provider: impl Into<String>,
        config: &SessionConfig,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            provider: provider.into(),
            authenticator,
            clock: Arc::new(SystemClock),
            token_lifetime: config.token_lifetime(),
            validity_buffer: config.validity_buffer(),
            max_failed_attempts: config.max_failed_attempts,
            current: Mutex::new(None),
            failed_attempts: AtomicU32::new(0),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the time source (tests use a manual clock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Return a usable credential, refreshing it if absent or stale.
    ///
    /// Fails with [`GatewayError::AuthLocked`] without contacting the
    /// authenticator once the failure threshold has been reached.
    pub async fn get_credential(&self) -> GatewayResult<Credential> {
        self.ensure_unlocked()?;
        if let Some(credential) = self.cached_usable() {
            return Ok(credential);
        }

        let _guard = self.refresh_lock.lock().await;

        // Whoever held the lock before us may already have refreshed, or failed
        // often enough to lock the session.
        self.ensure_unlocked()?;
        if let Some(credential) = self.cached_usable() {
            return Ok(credential);
        }

        self.refresh_exclusive().await
    }

    /// Force a credential exchange regardless of the cached credential.
    pub async fn refresh(&self) -> GatewayResult<Credential> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_exclusive().await
    }

    /// Drop the cached credential so the next caller refreshes.
    ///
    /// The failure counter is left untouched.
    pub fn invalidate(&self) {
        tracing::info!(provider = %self.provider, "Invalidating current credential");
        *self.lock_current() = None;
    }

    /// Operator action: clear the failure counter.
    ///
    /// Does not obtain a credential by itself.
    pub fn reset_lockout(&self) {
        let previous = self.failed_attempts.swap(0, Ordering::SeqCst);
        tracing::warn!(
            provider = %self.provider,
            previous_failures = previous,
            "Authentication lockout reset"
        );
        metrics::record_session_locked(false);
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts.load(Ordering::SeqCst)
    }

    pub fn is_locked(&self) -> bool {
        self.failed_attempts() >= self.max_failed_attempts
    }

    /// Whether the cached credential (if any) is currently usable.
    pub fn has_valid_credential(&self) -> bool {
        self.cached_usable().is_some()
    }

    pub fn status(&self) -> SessionStatus {
        let current = self.lock_current().clone();
        let now = self.clock.now();
        SessionStatus {
            provider: self.provider.clone(),
            has_credential: current.is_some(),
            credential_valid: current
                .as_ref()
                .is_some_and(|c| c.is_usable_at(now, self.validity_buffer)),
            issued_at: current.as_ref().map(|c| DateTime::<Utc>::from(c.issued_at())),
            expires_at: current.as_ref().map(|c| DateTime::<Utc>::from(c.expires_at())),
            failed_attempts: self.failed_attempts(),
            max_failed_attempts: self.max_failed_attempts,
            locked: self.is_locked(),
        }
    }

    /// Runs the exchange. Caller must hold `refresh_lock`.
    async fn refresh_exclusive(&self) -> GatewayResult<Credential> {
        self.ensure_unlocked()?;

        tracing::info!(provider = %self.provider, "Requesting new authentication token");

        match self.authenticator.authenticate().await {
            Ok(token) => {
                let credential = Credential::new(token, self.clock.now(), self.token_lifetime);
                *self.lock_current() = Some(credential.clone());
                self.failed_attempts.store(0, Ordering::SeqCst);
                metrics::record_credential_refresh("success");
                tracing::info!(provider = %self.provider, "Obtained authentication token");
                Ok(credential)
            }
            Err(e) => {
                let failures = self.failed_attempts.fetch_add(1, Ordering::SeqCst) + 1;
                metrics::record_credential_refresh("failure");
                tracing::error!(
                    provider = %self.provider,
                    failures,
                    max_failed_attempts = self.max_failed_attempts,
                    error = %e,
                    "Authentication error"
                );
                if failures >= self.max_failed_attempts {
                    metrics::record_session_locked(true);
                    tracing::error!(
                        provider = %self.provider,
                        "Session locked after repeated authentication failures"
                    );
                }
                Err(GatewayError::authentication(e))
            }
        }
    }

    fn ensure_unlocked(&self) -> GatewayResult<()> {
        let failed_attempts = self.failed_attempts();
        if failed_attempts >= self.max_failed_attempts {
            return Err(GatewayError::AuthLocked { failed_attempts });
        }
        Ok(())
    }

    fn cached_usable(&self) -> Option<Credential> {
        let now = self.clock.now();
        self.lock_current()
            .as_ref()
            .filter(|c| c.is_usable_at(now, self.validity_buffer))
            .cloned()
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<Credential>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CredentialSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSession")
            .field("provider", &self.provider)
            .field("failed_attempts", &self.failed_attempts())
            .field("max_failed_attempts", &self.max_failed_attempts)
            .finish()
    }
}
