//! Bounded-retry execution of upstream calls.
//!
//! # Responsibilities
//! - Run a unit of work with a per-attempt deadline
//! - Retry retryable failures with exponential backoff, up to a total budget
//! - Invalidate the session credential when upstream rejects it
//! - Report every retry and the final outcome to a [`RetryObserver`]
//! - Abort promptly when the caller's context is cancelled
//!
//! # Design Decisions
//! - The executor is a plain value taking the work as a closure, so retry
//!   policy is testable without any network client
//! - Backoff waits are `tokio::time::sleep`, which parks only this task
//! - Dropping the returned future cancels the in-flight attempt or wait

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::retries::{classify, RetryDecision};
use crate::resilience::timeouts::with_timeout;
use crate::session::{Credential, CredentialSession};

/// Retry budget and timing for one executor.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_retries: u32,
    pub backoff_factor: f64,
    /// Length of one backoff time unit.
    pub backoff_unit: Duration,
    /// Deadline for each individual attempt.
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    /// Wait inserted after the `failures`-th consecutive failure.
    pub fn backoff_for(&self, failures: u32) -> Duration {
        calculate_backoff(failures, self.backoff_factor, self.backoff_unit)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor: config.backoff_factor,
            backoff_unit: Duration::from_millis(config.backoff_unit_ms),
            attempt_timeout: Duration::from_secs(config.attempt_timeout_secs),
        }
    }
}

/// A retry that is about to be scheduled.
#[derive(Debug)]
pub struct RetryEvent<'a> {
    pub operation: &'a str,
    /// The attempt that just failed (1-based).
    pub attempt: u32,
    /// How long the executor will wait before the next attempt.
    pub delay: Duration,
    pub error: &'a GatewayError,
}

/// How an `execute` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Non-retryable failure.
    Failed,
    /// Retry budget spent.
    Exhausted,
    Cancelled,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failed => "failed",
            Outcome::Exhausted => "exhausted",
            Outcome::Cancelled => "cancelled",
        }
    }
}

/// Final report for one `execute` call.
#[derive(Debug)]
pub struct OutcomeEvent<'a> {
    pub operation: &'a str,
    /// Attempts started, including the first.
    pub attempts: u32,
    pub outcome: Outcome,
    pub error: Option<&'a GatewayError>,
}

/// Receives retry and outcome reports. The executor keeps no history itself.
pub trait RetryObserver: Send + Sync {
    fn on_retry(&self, event: &RetryEvent<'_>);
    fn on_outcome(&self, event: &OutcomeEvent<'_>);
}

/// Default observer: tracing events plus Prometheus counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver;

impl RetryObserver for MetricsObserver {
    fn on_retry(&self, event: &RetryEvent<'_>) {
        tracing::warn!(
            operation = %event.operation,
            attempt = event.attempt,
            delay = ?event.delay,
            error = %event.error,
            "Upstream call failed, retrying"
        );
        metrics::record_retry(event.operation, event.error.error_code());
    }

    fn on_outcome(&self, event: &OutcomeEvent<'_>) {
        match event.error {
            Some(error) => tracing::warn!(
                operation = %event.operation,
                attempts = event.attempts,
                outcome = event.outcome.as_str(),
                error = %error,
                "Upstream call failed"
            ),
            None => tracing::debug!(
                operation = %event.operation,
                attempts = event.attempts,
                "Upstream call succeeded"
            ),
        }
        metrics::record_upstream_outcome(event.operation, event.outcome.as_str(), event.attempts);
    }
}

/// Wraps remote calls with bounded retry and exponential backoff.
#[derive(Clone)]
pub struct ResilientExecutor {
    policy: RetryPolicy,
    session: Option<Arc<CredentialSession>>,
    observer: Arc<dyn RetryObserver>,
    shutdown: Option<Shutdown>,
}

impl ResilientExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            session: None,
            observer: Arc::new(MetricsObserver),
            shutdown: None,
        }
    }

    /// Session to invalidate when upstream rejects a credential.
    pub fn with_session(mut self, session: Arc<CredentialSession>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Cancel in-flight calls when `shutdown` is triggered.
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn session(&self) -> Option<&Arc<CredentialSession>> {
        self.session.as_ref()
    }

    /// Run `work` under the retry policy. Each attempt gets its own deadline.
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut work: F) -> GatewayResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let limit = self.policy.attempt_timeout;
        self.guarded(operation, || with_timeout(operation, limit, work()))
            .await
    }

    /// Run `work` under the retry policy, giving up as soon as `cancel` resolves.
    pub async fn execute_until<T, F, Fut, C>(
        &self,
        operation: &str,
        cancel: C,
        mut work: F,
    ) -> GatewayResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
        C: Future<Output = ()>,
    {
        let limit = self.policy.attempt_timeout;
        self.run_until(operation, cancel, || with_timeout(operation, limit, work()))
            .await
    }

    /// Like [`execute`](Self::execute), but each attempt receives a credential
    /// from the session. Lockout and authentication failures end the call.
    ///
    /// The credential is obtained outside the attempt deadline; the
    /// authenticator's own timeout bounds the exchange.
    pub async fn execute_authenticated<T, F, Fut>(&self, operation: &str, work: F) -> GatewayResult<T>
    where
        F: Fn(Credential) -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let session = self.session.as_ref().ok_or_else(|| {
            GatewayError::authentication(format!("no credential session configured for {operation}"))
        })?;
        let work = &work;
        let limit = self.policy.attempt_timeout;

        self.guarded(operation, || async move {
            let credential = session.get_credential().await?;
            with_timeout(operation, limit, work(credential)).await
        })
        .await
    }

    /// Retry loop plus shutdown cancellation. Deadlines are the caller's job.
    async fn guarded<T, F, Fut>(&self, operation: &str, work: F) -> GatewayResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        match &self.shutdown {
            Some(shutdown) => self.run_until(operation, shutdown.signalled(), work).await,
            None => {
                let attempts = AtomicU32::new(0);
                self.run(operation, &attempts, work).await
            }
        }
    }

    async fn run_until<T, F, Fut, C>(&self, operation: &str, cancel: C, work: F) -> GatewayResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
        C: Future<Output = ()>,
    {
        let attempts = AtomicU32::new(0);
        tokio::select! {
            biased;
            _ = cancel => {
                let error = GatewayError::Cancelled;
                self.observer.on_outcome(&OutcomeEvent {
                    operation,
                    attempts: attempts.load(Ordering::SeqCst),
                    outcome: Outcome::Cancelled,
                    error: Some(&error),
                });
                Err(error)
            }
            result = self.run(operation, &attempts, work) => result,
        }
    }

    async fn run<T, F, Fut>(
        &self,
        operation: &str,
        attempts: &AtomicU32,
        mut work: F,
    ) -> GatewayResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let max_attempts = self.policy.max_retries.max(1);

        loop {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;

            let error = match work().await {
                Ok(value) => {
                    self.observer.on_outcome(&OutcomeEvent {
                        operation,
                        attempts: attempt,
                        outcome: Outcome::Success,
                        error: None,
                    });
                    return Ok(value);
                }
                Err(error) => error,
            };

            match classify(&error) {
                RetryDecision::Fail => {
                    self.observer.on_outcome(&OutcomeEvent {
                        operation,
                        attempts: attempt,
                        outcome: Outcome::Failed,
                        error: Some(&error),
                    });
                    return Err(error);
                }
                RetryDecision::RefreshAndRetry => {
                    if let Some(session) = &self.session {
                        session.invalidate();
                    }
                }
                RetryDecision::Retry => {}
            }

            if attempt >= max_attempts {
                let error = GatewayError::ExhaustedRetries {
                    attempts: attempt,
                    last: Box::new(error),
                };
                self.observer.on_outcome(&OutcomeEvent {
                    operation,
                    attempts: attempt,
                    outcome: Outcome::Exhausted,
                    error: Some(&error),
                });
                return Err(error);
            }

            let delay = self.policy.backoff_for(attempt);
            self.observer.on_retry(&RetryEvent {
                operation,
                attempt,
                delay,
                error: &error,
            });
            tokio::time::sleep(delay).await;
        }
    }
}

impl std::fmt::Debug for ResilientExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientExecutor")
            .field("policy", &self.policy)
            .field("session", &self.session.as_ref().map(|s| s.provider()))
            .field("cancellable", &self.shutdown.is_some())
            .finish()
    }
}
