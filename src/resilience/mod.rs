//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to upstream (executor.rs):
//!     → session credential for this attempt (optional)
//!     → timeouts.rs (enforce per-attempt deadline)
//!     → On failure: retries.rs (classify: retry / refresh-and-retry / fail)
//!     → backoff.rs (unit * factor^k wait, task parked, not the thread)
//!     → Budget spent: ExhaustedRetries wrapping the last error
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Not-found and rate-limited responses are surfaced, never retried
//! - A rejected credential invalidates the session before the next attempt
//! - Retry policy is independent of any HTTP client

pub mod backoff;
pub mod executor;
pub mod retries;
pub mod timeouts;

pub use executor::{
    MetricsObserver, Outcome, OutcomeEvent, ResilientExecutor, RetryEvent, RetryObserver,
    RetryPolicy,
};
pub use retries::{classify, is_retryable, RetryDecision};
