//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Cancel in-flight retries → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - One latched coordinator per process, created by the composition root
//! - Executors listen on the same coordinator so backoff waits end promptly

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
