//! Credential session subsystem.
//!
//! # Data Flow
//! ```text
//! caller → CredentialSession::get_credential()
//!     → cached credential usable? (clock.rs: now < expiry - buffer) → return it
//!     → otherwise, under the refresh lock:
//!         → failure counter at threshold? → AuthLocked
//!         → authenticator.rs (mock generator or provider exchange)
//!         → store credential.rs value, reset counter
//!
//! executor observes 401 → CredentialSession::invalidate()
//! operator → CredentialSession::reset_lockout()
//! ```
//!
//! # Design Decisions
//! - Sessions are plain values owned by the composition root, never globals
//! - Time comes from an injected `Clock` so expiry boundaries are testable
//! - At most one credential exchange in flight per session

pub mod authenticator;
pub mod clock;
pub mod credential;
pub mod manager;

pub use authenticator::{Authenticator, MockAuthenticator};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::Credential;
pub use manager::{CredentialSession, SessionStatus};
