//! Provider gateway library.
//!
//! REST façades in front of commercial data providers (company registry,
//! sanctions screening). The reusable core is the credential session, the
//! resilient executor and the screening normalizer; the HTTP surface and
//! provider clients compose them.

pub mod admin;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod providers;
pub mod resilience;
pub mod screening;
pub mod session;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
