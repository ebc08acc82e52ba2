//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), path from --config / GATEWAY_CONFIG
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → sections handed to session, resilience, screening, providers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Algorithm bodies never hard-code thresholds; they read these sections

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AdminConfig, BridgerConfig, DnbConfig, GatewayConfig, ListenerConfig, ObservabilityConfig,
    RetryConfig, RiskConfig, SessionConfig,
};
