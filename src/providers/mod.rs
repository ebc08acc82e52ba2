//! Upstream provider clients.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → DnbClient / BridgerClient (validate + sanitise input)
//!     → mock fixture (mock_data.rs)  or  UpstreamClient (client.rs)
//!           → ResilientExecutor (retry, backoff, per-attempt timeout)
//!           → CredentialSession (token for the attempt, D&B only)
//!     → provider document (serde_json::Value)
//!     → screening::MatchNormalizer (screening responses only)
//! ```
//!
//! # Design Decisions
//! - Vendor field names stay inside this module and `screening::types`
//! - D&B mock mode still draws credentials from the session, so lockout
//!   behaves the same as in live mode
//! - Live screening posts JSON; there is no SOAP envelope

pub mod bridger;
pub mod client;
pub mod dnb;
pub mod mock_data;

pub use bridger::BridgerClient;
pub use client::{UpstreamClient, UpstreamRequest};
pub use dnb::{format_duns, CompanySearch, DnbAuthenticator, DnbClient, DEFAULT_PRODUCT_CODE};
