//! Screening normalization subsystem.
//!
//! # Data Flow
//! ```text
//! provider document (ScreeningResponse)
//!     → RawMatch::from_vendor_record (opaque field map → typed record)
//!     → score.rs (raw score of unknown scale → 0-100)
//!     → risk.rs (categories + score → RiskTier)
//!     → pipeline.rs (NormalizedMatch list + overall tier → ScreeningResult)
//! ```
//!
//! # Design Decisions
//! - Everything here is pure; no shared state, no I/O
//! - Normalization never fails, malformed scores degrade to 0
//! - Thresholds come from `RiskConfig`, never from literals in the rules
//! - No matches means LOW; UNKNOWN is left to callers whose lookup failed

pub mod models;
pub mod pipeline;
pub mod risk;
pub mod score;
pub mod types;

pub use models::{
    Address, BatchScreenRequest, BatchScreeningResult, EntityScreenRequest, Identifier,
    PersonScreenRequest, ScreeningListInfo, ScreeningResult, ScreeningStatus, Subject,
};
pub use pipeline::{generate_screening_id, MatchNormalizer};
pub use risk::{overall_tier, RiskClassifier};
pub use score::{normalize_numeric, normalize_score};
pub use types::{MatchCategory, MatchMetadata, MatchSource, NormalizedMatch, RawMatch, RiskTier};
