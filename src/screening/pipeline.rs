//! Raw provider matches to a normalized screening result.

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::screening::models::{ScreeningResult, ScreeningStatus, Subject};
use crate::screening::risk::RiskClassifier;
use crate::screening::score::normalize_score;
use crate::screening::types::{MatchCategory, NormalizedMatch, RawMatch, RiskTier};

pub fn generate_screening_id() -> String {
    format!("SCR-{}", Uuid::new_v4())
}

/// Normalizes matches and assembles screening results.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchNormalizer {
    classifier: RiskClassifier,
}

impl MatchNormalizer {
    pub fn new(classifier: RiskClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    /// Normalize one match: score, categories, then tier.
    pub fn normalize(&self, raw: &RawMatch) -> NormalizedMatch {
        let score = normalize_score(&raw.raw_score);
        let categories: BTreeSet<MatchCategory> =
            raw.categories.iter().map(|tag| MatchCategory::parse(tag)).collect();
        let risk_tier = self.classifier.classify(&categories, score);

        NormalizedMatch {
            match_id: raw
                .id
                .clone()
                .unwrap_or_else(|| format!("MATCH-{}", generate_screening_id())),
            name: raw.name.clone(),
            score,
            risk_tier,
            categories,
            metadata: raw.metadata.clone(),
        }
    }

    /// Normalize a list of matches and compute the overall tier.
    pub fn normalize_all(&self, raw: &[RawMatch]) -> (Vec<NormalizedMatch>, RiskTier) {
        let matches: Vec<NormalizedMatch> = raw.iter().map(|m| self.normalize(m)).collect();
        let overall = self.classifier.overall(&matches);
        (matches, overall)
    }

    /// Build a result from a provider `ScreeningResponse` document.
    ///
    /// Missing fields fall back to a fresh screening id, the subject's
    /// reference id and `COMPLETED`.
    pub fn build_result(&self, response: &Value, subject: Subject) -> ScreeningResult {
        let data = response.get("ScreeningResponse").unwrap_or(&Value::Null);

        let raw: Vec<RawMatch> = data
            .get("Matches")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(RawMatch::from_vendor_record).collect())
            .unwrap_or_default();
        let (matches, highest) = self.normalize_all(&raw);

        let screening_id = data
            .get("ScreeningId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(generate_screening_id);
        let reference_id = data
            .get("ReferenceId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| subject.reference_id().to_string());
        let status = data
            .get("Status")
            .and_then(Value::as_str)
            .map(ScreeningStatus::parse)
            .unwrap_or(ScreeningStatus::Completed);

        tracing::debug!(
            screening_id = %screening_id,
            matches = matches.len(),
            highest_risk = %highest,
            "Screening response normalized"
        );

        ScreeningResult {
            screening_id,
            reference_id,
            status,
            subject,
            match_count: matches.len(),
            matches,
            highest_risk_level: highest,
            created_at: Utc::now(),
            processing_time: data.get("ProcessingTime").and_then(Value::as_f64),
        }
    }
}
