//! Risk tier classification for screening matches.

use std::collections::BTreeSet;

use crate::config::RiskConfig;
use crate::screening::types::{MatchCategory, NormalizedMatch, RiskTier};

/// Assigns risk tiers from category tags and canonical scores.
///
/// Per-match rules, first match wins:
/// 1. any sanctions tag → HIGH
/// 2. PEP with score ≥ `pep_high_score` → HIGH
/// 3. PEP or adverse media → MEDIUM
/// 4. score ≥ `medium_score` → MEDIUM
/// 5. otherwise → LOW
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskClassifier {
    pep_high_score: u8,
    medium_score: u8,
}

impl RiskClassifier {
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            pep_high_score: config.pep_high_score,
            medium_score: config.medium_score,
        }
    }

    /// Classify a single match.
    pub fn classify(&self, categories: &BTreeSet<MatchCategory>, score: u8) -> RiskTier {
        let is_pep = categories.contains(&MatchCategory::Pep);

        if categories.contains(&MatchCategory::Sanctions) {
            RiskTier::High
        } else if is_pep && score >= self.pep_high_score {
            RiskTier::High
        } else if is_pep || categories.contains(&MatchCategory::AdverseMedia) {
            RiskTier::Medium
        } else if score >= self.medium_score {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Highest tier across a list of matches. No matches means LOW.
    pub fn overall(&self, matches: &[NormalizedMatch]) -> RiskTier {
        overall_tier(matches.iter().map(|m| m.risk_tier))
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(&RiskConfig::default())
    }
}

/// Reduce tiers to their maximum, starting from LOW.
pub fn overall_tier(tiers: impl IntoIterator<Item = RiskTier>) -> RiskTier {
    tiers.into_iter().fold(RiskTier::Low, RiskTier::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::types::MatchMetadata;

    fn categories(tags: &[&str]) -> BTreeSet<MatchCategory> {
        tags.iter().map(|t| MatchCategory::parse(t)).collect()
    }

    fn matched(tier: RiskTier) -> NormalizedMatch {
        NormalizedMatch {
            match_id: "M-1".into(),
            name: "Someone".into(),
            score: 50,
            risk_tier: tier,
            categories: BTreeSet::new(),
            metadata: MatchMetadata::default(),
        }
    }

    #[test]
    fn test_sanctions_always_high() {
        let classifier = RiskClassifier::default();
        assert_eq!(classifier.classify(&categories(&["sanctions"]), 0), RiskTier::High);
        assert_eq!(
            classifier.classify(&categories(&["SANCTIONS", "PEP"]), 10),
            RiskTier::High
        );
    }

    #[test]
    fn test_pep_thresholds() {
        let classifier = RiskClassifier::default();
        let pep = categories(&["politically-exposed-person"]);
        assert_eq!(classifier.classify(&pep, 95), RiskTier::High);
        assert_eq!(classifier.classify(&pep, 90), RiskTier::High);
        assert_eq!(classifier.classify(&pep, 89), RiskTier::Medium);
        assert_eq!(classifier.classify(&pep, 50), RiskTier::Medium);
    }

    #[test]
    fn test_adverse_media_is_medium() {
        let classifier = RiskClassifier::default();
        assert_eq!(
            classifier.classify(&categories(&["adverse-media"]), 99),
            RiskTier::Medium
        );
    }

    #[test]
    fn test_score_only() {
        let classifier = RiskClassifier::default();
        let none = BTreeSet::new();
        assert_eq!(classifier.classify(&none, 80), RiskTier::Medium);
        assert_eq!(classifier.classify(&none, 70), RiskTier::Medium);
        assert_eq!(classifier.classify(&none, 69), RiskTier::Low);
        assert_eq!(classifier.classify(&none, 10), RiskTier::Low);
        assert_eq!(
            classifier.classify(&categories(&["watchlist"]), 10),
            RiskTier::Low
        );
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let classifier = RiskClassifier::new(&RiskConfig {
            pep_high_score: 60,
            medium_score: 40,
        });
        assert_eq!(classifier.classify(&categories(&["pep"]), 65), RiskTier::High);
        assert_eq!(classifier.classify(&BTreeSet::new(), 45), RiskTier::Medium);
    }

    #[test]
    fn test_overall_takes_maximum() {
        let classifier = RiskClassifier::default();
        let matches = vec![
            matched(RiskTier::Low),
            matched(RiskTier::High),
            matched(RiskTier::Medium),
        ];
        assert_eq!(classifier.overall(&matches), RiskTier::High);
    }

    #[test]
    fn test_overall_empty_is_low() {
        assert_eq!(RiskClassifier::default().overall(&[]), RiskTier::Low);
        assert_eq!(overall_tier([RiskTier::Unknown]), RiskTier::Low);
    }
}
