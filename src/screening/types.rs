//! Core screening types: categories, risk tiers and matches.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Category tag attached to a screening match.
///
/// Parsing is case-insensitive and treats `-` and spaces as `_`, so
/// `"politically-exposed-person"`, `"PEP"` and `"pep"` are the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchCategory {
    Sanctions,
    /// Politically exposed person.
    Pep,
    AdverseMedia,
    FinancialRegulator,
    LawEnforcement,
    /// Unrecognised tag, kept as received.
    Other(String),
}

impl MatchCategory {
    pub fn parse(tag: &str) -> Self {
        let canonical: String = tag
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match canonical.as_str() {
            "SANCTIONS" | "SANCTION" => MatchCategory::Sanctions,
            "PEP" | "POLITICALLY_EXPOSED_PERSON" => MatchCategory::Pep,
            "ADVERSE_MEDIA" => MatchCategory::AdverseMedia,
            "FINANCIAL_REGULATOR" => MatchCategory::FinancialRegulator,
            "LAW_ENFORCEMENT" => MatchCategory::LawEnforcement,
            _ => MatchCategory::Other(tag.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MatchCategory::Sanctions => "SANCTIONS",
            MatchCategory::Pep => "PEP",
            MatchCategory::AdverseMedia => "ADVERSE_MEDIA",
            MatchCategory::FinancialRegulator => "FINANCIAL_REGULATOR",
            MatchCategory::LawEnforcement => "LAW_ENFORCEMENT",
            MatchCategory::Other(tag) => tag,
        }
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for MatchCategory {
    fn from(tag: String) -> Self {
        MatchCategory::parse(&tag)
    }
}

impl From<&str> for MatchCategory {
    fn from(tag: &str) -> Self {
        MatchCategory::parse(tag)
    }
}

impl From<MatchCategory> for String {
    fn from(category: MatchCategory) -> Self {
        category.as_str().to_string()
    }
}

/// Ordered risk classification.
///
/// `Low < Medium < High`. `Unknown` sorts below everything and marks a
/// subject that was never screened; classification never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Unknown,
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Unknown => "UNKNOWN",
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which list a match came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSource {
    pub list_name: String,
    pub list_type: String,
    pub country: Option<String>,
}

impl Default for MatchSource {
    fn default() -> Self {
        Self {
            list_name: "Unknown".to_string(),
            list_type: "OTHER".to_string(),
            country: None,
        }
    }
}

/// Descriptive fields passed through from the provider untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub aliases: Vec<String>,
    pub source: MatchSource,
    pub dob: Option<String>,
    pub nationality: Option<String>,
    pub description: Option<String>,
    pub last_updated: Option<String>,
}

/// A provider hit before normalization. The score's scale is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    pub id: Option<String>,
    pub name: String,
    pub raw_score: Value,
    pub categories: Vec<String>,
    pub metadata: MatchMetadata,
}

impl RawMatch {
    /// Read a vendor match record (`EntityId`, `Name`, `Score`, `Categories`,
    /// `ListName`, ...). Missing or mistyped fields fall back to defaults.
    pub fn from_vendor_record(record: &Value) -> Self {
        let text = |key: &str| -> Option<String> {
            match record.get(key)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };
        let strings = |key: &str| -> Vec<String> {
            match record.get(key) {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                Some(Value::String(s)) => vec![s.clone()],
                _ => Vec::new(),
            }
        };

        let default_source = MatchSource::default();
        RawMatch {
            id: text("EntityId"),
            name: text("Name").unwrap_or_default(),
            raw_score: record.get("Score").cloned().unwrap_or(Value::Null),
            categories: strings("Categories"),
            metadata: MatchMetadata {
                aliases: strings("Aliases"),
                source: MatchSource {
                    list_name: text("ListName").unwrap_or(default_source.list_name),
                    list_type: text("ListType").unwrap_or(default_source.list_type),
                    country: text("Country"),
                },
                dob: text("DOB"),
                nationality: text("Nationality"),
                description: text("Description"),
                last_updated: text("LastUpdated"),
            },
        }
    }
}

/// A match on the canonical 0-100 scale with its risk tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMatch {
    pub match_id: String,
    pub name: String,
    pub score: u8,
    #[serde(rename = "riskLevel")]
    pub risk_tier: RiskTier,
    pub categories: BTreeSet<MatchCategory>,
    #[serde(flatten)]
    pub metadata: MatchMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_aliases() {
        assert_eq!(MatchCategory::parse("politically-exposed-person"), MatchCategory::Pep);
        assert_eq!(MatchCategory::parse("pep"), MatchCategory::Pep);
        assert_eq!(MatchCategory::parse("Adverse Media"), MatchCategory::AdverseMedia);
        assert_eq!(MatchCategory::parse("sanctions"), MatchCategory::Sanctions);
        assert_eq!(
            MatchCategory::parse("watchlist"),
            MatchCategory::Other("watchlist".to_string())
        );
    }

    #[test]
    fn test_category_serializes_canonical() {
        let json = serde_json::to_string(&MatchCategory::parse("adverse-media")).unwrap();
        assert_eq!(json, "\"ADVERSE_MEDIA\"");
        let back: MatchCategory = serde_json::from_str("\"politically-exposed-person\"").unwrap();
        assert_eq!(back, MatchCategory::Pep);
    }

    #[test]
    fn test_risk_tier_order() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
        assert!(RiskTier::Unknown < RiskTier::Low);
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn test_raw_match_from_vendor_record() {
        let record = json!({
            "EntityId": "PEP-RU-002",
            "Score": 93,
            "Name": "Jane Doe",
            "Categories": ["PEP"],
            "ListName": "World-Check PEP Database",
            "ListType": "PEP",
            "Country": "RU",
            "Description": "Head of State"
        });

        let raw = RawMatch::from_vendor_record(&record);
        assert_eq!(raw.id.as_deref(), Some("PEP-RU-002"));
        assert_eq!(raw.raw_score, json!(93));
        assert_eq!(raw.categories, vec!["PEP".to_string()]);
        assert_eq!(raw.metadata.source.list_name, "World-Check PEP Database");
        assert!(raw.metadata.aliases.is_empty());
        assert_eq!(raw.metadata.dob, None);
    }

    #[test]
    fn test_raw_match_tolerates_sparse_record() {
        let raw = RawMatch::from_vendor_record(&json!({ "Name": "X" }));
        assert_eq!(raw.id, None);
        assert_eq!(raw.raw_score, Value::Null);
        assert_eq!(raw.metadata.source, MatchSource::default());
    }
}
