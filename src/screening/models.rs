//! Screening request and result payloads exchanged with API callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::screening::types::{NormalizedMatch, RiskTier};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// Identity document attached to a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonScreenRequest {
    /// Caller's own reference, echoed in the result.
    pub reference_id: String,
    pub full_name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Date of birth, any ISO-8601 date or datetime.
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub identifiers: Option<Vec<Identifier>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityScreenRequest {
    pub reference_id: String,
    pub entity_name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchScreenRequest {
    #[serde(default)]
    pub persons: Vec<PersonScreenRequest>,
    #[serde(default)]
    pub entities: Vec<EntityScreenRequest>,
}

impl BatchScreenRequest {
    pub fn len(&self) -> usize {
        self.persons.len() + self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The subject a screening was run against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Person(PersonScreenRequest),
    Entity(EntityScreenRequest),
}

impl Subject {
    pub fn reference_id(&self) -> &str {
        match self {
            Subject::Person(p) => &p.reference_id,
            Subject::Entity(e) => &e.reference_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Subject::Person(_) => "person",
            Subject::Entity(_) => "entity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScreeningStatus {
    Completed,
    Pending,
    Failed,
}

impl ScreeningStatus {
    /// Parse a provider status, defaulting to `Completed`.
    pub fn parse(status: &str) -> Self {
        match status.trim().to_ascii_uppercase().as_str() {
            "PENDING" => ScreeningStatus::Pending,
            "FAILED" => ScreeningStatus::Failed,
            _ => ScreeningStatus::Completed,
        }
    }
}

/// Outcome of screening one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningResult {
    pub screening_id: String,
    pub reference_id: String,
    pub status: ScreeningStatus,
    pub subject: Subject,
    pub matches: Vec<NormalizedMatch>,
    pub match_count: usize,
    pub highest_risk_level: RiskTier,
    pub created_at: DateTime<Utc>,
    /// Provider-reported processing time in seconds.
    pub processing_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScreeningResult {
    pub batch_id: String,
    pub total_screened: usize,
    pub results: Vec<ScreeningResult>,
    pub created_at: DateTime<Utc>,
}

/// A watchlist the provider screens against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningListInfo {
    pub list_name: String,
    pub list_type: String,
    pub description: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_request_camel_case() {
        let request: PersonScreenRequest = serde_json::from_value(json!({
            "referenceId": "CUST-1",
            "fullName": "Jane Doe",
            "dob": "1980-01-01",
            "identifiers": [{ "type": "passport", "number": "X123" }]
        }))
        .unwrap();
        assert_eq!(request.reference_id, "CUST-1");
        assert_eq!(request.identifiers.unwrap()[0].kind, "passport");
    }

    #[test]
    fn test_subject_untagged() {
        let subject: Subject = serde_json::from_value(json!({
            "referenceId": "ENT-1",
            "entityName": "Acme"
        }))
        .unwrap();
        assert_eq!(subject.kind(), "entity");
        assert_eq!(subject.reference_id(), "ENT-1");
    }

    #[test]
    fn test_batch_request_defaults() {
        let batch: BatchScreenRequest = serde_json::from_value(json!({
            "persons": [{ "referenceId": "P-1", "fullName": "A" }]
        }))
        .unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch.entities.is_empty());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ScreeningStatus::parse("pending"), ScreeningStatus::Pending);
        assert_eq!(ScreeningStatus::parse("whatever"), ScreeningStatus::Completed);
    }
}
