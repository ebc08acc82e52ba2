//! Sanctions and PEP screening provider (Bridger style).
//!
//! Requests are sanitised and forwarded (or answered from fixtures in mock
//! mode); every provider document goes through `MatchNormalizer` before it
//! leaves this module.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use futures_util::future::Either;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::BridgerConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::observability::metrics;
use crate::providers::client::{UpstreamClient, UpstreamRequest};
use crate::providers::mock_data;
use crate::resilience::ResilientExecutor;
use crate::screening::{
    BatchScreenRequest, BatchScreeningResult, EntityScreenRequest, MatchNormalizer,
    PersonScreenRequest, ScreeningListInfo, ScreeningResult, Subject,
};

/// Trim and strip angle brackets. Blank input becomes `None`.
pub fn sanitize_input(text: Option<&str>) -> Option<String> {
    let cleaned: String = text?.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Normalize an ISO-8601 date or datetime to `YYYY-MM-DD`; anything else is
/// passed through unchanged.
pub fn format_date(date: Option<&str>) -> Option<String> {
    let date = date?.trim();
    if date.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    Some(date.to_string())
}

/// Vendor request body with absent fields left out.
fn vendor_body<'a>(fields: impl IntoIterator<Item = (&'a str, Option<String>)>) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), Value::String(v))))
        .collect();
    Value::Object(map)
}

fn person_body(request: &PersonScreenRequest) -> Value {
    vendor_body([
        ("FullName", sanitize_input(Some(&request.full_name))),
        ("FirstName", sanitize_input(request.first_name.as_deref())),
        ("LastName", sanitize_input(request.last_name.as_deref())),
        ("DOB", format_date(request.dob.as_deref())),
        ("Nationality", request.nationality.clone()),
        ("Country", request.country.clone()),
        ("ReferenceId", Some(request.reference_id.clone())),
    ])
}

fn entity_body(request: &EntityScreenRequest) -> Value {
    vendor_body([
        ("EntityName", sanitize_input(Some(&request.entity_name))),
        ("Country", request.country.clone()),
        ("RegistrationNumber", request.registration_number.clone()),
        ("ReferenceId", Some(request.reference_id.clone())),
    ])
}

fn list_from_vendor_record(record: &Value) -> ScreeningListInfo {
    let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
    ScreeningListInfo {
        list_name: text("ListName").unwrap_or_else(|| "Unknown".to_string()),
        list_type: text("ListType").unwrap_or_else(|| "OTHER".to_string()),
        description: text("Description").unwrap_or_default(),
        country: text("Country"),
        last_updated: text("LastUpdated"),
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Mock,
    Live(UpstreamClient),
}

/// Screening provider client.
#[derive(Debug, Clone)]
pub struct BridgerClient {
    backend: Backend,
    normalizer: MatchNormalizer,
    /// Subjects of one batch screened at the same time.
    batch_concurrency: usize,
}

impl BridgerClient {
    pub fn new(
        config: &BridgerConfig,
        executor: ResilientExecutor,
        normalizer: MatchNormalizer,
    ) -> GatewayResult<Self> {
        let backend = if config.use_mock {
            Backend::Mock
        } else {
            Backend::Live(
                UpstreamClient::new(&config.base_url, executor)?
                    .with_basic_auth(&config.username, &config.password),
            )
        };
        Ok(Self {
            backend,
            normalizer,
            batch_concurrency: config.batch_concurrency.max(1),
        })
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock)
    }

    /// Screen one individual against sanctions, PEP and adverse media lists.
    pub async fn screen_person(&self, request: &PersonScreenRequest) -> GatewayResult<ScreeningResult> {
        if request.full_name.trim().is_empty() {
            return Err(GatewayError::Validation("fullName must not be empty".into()));
        }
        tracing::info!(reference_id = %request.reference_id, "Screening person");

        let document = match &self.backend {
            Backend::Mock => mock_data::person_screening(&request.full_name, &request.reference_id),
            Backend::Live(upstream) => {
                upstream
                    .call(
                        "bridger.screen_person",
                        &UpstreamRequest::post("/RunSearch", person_body(request)),
                    )
                    .await?
            }
        };
        Ok(self.finish(&document, Subject::Person(request.clone())))
    }

    /// Screen one business entity.
    pub async fn screen_entity(&self, request: &EntityScreenRequest) -> GatewayResult<ScreeningResult> {
        if request.entity_name.trim().is_empty() {
            return Err(GatewayError::Validation("entityName must not be empty".into()));
        }
        tracing::info!(reference_id = %request.reference_id, "Screening entity");

        let document = match &self.backend {
            Backend::Mock => mock_data::entity_screening(&request.entity_name, &request.reference_id),
            Backend::Live(upstream) => {
                upstream
                    .call(
                        "bridger.screen_entity",
                        &UpstreamRequest::post("/RunEntitySearch", entity_body(request)),
                    )
                    .await?
            }
        };
        Ok(self.finish(&document, Subject::Entity(request.clone())))
    }

    /// Screen every subject in the batch, at most `batch_concurrency` at a
    /// time. Results keep request order (persons first); the first failure
    /// fails the batch.
    pub async fn batch_screen(&self, request: &BatchScreenRequest) -> GatewayResult<BatchScreeningResult> {
        if request.is_empty() {
            return Err(GatewayError::Validation("batch contains no subjects".into()));
        }
        tracing::info!(
            persons = request.persons.len(),
            entities = request.entities.len(),
            concurrency = self.batch_concurrency,
            "Batch screening"
        );

        let persons = request.persons.iter().map(|p| Either::Left(self.screen_person(p)));
        let entities = request.entities.iter().map(|e| Either::Right(self.screen_entity(e)));
        let futures: Vec<_> = persons.chain(entities).collect();
        let results: Vec<ScreeningResult> = stream::iter(futures)
            .buffered(self.batch_concurrency)
            .try_collect()
            .await?;

        Ok(BatchScreeningResult {
            batch_id: format!("BATCH-{}", Uuid::new_v4()),
            total_screened: results.len(),
            results,
            created_at: Utc::now(),
        })
    }

    /// Watchlists available for screening.
    pub async fn screening_lists(&self) -> GatewayResult<Vec<ScreeningListInfo>> {
        match &self.backend {
            Backend::Mock => Ok(mock_data::screening_lists()),
            Backend::Live(upstream) => {
                let document = upstream
                    .call("bridger.screening_lists", &UpstreamRequest::get("/GetAvailableLists"))
                    .await?;
                Ok(document
                    .as_array()
                    .map(|items| items.iter().map(list_from_vendor_record).collect())
                    .unwrap_or_default())
            }
        }
    }

    fn finish(&self, document: &Value, subject: Subject) -> ScreeningResult {
        let kind = subject.kind();
        let result = self.normalizer.build_result(document, subject);
        metrics::record_screening(kind, result.highest_risk_level.as_str());
        tracing::info!(
            screening_id = %result.screening_id,
            reference_id = %result.reference_id,
            matches = result.match_count,
            highest_risk = %result.highest_risk_level,
            "Screening completed"
        );
        result
    }
}
