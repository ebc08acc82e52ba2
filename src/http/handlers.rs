//! Route handlers for the provider façades.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayResult;
use crate::http::server::AppState;
use crate::providers::{CompanySearch, DEFAULT_PRODUCT_CODE};
use crate::screening::{
    BatchScreenRequest, BatchScreeningResult, EntityScreenRequest, PersonScreenRequest,
    ScreeningListInfo, ScreeningResult,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub dnb_mock_mode: bool,
    pub bridger_mock_mode: bool,
    /// `false` while the registry session is locked out.
    pub dnb_session_available: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        dnb_mock_mode: state.dnb.is_mock(),
        bridger_mock_mode: state.bridger.is_mock(),
        dnb_session_available: !state.dnb_session.is_locked(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub subject_name: String,
    pub country_iso_code: Option<String>,
    pub territory_name: Option<String>,
    pub match_type: Option<String>,
}

pub async fn search_companies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> GatewayResult<Json<Value>> {
    let mut search = CompanySearch::new(params.subject_name);
    if let Some(country) = params.country_iso_code {
        search.country_iso_code = country;
    }
    if let Some(match_type) = params.match_type {
        search.match_type = match_type;
    }
    search.territory_name = params.territory_name;

    Ok(Json(state.dnb.search_companies(&search).await?))
}

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    pub product_code: Option<String>,
}

pub async fn company_profile(
    State(state): State<AppState>,
    Path(duns): Path<String>,
    Query(params): Query<ProfileParams>,
) -> GatewayResult<Json<Value>> {
    let product = params.product_code.as_deref().unwrap_or(DEFAULT_PRODUCT_CODE);
    Ok(Json(state.dnb.company_profile(&duns, product).await?))
}

pub async fn financial_statements(
    State(state): State<AppState>,
    Path(duns): Path<String>,
) -> GatewayResult<Json<Value>> {
    Ok(Json(state.dnb.financial_statements(&duns).await?))
}

pub async fn analytics(
    State(state): State<AppState>,
    Path(duns): Path<String>,
) -> GatewayResult<Json<Value>> {
    Ok(Json(state.dnb.analytics(&duns).await?))
}

pub async fn screen_person(
    State(state): State<AppState>,
    Json(request): Json<PersonScreenRequest>,
) -> GatewayResult<Json<ScreeningResult>> {
    Ok(Json(state.bridger.screen_person(&request).await?))
}

pub async fn screen_entity(
    State(state): State<AppState>,
    Json(request): Json<EntityScreenRequest>,
) -> GatewayResult<Json<ScreeningResult>> {
    Ok(Json(state.bridger.screen_entity(&request).await?))
}

pub async fn screen_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchScreenRequest>,
) -> GatewayResult<Json<BatchScreeningResult>> {
    Ok(Json(state.bridger.batch_screen(&request).await?))
}

pub async fn screening_lists(
    State(state): State<AppState>,
) -> GatewayResult<Json<Vec<ScreeningListInfo>>> {
    Ok(Json(state.bridger.screening_lists().await?))
}
