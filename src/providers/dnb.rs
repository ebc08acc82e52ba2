//! Company registry provider (D&B Direct style).
//!
//! Every call, mock or live, obtains a credential from the provider's
//! `CredentialSession` through the executor, so lockout and refresh behave
//! the same in both modes.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::{json, Value};

use crate::config::DnbConfig;
use crate::error::{BoxError, GatewayError, GatewayResult};
use crate::providers::client::{UpstreamClient, UpstreamRequest};
use crate::providers::mock_data;
use crate::resilience::ResilientExecutor;
use crate::session::{Authenticator, CredentialSession};

/// Default product for company profiles.
pub const DEFAULT_PRODUCT_CODE: &str = "DCP_STD";

/// Strip hyphens and whitespace and require exactly nine digits.
pub fn format_duns(duns: &str) -> GatewayResult<String> {
    let cleaned: String = duns.trim().chars().filter(|c| *c != '-').collect();
    if cleaned.len() == 9 && cleaned.chars().all(|c| c.is_ascii_digit()) {
        Ok(cleaned)
    } else {
        Err(GatewayError::Validation(format!(
            "invalid D-U-N-S number format: {duns}"
        )))
    }
}

/// Company search parameters.
#[derive(Debug, Clone)]
pub struct CompanySearch {
    pub subject_name: String,
    pub country_iso_code: String,
    pub territory_name: Option<String>,
    pub match_type: String,
}

impl CompanySearch {
    pub fn new(subject_name: impl Into<String>) -> Self {
        Self {
            subject_name: subject_name.into(),
            country_iso_code: "US".to_string(),
            territory_name: None,
            match_type: "Advanced".to_string(),
        }
    }
}

/// Exchanges username and password for a token at the authentication endpoint.
///
/// The token comes back in the `Authorization` response header.
pub struct DnbAuthenticator {
    http: reqwest::Client,
    auth_url: String,
    username: String,
    password: String,
}

impl DnbAuthenticator {
    pub fn new(config: &DnbConfig, timeout: Duration) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport {
                endpoint: config.auth_url(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            auth_url: config.auth_url(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

impl Authenticator for DnbAuthenticator {
    fn authenticate(&self) -> BoxFuture<'_, Result<String, BoxError>> {
        Box::pin(async move {
            let response = self
                .http
                .post(&self.auth_url)
                .header("x-dnb-user", &self.username)
                .header("x-dnb-pwd", &self.password)
                .json(&json!({ "TransactionDetail": mock_data::transaction_detail(None) }))
                .send()
                .await?;

            let status = response.status();
            let token = response
                .headers()
                .get(reqwest::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            match token {
                Some(token) if status.is_success() && !token.is_empty() => Ok(token),
                _ => Err(format!("authentication failed with status {status}").into()),
            }
        })
    }
}

impl std::fmt::Debug for DnbAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnbAuthenticator")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Mock,
    Live(UpstreamClient),
}

/// Company registry client.
#[derive(Debug, Clone)]
pub struct DnbClient {
    backend: Backend,
    executor: ResilientExecutor,
    api_version: String,
}

impl DnbClient {
    /// Build a client. `executor` must carry the provider's session.
    pub fn new(config: &DnbConfig, executor: ResilientExecutor) -> GatewayResult<Self> {
        let backend = if config.use_mock {
            Backend::Mock
        } else {
            Backend::Live(UpstreamClient::new(&config.base_url, executor.clone())?)
        };
        Ok(Self {
            backend,
            executor,
            api_version: config.api_version.clone(),
        })
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock)
    }

    pub fn session(&self) -> Option<&Arc<CredentialSession>> {
        self.executor.session()
    }

    /// Find companies by name and obtain their D-U-N-S numbers.
    pub async fn search_companies(&self, search: &CompanySearch) -> GatewayResult<Value> {
        if search.subject_name.trim().is_empty() {
            return Err(GatewayError::Validation("subject_name must not be empty".into()));
        }
        tracing::info!(subject = %search.subject_name, "Searching companies");

        let mut request = UpstreamRequest::get(format!("/V{}/organizations", self.api_version))
            .query("CountryISOAlpha2Code", search.country_iso_code.as_str())
            .query("SubjectName", search.subject_name.as_str())
            .query("match", "true")
            .query("MatchTypeText", search.match_type.as_str());
        if let Some(territory) = &search.territory_name {
            request = request.query("TerritoryName", territory.as_str());
        }

        let subject = search.subject_name.clone();
        self.dispatch("dnb.search_companies", request, move || {
            mock_data::company_search(&subject)
        })
        .await
    }

    pub async fn company_profile(&self, duns: &str, product_code: &str) -> GatewayResult<Value> {
        let duns = format_duns(duns)?;
        tracing::info!(duns = %duns, product = %product_code, "Fetching company profile");

        let request = UpstreamRequest::get(format!(
            "/V{}/organizations/{}/products/{}",
            self.api_version, duns, product_code
        ));
        self.dispatch("dnb.company_profile", request, move || {
            mock_data::company_profile(&duns)
        })
        .await
    }

    pub async fn financial_statements(&self, duns: &str) -> GatewayResult<Value> {
        let duns = format_duns(duns)?;
        tracing::info!(duns = %duns, "Fetching financial statements");

        let request = UpstreamRequest::get(format!(
            "/V{}/organizations/{}/financials",
            self.api_version, duns
        ));
        self.dispatch("dnb.financial_statements", request, move || {
            mock_data::financial_statements(&duns)
        })
        .await
    }

    /// Predictive analytics and risk scores.
    pub async fn analytics(&self, duns: &str) -> GatewayResult<Value> {
        let duns = format_duns(duns)?;
        tracing::info!(duns = %duns, "Fetching analytics");

        let request = UpstreamRequest::get(format!(
            "/V{}/organizations/{}/analytics",
            self.api_version, duns
        ));
        self.dispatch("dnb.analytics", request, move || mock_data::analytics(&duns))
            .await
    }

    async fn dispatch<M>(&self, operation: &str, request: UpstreamRequest, mock: M) -> GatewayResult<Value>
    where
        M: Fn() -> Value,
    {
        match &self.backend {
            Backend::Live(upstream) => upstream.call(operation, &request).await,
            Backend::Mock => {
                let mock = &mock;
                self.executor
                    .execute_authenticated(operation, move |_credential| async move { Ok(mock()) })
                    .await
            }
        }
    }
}
