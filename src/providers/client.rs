//! JSON-over-HTTP client for upstream providers.
//!
//! # Responsibilities
//! - Build requests against a provider base URL
//! - Attach the session credential (raw `Authorization` header) or basic auth
//! - Map HTTP statuses and transport failures onto `GatewayError`
//! - Run every call through the provider's `ResilientExecutor`

use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::error::{GatewayError, GatewayResult};
use crate::resilience::ResilientExecutor;
use crate::session::Credential;

/// One upstream request, rebuilt for every attempt.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl UpstreamRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
struct BasicAuth {
    username: String,
    password: String,
}

/// HTTP client bound to one provider.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    basic_auth: Option<BasicAuth>,
    executor: ResilientExecutor,
}

impl UpstreamClient {
    /// Create a client for `base_url`. Per-attempt deadlines come from the
    /// executor's policy.
    pub fn new(base_url: &str, executor: ResilientExecutor) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GatewayError::Validation(format!("invalid upstream URL '{base_url}': {e}"))
        })?;
        let http = reqwest::Client::builder()
            .connect_timeout(executor.policy().attempt_timeout)
            .build()
            .map_err(|e| GatewayError::Transport {
                endpoint: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url,
            basic_auth: None,
            executor,
        })
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn executor(&self) -> &ResilientExecutor {
        &self.executor
    }

    /// Resolve a path against the base URL, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> GatewayResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| GatewayError::Validation(format!("invalid upstream path '{path}': {e}")))
    }

    /// Run `request` under the retry policy. When the executor carries a
    /// session, every attempt presents a fresh credential.
    pub async fn call(&self, operation: &str, request: &UpstreamRequest) -> GatewayResult<Value> {
        let url = self.endpoint(&request.path)?;
        let url = &url;

        if self.executor.session().is_some() {
            self.executor
                .execute_authenticated(operation, move |credential| async move {
                    self.attempt(url, request, Some(&credential)).await
                })
                .await
        } else {
            self.executor
                .execute(operation, move || self.attempt(url, request, None))
                .await
        }
    }

    /// A single attempt, without retries.
    pub async fn attempt(
        &self,
        url: &Url,
        request: &UpstreamRequest,
        credential: Option<&Credential>,
    ) -> GatewayResult<Value> {
        let endpoint = url.path().to_string();

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(credential) = credential {
            builder = builder.header(reqwest::header::AUTHORIZATION, credential.token());
        } else if let Some(auth) = &self.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&endpoint, &e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&endpoint, &e))?;

        tracing::debug!(
            method = %request.method,
            endpoint = %endpoint,
            status = status.as_u16(),
            "Upstream responded"
        );

        if !status.is_success() {
            return Err(map_status(&endpoint, status, body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| GatewayError::Upstream {
            endpoint,
            status: status.as_u16(),
            body: format!("invalid JSON body: {e}"),
        })
    }
}

/// Classify a non-success upstream status.
pub fn map_status(endpoint: &str, status: StatusCode, body: String) -> GatewayError {
    let endpoint = endpoint.to_string();
    match status.as_u16() {
        401 | 403 => GatewayError::CredentialRejected { endpoint },
        404 => GatewayError::NotFound { resource: endpoint },
        429 => GatewayError::RateLimited { endpoint },
        code @ 500..=599 => GatewayError::ServiceUnavailable {
            endpoint,
            status: code,
        },
        code => GatewayError::Upstream {
            endpoint,
            status: code,
            body,
        },
    }
}

fn transport_error(endpoint: &str, error: &reqwest::Error) -> GatewayError {
    GatewayError::Transport {
        endpoint: endpoint.to_string(),
        reason: error.to_string(),
    }
}
