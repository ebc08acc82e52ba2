//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compose sessions, executors and provider clients from `GatewayConfig`
//! - Create the Axum router with all handlers
//! - Wire up middleware (request id, tracing, timeout, accounting)
//! - Serve until the shutdown coordinator fires

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::config::GatewayConfig;
use crate::error::GatewayResult;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, track_requests};
use crate::lifecycle::Shutdown;
use crate::providers::{BridgerClient, DnbAuthenticator, DnbClient};
use crate::resilience::{ResilientExecutor, RetryPolicy};
use crate::screening::{MatchNormalizer, RiskClassifier};
use crate::session::{Authenticator, CredentialSession, MockAuthenticator};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub dnb: DnbClient,
    pub bridger: BridgerClient,
    /// Registry credential session, shared with `dnb`'s executor.
    pub dnb_session: Arc<CredentialSession>,
    pub started_at: Instant,
}

impl AppState {
    /// Composition root: one session per authenticated provider, one executor
    /// per provider, all cancelled by `shutdown`.
    pub fn from_config(config: GatewayConfig, shutdown: &Shutdown) -> GatewayResult<Self> {
        let policy = RetryPolicy::from(&config.retries);

        let authenticator: Arc<dyn Authenticator> = if config.dnb.use_mock {
            Arc::new(MockAuthenticator::new())
        } else {
            Arc::new(DnbAuthenticator::new(&config.dnb, policy.attempt_timeout)?)
        };
        let dnb_session = Arc::new(CredentialSession::new("dnb", &config.session, authenticator));

        let dnb_executor = ResilientExecutor::new(policy.clone())
            .with_session(dnb_session.clone())
            .with_shutdown(shutdown.clone());
        let bridger_executor = ResilientExecutor::new(policy).with_shutdown(shutdown.clone());

        let normalizer = MatchNormalizer::new(RiskClassifier::new(&config.risk));
        let dnb = DnbClient::new(&config.dnb, dnb_executor)?;
        let bridger = BridgerClient::new(&config.bridger, bridger_executor, normalizer)?;

        tracing::info!(
            dnb_mock = dnb.is_mock(),
            bridger_mock = bridger.is_mock(),
            max_retries = config.retries.max_retries,
            "Providers initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            dnb,
            bridger,
            dnb_session,
            started_at: Instant::now(),
        })
    }
}

/// HTTP server for the provider gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { router, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.listener.request_timeout_secs);
    let admin_enabled = state.config.admin.enabled;

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/dnb/companies/search", get(handlers::search_companies))
        .route("/dnb/companies/{duns}", get(handlers::company_profile))
        .route("/dnb/companies/{duns}/financials", get(handlers::financial_statements))
        .route("/dnb/companies/{duns}/analytics", get(handlers::analytics))
        .route("/screening/person", post(handlers::screen_person))
        .route("/screening/entity", post(handlers::screen_entity))
        .route("/screening/batch", post(handlers::screen_batch))
        .route("/screening/lists", get(handlers::screening_lists))
        .with_state(state.clone());

    if admin_enabled {
        router = router.merge(admin::setup_admin_router(state));
    }

    router
        .layer(middleware::from_fn(track_requests))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}
