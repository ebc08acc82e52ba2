//! Shared utilities for integration tests.

#![allow(dead_code)]

use futures_util::future::BoxFuture;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::net::TcpListener;

use provider_gateway::config::GatewayConfig;
use provider_gateway::error::BoxError;
use provider_gateway::http::{AppState, HttpServer};
use provider_gateway::lifecycle::Shutdown;
use provider_gateway::resilience::{OutcomeEvent, RetryEvent, RetryObserver, RetryPolicy};
use provider_gateway::session::Authenticator;

pub const ADMIN_KEY: &str = "test-admin-key";

/// Mock-mode config with fast retries and a known admin key.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.retries.backoff_unit_ms = 1;
    config.retries.attempt_timeout_secs = 5;
    config.admin.api_key = ADMIN_KEY.into();
    config
}

/// Retry policy with millisecond backoff units.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        backoff_factor: 2.0,
        backoff_unit: Duration::from_millis(1),
        attempt_timeout: Duration::from_secs(5),
    }
}

/// Authenticator that plays back a script of results, optionally slowly.
/// Once the script is exhausted every call succeeds.
pub struct ScriptedAuthenticator {
    script: Mutex<VecDeque<Result<String, String>>>,
    delay: Duration,
    calls: AtomicU32,
}

impl ScriptedAuthenticator {
    pub fn new(script: Vec<Result<&str, &str>>) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Authenticator for ScriptedAuthenticator {
    fn authenticate(&self) -> BoxFuture<'_, Result<String, BoxError>> {
        Box::pin(async move {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Ok(token)) => Ok(token),
                Some(Err(reason)) => Err(reason.into()),
                None => Ok(format!("scripted-token-{n}")),
            }
        })
    }
}

/// Observer that records retry and outcome reports.
#[derive(Default)]
pub struct RecordingObserver {
    pub retries: Mutex<Vec<(u32, Duration, &'static str)>>,
    pub outcomes: Mutex<Vec<(u32, &'static str)>>,
}

impl RetryObserver for RecordingObserver {
    fn on_retry(&self, event: &RetryEvent<'_>) {
        self.retries
            .lock()
            .unwrap()
            .push((event.attempt, event.delay, event.error.error_code()));
    }

    fn on_outcome(&self, event: &OutcomeEvent<'_>) {
        self.outcomes
            .lock()
            .unwrap()
            .push((event.attempts, event.outcome.as_str()));
    }
}

/// Serve `state` on an ephemeral port. Returns the address and the shutdown
/// handle that stops the server.
pub async fn spawn_gateway(state: AppState) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let addr = serve(state, shutdown.clone()).await;
    (addr, shutdown)
}

/// Build state from `config` and serve it. One handle stops the server and
/// cancels in-flight upstream retries.
pub async fn spawn_from_config(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let state = AppState::from_config(config, &shutdown).unwrap();
    let addr = serve(state, shutdown.clone()).await;
    (addr, shutdown)
}

async fn serve(state: AppState, shutdown: Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = HttpServer::new(state).run(listener, shutdown).await;
    });
    addr
}
