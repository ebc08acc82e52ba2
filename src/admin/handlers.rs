use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::session::SessionStatus;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub uptime_secs: u64,
    pub dnb_mock_mode: bool,
    pub bridger_mock_mode: bool,
    pub dnb_rate_limit_qps: u32,
    pub session_locked: bool,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let locked = state.dnb_session.is_locked();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: if locked { "degraded" } else { "operational" }.to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        dnb_mock_mode: state.dnb.is_mock(),
        bridger_mock_mode: state.bridger.is_mock(),
        dnb_rate_limit_qps: state.config.dnb.rate_limit_qps,
        session_locked: locked,
    })
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.dnb_session.status())
}

/// Operator action: clear the failure counter. The next call refreshes.
pub async fn reset_lockout(State(state): State<AppState>) -> Json<SessionStatus> {
    state.dnb_session.reset_lockout();
    Json(state.dnb_session.status())
}

/// Drop the cached credential so the next call refreshes.
pub async fn invalidate_session(State(state): State<AppState>) -> Json<SessionStatus> {
    state.dnb_session.invalidate();
    Json(state.dnb_session.status())
}
