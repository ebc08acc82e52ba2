//! End-to-end tests of the HTTP surface in mock mode.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use common::{fast_policy, spawn_from_config, spawn_gateway, test_config, ScriptedAuthenticator, ADMIN_KEY};
use provider_gateway::http::{build_router, AppState};
use provider_gateway::lifecycle::Shutdown;
use provider_gateway::providers::DnbClient;
use provider_gateway::resilience::ResilientExecutor;
use provider_gateway::session::CredentialSession;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

#[tokio::test]
async fn test_health_reports_modes_and_request_id() {
    let (addr, shutdown) = spawn_from_config(test_config()).await;

    let response = reqwest::get(url(addr, "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dnb_mock_mode"], true);
    assert_eq!(body["bridger_mock_mode"], true);
    assert_eq!(body["dnb_session_available"], true);

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (addr, shutdown) = spawn_from_config(test_config()).await;

    let response = reqwest::Client::new()
        .get(url(addr, "/health"))
        .header("x-request-id", "caller-chosen-id")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "caller-chosen-id");

    shutdown.trigger();
}

#[tokio::test]
async fn test_company_endpoints() {
    let (addr, shutdown) = spawn_from_config(test_config()).await;
    let client = reqwest::Client::new();

    let search: Value = client
        .get(url(addr, "/dnb/companies/search"))
        .query(&[("subject_name", "Gorman Manufacturing")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        search["MatchResponse"]["MatchCandidate"][0]["Organization"]["DUNSNumber"],
        "804735132"
    );

    for path in [
        "/dnb/companies/80-473-5132",
        "/dnb/companies/804735132/financials",
        "/dnb/companies/804735132/analytics",
    ] {
        let response = client.get(url(addr, path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let body = response.text().await.unwrap();
        assert!(body.contains("804735132"), "{path}: {body}");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_invalid_duns_is_a_validation_error() {
    let (addr, shutdown) = spawn_from_config(test_config()).await;

    let response = reqwest::get(url(addr, "/dnb/companies/12345")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["error_code"], "VE001");
    assert_eq!(body["error"]["severity"], "Error");
    assert!(body["timestamp"].is_string());

    shutdown.trigger();
}

#[tokio::test]
async fn test_person_screening_classifies_risk() {
    let (addr, shutdown) = spawn_from_config(test_config()).await;
    let client = reqwest::Client::new();

    let flagged: Value = client
        .post(url(addr, "/screening/person"))
        .json(&json!({ "referenceId": "CUST-1", "fullName": "Vladimir Putin" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(flagged["referenceId"], "CUST-1");
    assert_eq!(flagged["highestRiskLevel"], "HIGH");
    assert_eq!(flagged["matchCount"], 2);
    assert_eq!(flagged["matches"][0]["score"], 95);
    assert_eq!(flagged["matches"][1]["score"], 93);
    assert_eq!(flagged["matches"][1]["riskLevel"], "HIGH");

    let clean: Value = client
        .post(url(addr, "/screening/person"))
        .json(&json!({ "referenceId": "CUST-2", "fullName": "Jane Doe" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(clean["highestRiskLevel"], "LOW");
    assert_eq!(clean["matchCount"], 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_batch_and_lists() {
    let (addr, shutdown) = spawn_from_config(test_config()).await;
    let client = reqwest::Client::new();

    let batch: Value = client
        .post(url(addr, "/screening/batch"))
        .json(&json!({
            "persons": [{ "referenceId": "P-1", "fullName": "John Fraud" }],
            "entities": [{ "referenceId": "E-1", "entityName": "Rosneft Oil Company" }]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(batch["totalScreened"], 2);
    assert_eq!(batch["results"][0]["referenceId"], "P-1");
    assert_eq!(batch["results"][0]["highestRiskLevel"], "MEDIUM");
    assert_eq!(batch["results"][1]["referenceId"], "E-1");
    assert_eq!(batch["results"][1]["highestRiskLevel"], "HIGH");
    assert!(batch["batchId"].as_str().unwrap().starts_with("BATCH-"));

    let empty = client
        .post(url(addr, "/screening/batch"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let lists: Vec<Value> = client
        .get(url(addr, "/screening/lists"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(lists.len(), 5);
    assert_eq!(lists[0]["listName"], "OFAC SDN List");

    shutdown.trigger();
}

#[tokio::test]
async fn test_admin_requires_key() {
    let (addr, shutdown) = spawn_from_config(test_config()).await;
    let client = reqwest::Client::new();

    let response = client.get(url(addr, "/admin/status")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .get(url(addr, "/admin/status"))
        .bearer_auth("wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let status: Value = client
        .get(url(addr, "/admin/status"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["session_locked"], false);

    shutdown.trigger();
}

#[tokio::test]
async fn test_admin_session_controls() {
    let (addr, shutdown) = spawn_from_config(test_config()).await;
    let client = reqwest::Client::new();

    // Any registry call obtains a credential.
    client
        .get(url(addr, "/dnb/companies/804735132/analytics"))
        .send()
        .await
        .unwrap();

    let session: Value = client
        .get(url(addr, "/admin/session"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["provider"], "dnb");
    assert_eq!(session["credential_valid"], true);

    let invalidated: Value = client
        .post(url(addr, "/admin/session/invalidate"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(invalidated["has_credential"], false);

    let reset = client
        .post(url(addr, "/admin/session/reset-lockout"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(reset.status(), StatusCode::OK);

    shutdown.trigger();
}

#[tokio::test]
async fn test_lockout_and_operator_reset() {
    let mut config = test_config();
    config.session.max_failed_attempts = 2;

    let shutdown = Shutdown::new();
    let mut state = AppState::from_config(config, &shutdown).unwrap();

    let auth = Arc::new(ScriptedAuthenticator::new(vec![Err("denied"), Err("denied")]));
    let session = Arc::new(CredentialSession::new("dnb", &state.config.session, auth.clone()));
    let executor = ResilientExecutor::new(fast_policy()).with_session(session.clone());
    state.dnb = DnbClient::new(&state.config.dnb, executor).unwrap();
    state.dnb_session = session;

    let (addr, server_shutdown) = spawn_gateway(state).await;
    let client = reqwest::Client::new();
    let analytics = url(addr, "/dnb/companies/804735132/analytics");

    for _ in 0..2 {
        let response = client.get(&analytics).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["error_code"], "SC001");
        assert_eq!(body["error"]["severity"], "Fatal");
    }

    let response = client.get(&analytics).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::LOCKED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["error_code"], "SC002");
    assert_eq!(auth.calls(), 2);

    let health: Value = client.get(url(addr, "/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(health["dnb_session_available"], false);

    let reset: Value = client
        .post(url(addr, "/admin/session/reset-lockout"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reset["locked"], false);
    assert_eq!(reset["failed_attempts"], 0);

    let response = client.get(&analytics).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(auth.calls(), 3);

    server_shutdown.trigger();
}

fn in_process_router() -> axum::Router {
    let state = AppState::from_config(test_config(), &Shutdown::new()).unwrap();
    build_router(state)
}

#[tokio::test]
async fn test_router_rejects_admin_without_key() {
    let response = in_process_router()
        .oneshot(Request::get("/admin/session").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_router_screens_entity() {
    let request = Request::post("/screening/entity")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "referenceId": "E-7", "entityName": "Gazprom Neft" }).to_string(),
        ))
        .unwrap();

    let response = in_process_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["referenceId"], "E-7");
    assert_eq!(body["highestRiskLevel"], "HIGH");
    assert_eq!(body["matches"][1]["score"], 96);
}
