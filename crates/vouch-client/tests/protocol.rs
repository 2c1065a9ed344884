//! HTTP-level tests of the request/poll protocol against a stub backend.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vouch_client::prelude::*;

fn client_for(server: &MockServer) -> ApprovalClient {
    ApprovalClient::new(ClientConfig::new("aa_test").with_base_url(server.uri()))
        .expect("client builds")
}

#[tokio::test]
async fn submit_sends_api_key_and_omits_unset_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/actions"))
        .and(header("X-API-Key", "aa_test"))
        .and(body_partial_json(json!({
            "action_type": "communication",
            "title": "Send email: Q4 results",
            "risk_level": "low",
            "reversible": true,
            "expires_in_seconds": 300,
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "act_1", "status": "pending"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = client
        .request_action(ActionDraft::email("john@company.com", "Q4 results"))
        .await
        .expect("create succeeds");

    assert_eq!(created.id, "act_1");
    assert_eq!(created.status, ActionState::Pending);

    // Unset optionals must be absent, not null.
    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value =
        serde_json::from_slice(&requests[0].body).expect("request body is JSON");
    let keys = body.as_object().expect("object body");
    assert!(!keys.contains_key("description"));
    assert!(!keys.contains_key("amount"));
    assert!(!keys.contains_key("currency"));
    assert!(!keys.contains_key("callback_url"));
    assert!(!keys.contains_key("metadata"));
}

#[tokio::test]
async fn rate_limit_maps_to_distinct_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/actions/act_1"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "30")
                .set_body_json(json!({"detail": "too many requests"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_status("act_1").await.expect_err("must fail");
    match err {
        ClientError::RateLimited {
            retry_after_secs,
            detail,
        } => {
            assert_eq!(retry_after_secs, Some(30));
            assert_eq!(detail, "too many requests");
        },
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn json_detail_field_is_preferred() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/actions/act_1"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"detail": "forbidden"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_status("act_1").await.expect_err("must fail");
    match err {
        ClientError::Api { status, detail } => {
            assert_eq!(status, 403);
            assert_eq!(detail, "forbidden");
        },
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_falls_back_to_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/actions/act_1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_status("act_1").await.expect_err("must fail");
    match err {
        ClientError::Api { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "upstream exploded");
        },
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn wait_stops_at_first_terminal_snapshot() {
    let server = MockServer::start().await;
    // Two pending snapshots, then approved. Expectations verify that the
    // loop performs exactly three fetches and stops.
    Mock::given(method("GET"))
        .and(path("/api/v1/actions/act_7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/actions/act_7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"status": "approved", "verified_by": "face_id:iphone"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resolution = client
        .wait_for_result("act_7", Duration::from_secs(5), Duration::from_millis(20))
        .await
        .expect("wait succeeds");

    assert_eq!(resolution.status, ActionState::Approved);
    assert_eq!(resolution.verified_by.as_deref(), Some("face_id:iphone"));
}

#[tokio::test]
async fn wait_timeout_returns_pending_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/actions/act_8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let started = Instant::now();
    let resolution = client
        .wait_for_result("act_8", Duration::from_millis(300), Duration::from_millis(50))
        .await
        .expect("timeout is not an error");

    // Still pending: the caller distinguishes this by inspecting the
    // status, not by catching anything.
    assert_eq!(resolution.status, ActionState::Pending);
    assert!(started.elapsed() < Duration::from_secs(2));

    // Polled at least once, plus the final post-timeout check.
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.len() >= 2, "got {} fetches", requests.len());
}

#[tokio::test]
async fn vault_immediate_denial_short_circuits() {
    let server = MockServer::start().await;
    // Only the create route exists: any poll or execute attempt would 404
    // and fail the test with an Api error instead of Denied.
    Mock::given(method("POST"))
        .and(path("/api/v1/actions"))
        .and(body_partial_json(json!({"metadata": {"vault_execute": true}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": "act_9", "status": "denied", "deny_reason": "host not allowed"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .execute_vault_call(VaultCall::new("openai", "POST", "https://evil.example/steal"))
        .await
        .expect_err("must be denied");

    match err {
        ClientError::Denied { request_id, reason } => {
            assert_eq!(request_id, "act_9");
            assert_eq!(reason.as_deref(), Some("host not allowed"));
        },
        other => panic!("expected Denied, got {other:?}"),
    }
    assert_eq!(
        server.received_requests().await.expect("recording").len(),
        1,
        "no polling and no execute phase after an immediate denial"
    );
}

#[tokio::test]
async fn vault_auto_approval_skips_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/actions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "act_10", "status": "approved"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/vault/execute/act_10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"status_code": 200, "body": {"choices": []}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .execute_vault_call(VaultCall::new(
            "openai",
            "POST",
            "https://api.openai.com/v1/chat/completions",
        ))
        .await
        .expect("auto-approved call executes");

    assert_eq!(response["status_code"], json!(200));
    // Exactly create + execute: zero status fetches for an already-resolved
    // request.
    assert_eq!(server.received_requests().await.expect("recording").len(), 2);
}

#[tokio::test]
async fn vault_waits_then_executes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/actions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "act_11", "status": "pending"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/actions/act_11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/actions/act_11"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "approved"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/vault/execute/act_11"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status_code": 201})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let call = VaultCall::new("github", "POST", "https://api.github.com/repos")
        .with_timeout(Duration::from_secs(5))
        .with_poll_interval(Duration::from_millis(20));
    let response = client.execute_vault_call(call).await.expect("executes");
    assert_eq!(response["status_code"], json!(201));
}

#[tokio::test]
async fn vault_expiry_maps_to_expired_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/actions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "act_12", "status": "pending"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/actions/act_12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "expired"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let call = VaultCall::new("openai", "GET", "https://api.openai.com/v1/models")
        .with_timeout(Duration::from_secs(5))
        .with_poll_interval(Duration::from_millis(20));
    let err = client.execute_vault_call(call).await.expect_err("expired");
    assert!(matches!(err, ClientError::Expired { request_id } if request_id == "act_12"));
}

#[tokio::test]
async fn history_filters_become_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/actions"))
        .and(query_param("limit", "10"))
        .and(query_param("status", "approved"))
        .and(query_param("action_type", "purchase"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "actions": [{
                "id": "act_2",
                "action_type": "purchase",
                "title": "Purchase from OpenAI",
                "status": "approved",
                "risk_level": "medium",
                "created_at": "2026-07-01T12:00:00Z",
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let history = client
        .get_history(
            HistoryFilter::default()
                .with_limit(10)
                .with_status(ActionState::Approved)
                .with_action_type(ActionType::Purchase),
        )
        .await
        .expect("history fetch succeeds");

    assert_eq!(history.actions.len(), 1);
    assert_eq!(history.actions[0].action_type, ActionType::Purchase);
}

#[tokio::test]
async fn spending_summary_parses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/agent/spending-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agent_id": "ag_1",
            "summaries": [{
                "limit_id": "lim_1",
                "action_type": "purchase",
                "period": "monthly",
                "limit": 100.0,
                "spent": 25.0,
                "remaining": 75.0,
                "utilization_pct": 25.0,
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = client.get_spending_summary().await.expect("parses");
    assert_eq!(report.agent_id, "ag_1");
    assert_eq!(report.summaries[0].remaining, 75.0);
}

#[tokio::test]
async fn vault_service_listing_unwraps_services() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/vault/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [{
                "service_name": "openai",
                "auth_type": "bearer",
                "allowed_hosts": ["api.openai.com"],
                "description": "OpenAI API key",
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let services = client.list_vault_services().await.expect("parses");
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].service_name, "openai");
    assert_eq!(services[0].allowed_hosts, vec!["api.openai.com"]);
}

#[tokio::test]
async fn pay_client_always_submits_purchase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/actions"))
        .and(body_partial_json(json!({
            "action_type": "purchase",
            "amount": 29.99,
            "currency": "USD",
            "recipient": "OpenAI",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "act_3", "status": "pending"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pay = PayClient::new(ClientConfig::new("aa_test").with_base_url(server.uri()))
        .expect("client builds");
    let created = pay
        .request_payment(Payment::new(29.99, "OpenAI").with_description("API credits"))
        .await
        .expect("payment submits");
    assert_eq!(created.id, "act_3");
}

#[tokio::test]
async fn verified_action_carries_fingerprint_metadata() {
    let server = MockServer::start().await;
    let params = match json!({"ticker": "NVDA", "quantity": 10, "price": 189.5}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let expected_hash = vouch_core::fingerprint::content_hash(&params);

    Mock::given(method("POST"))
        .and(path("/api/v1/actions"))
        .and(body_partial_json(json!({
            "metadata": {
                "wysiwys": true,
                "content_hash": expected_hash.clone(),
                "params": {"ticker": "NVDA", "quantity": 10, "price": 189.5},
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "act_4",
            "status": "pending",
            "content_hash": expected_hash,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = client
        .request_verified_action(
            ActionType::Purchase,
            "Buy 10x NVDA",
            RiskLevel::High,
            params.clone(),
        )
        .await
        .expect("submits");

    // Backend-reported hash matches the local recomputation.
    assert!(created.matches_params(&params));
}

#[tokio::test]
async fn malformed_verified_parameters_fail_before_any_call() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let err = client
        .request_verified_action_json(ActionType::Purchase, "Buy", RiskLevel::High, "{not json")
        .await
        .expect_err("must fail");

    assert!(matches!(err, ClientError::InvalidParams(_)));
    assert!(
        server
            .received_requests()
            .await
            .expect("recording")
            .is_empty(),
        "malformed parameters must be rejected before any network call"
    );
}
