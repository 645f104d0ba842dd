//! Hosted checkout and webhook reconciliation integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

// ============================================================================
// Checkout session creation
// ============================================================================

#[tokio::test]
async fn checkout_session_returns_redirect_url() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/checkout-session")
        .add_header("x-platform-user-id", harness.user_id_header())
        .json(&json!({
            "amount_cents": 2000,
            "success_url": "https://app.example/billing/success",
            "cancel_url": "https://app.example/billing/cancel"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let session_url = body["session_url"].as_str().unwrap();
    assert!(session_url.starts_with("https://checkout.example/"));

    let sessions = harness.processor.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].amount_cents, 2000);
    assert_eq!(sessions[0].success_url, "https://app.example/billing/success");
}

#[tokio::test]
async fn checkout_session_enforces_minimum() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/checkout-session")
        .add_header("x-platform-user-id", harness.user_id_header())
        .json(&json!({
            "amount_cents": 499,
            "success_url": "https://app.example/s",
            "cancel_url": "https://app.example/c"
        }))
        .await;

    response.assert_status_bad_request();
    assert!(harness.processor.sessions().is_empty());
}

#[tokio::test]
async fn checkout_session_requires_identity() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/checkout-session")
        .json(&json!({
            "amount_cents": 2000,
            "success_url": "https://app.example/s",
            "cancel_url": "https://app.example/c"
        }))
        .await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Webhook reconciliation
// ============================================================================

fn completed_session_payload(event_id: &str, customer_ref: &str, amount_cents: i64) -> String {
    json!({
        "id": event_id,
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "payment_status": "paid",
                "amount_total": amount_cents,
                "metadata": {
                    "customer_ref": customer_ref,
                    "purpose": "add_credit",
                    "amount_cents": amount_cents.to_string()
                }
            }
        }
    })
    .to_string()
}

async fn post_webhook(harness: &TestHarness, payload: &str) -> axum_test::TestResponse {
    harness
        .server
        .post("/webhooks/stripe")
        .add_header("stripe-signature", harness.sign_webhook(payload))
        .text(payload.to_string())
        .await
}

async fn remaining_cents(harness: &TestHarness) -> i64 {
    let response = harness
        .server
        .get("/v1/credit")
        .add_header("x-platform-user-id", harness.user_id_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["remaining_cents"].as_i64().unwrap()
}

#[tokio::test]
async fn completed_checkout_credits_the_customer() {
    let harness = TestHarness::new();
    let customer_ref = harness.ensure_customer().await;

    let payload = completed_session_payload("evt_1", &customer_ref, 2000);
    let response = post_webhook(&harness, &payload).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["received"], true);

    assert_eq!(remaining_cents(&harness).await, 2000);

    let transactions = harness.processor.transactions(&customer_ref);
    let top_up = transactions.last().unwrap();
    assert_eq!(top_up.amount_cents, -2000);
    assert_eq!(top_up.description, "Payment via hosted checkout");
}

#[tokio::test]
async fn redelivered_webhook_does_not_double_credit() {
    let harness = TestHarness::new();
    let customer_ref = harness.ensure_customer().await;

    let payload = completed_session_payload("evt_1", &customer_ref, 2000);
    post_webhook(&harness, &payload).await.assert_status_ok();
    post_webhook(&harness, &payload).await.assert_status_ok();

    assert_eq!(remaining_cents(&harness).await, 2000);
}

#[tokio::test]
async fn distinct_events_credit_independently() {
    let harness = TestHarness::new();
    let customer_ref = harness.ensure_customer().await;

    let first = completed_session_payload("evt_1", &customer_ref, 2000);
    let second = completed_session_payload("evt_2", &customer_ref, 500);
    post_webhook(&harness, &first).await.assert_status_ok();
    post_webhook(&harness, &second).await.assert_status_ok();

    assert_eq!(remaining_cents(&harness).await, 2500);
}

#[tokio::test]
async fn invalid_signature_is_rejected() {
    let harness = TestHarness::new();
    let customer_ref = harness.ensure_customer().await;

    let payload = completed_session_payload("evt_1", &customer_ref, 2000);
    let response = harness
        .server
        .post("/webhooks/stripe")
        .add_header("stripe-signature", "t=1700000000,v1=deadbeef")
        .text(payload)
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "webhook_signature_invalid");
    assert_eq!(remaining_cents(&harness).await, 0);
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let harness = TestHarness::new();
    let customer_ref = harness.ensure_customer().await;

    let payload = completed_session_payload("evt_1", &customer_ref, 2000);
    let response = harness
        .server
        .post("/webhooks/stripe")
        .text(payload)
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn unset_webhook_secret_rejects_all_deliveries() {
    let harness = TestHarness::with_config(|config| config.stripe_webhook_secret = None);
    let customer_ref = harness.ensure_customer().await;

    let payload = completed_session_payload("evt_1", &customer_ref, 2000);
    let response = harness
        .server
        .post("/webhooks/stripe")
        .add_header("stripe-signature", "t=1700000000,v1=deadbeef")
        .text(payload)
        .await;

    response.assert_status_bad_request();
    assert_eq!(remaining_cents(&harness).await, 0);
}

#[tokio::test]
async fn unpaid_session_is_acknowledged_without_credit() {
    let harness = TestHarness::new();
    let customer_ref = harness.ensure_customer().await;

    let payload = json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "payment_status": "unpaid",
                "metadata": {
                    "customer_ref": customer_ref,
                    "purpose": "add_credit",
                    "amount_cents": "2000"
                }
            }
        }
    })
    .to_string();

    post_webhook(&harness, &payload).await.assert_status_ok();
    assert_eq!(remaining_cents(&harness).await, 0);
}

#[tokio::test]
async fn sessions_with_other_purposes_are_ignored() {
    let harness = TestHarness::new();
    let customer_ref = harness.ensure_customer().await;

    let payload = json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "payment_status": "paid",
                "amount_total": 2000,
                "metadata": {
                    "customer_ref": customer_ref,
                    "purpose": "subscription"
                }
            }
        }
    })
    .to_string();

    post_webhook(&harness, &payload).await.assert_status_ok();
    assert_eq!(remaining_cents(&harness).await, 0);
}

#[tokio::test]
async fn unhandled_event_types_are_acknowledged() {
    let harness = TestHarness::new();

    let payload = json!({
        "id": "evt_1",
        "type": "payment_intent.succeeded",
        "data": { "object": { "id": "pi_1" } }
    })
    .to_string();

    let response = post_webhook(&harness, &payload).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["received"], true);
}
