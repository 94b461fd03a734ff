//! End-to-end booking lifecycle through the real router.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Integration tests can unwrap

mod support;

use axum::http::StatusCode;
use medbook_core::store::BookingStore;
use medbook_core::types::BookingId;
use serde_json::json;
use support::{app, app_with_session, valid_booking_payload};

#[tokio::test]
async fn health_endpoints_respond() {
    let app = app();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn full_lifecycle_create_confirm_reconfirm_get() {
    let app = app_with_session().await;

    // Create: 201, PENDING, a 6-char uppercase alphanumeric code
    let (status, created) = app
        .post_json("/v1/bookings", &valid_booking_payload())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["tenantId"], "prac_1");
    assert_eq!(
        created["message"],
        "Booking created successfully. Please check your email for confirmation."
    );
    let code = created["confirmationCode"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(
        code.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );
    let booking_id = created["bookingId"].as_str().unwrap().to_string();

    // Confirm with the correct code: 200, CONFIRMED
    let (status, confirmed) = app
        .post_json(
            &format!("/v1/bookings/{booking_id}/confirm"),
            &json!({ "confirmationCode": code }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "CONFIRMED");
    assert_eq!(confirmed["message"], "Booking confirmed successfully");

    // Confirm again: 409, not in pending status
    let (status, body) = app
        .post_json(
            &format!("/v1/bookings/{booking_id}/confirm"),
            &json!({ "confirmationCode": code }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Booking is not in pending status");

    // Get: 200, CONFIRMED, and the idempotency key is absent
    let (status, fetched) = app.get(&format!("/v1/bookings/{booking_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "CONFIRMED");
    assert!(fetched.get("idempotencyKey").is_none());
    assert!(fetched.get("message").is_none());
}

#[tokio::test]
async fn create_without_session_is_conflict_and_persists_nothing() {
    let app = app(); // no session seeded

    let (status, body) = app
        .post_json("/v1/bookings", &valid_booking_payload())
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Slot no longer available");
    assert!(app.bookings.is_empty());
}

#[tokio::test]
async fn create_with_malformed_body_is_a_validation_failure() {
    let app = app_with_session().await;

    // contact is missing entirely: rejected at the strict JSON boundary
    let (status, body) = app
        .post_json(
            "/v1/bookings",
            &json!({
                "slotRef": {
                    "slotId": "sess_1_09:00",
                    "providerId": "prov_1",
                    "practiceId": "prac_1",
                    "start": "2025-03-10T09:00:00Z",
                    "end": "2025-03-10T09:15:00Z"
                }
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"].is_array());
    assert!(app.bookings.is_empty());
}

#[tokio::test]
async fn create_with_unknown_fields_is_rejected() {
    let app = app_with_session().await;

    let mut payload = valid_booking_payload();
    payload["status"] = json!("CONFIRMED");

    let (status, body) = app.post_json("/v1/bookings", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
}

#[tokio::test]
async fn create_with_empty_contact_fields_reports_them() {
    let app = app_with_session().await;

    let mut payload = valid_booking_payload();
    payload["contact"]["firstName"] = json!("");
    payload["contact"]["email"] = json!("not-an-email");

    let (status, body) = app.post_json("/v1/bookings", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["contact.firstName", "contact.email"]);
}

#[tokio::test]
async fn supplied_idempotency_key_is_recorded_but_never_returned() {
    let app = app_with_session().await;

    let (status, created) = app
        .post_json_with_headers(
            "/v1/bookings",
            &valid_booking_payload(),
            &[("idempotency-key", "idem_from_caller")],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("idempotencyKey").is_none());

    let booking_id = created["bookingId"].as_str().unwrap();
    let record = app
        .bookings
        .fetch(BookingId::new(booking_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.idempotency_key.as_str(), "idem_from_caller");
}

#[tokio::test]
async fn get_unknown_booking_is_not_found() {
    let app = app();

    let (status, body) = app.get("/v1/bookings/book_missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Booking not found");
}

#[tokio::test]
async fn confirm_with_wrong_code_is_rejected_and_status_unchanged() {
    let app = app_with_session().await;

    let (_, created) = app
        .post_json("/v1/bookings", &valid_booking_payload())
        .await;
    let booking_id = created["bookingId"].as_str().unwrap().to_string();

    let (status, body) = app
        .post_json(
            &format!("/v1/bookings/{booking_id}/confirm"),
            &json!({ "confirmationCode": "WRONG1" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid confirmation code");

    let (_, fetched) = app.get(&format!("/v1/bookings/{booking_id}")).await;
    assert_eq!(fetched["status"], "PENDING");
}

#[tokio::test]
async fn confirm_without_body_is_permitted() {
    let app = app_with_session().await;

    let (_, created) = app
        .post_json("/v1/bookings", &valid_booking_payload())
        .await;
    let booking_id = created["bookingId"].as_str().unwrap().to_string();

    // No body, no content-type: confirmation without proof goes through.
    let (status, confirmed) = app
        .post_empty(&format!("/v1/bookings/{booking_id}/confirm"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "CONFIRMED");
}

#[tokio::test]
async fn confirm_unknown_booking_is_not_found() {
    let app = app();

    let (status, body) = app.post_empty("/v1/bookings/book_missing/confirm").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Booking not found");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app();

    let response = {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;
        app.router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("X-Request-Id", "req-test-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    };

    assert_eq!(
        response.headers().get("X-Request-Id").unwrap(),
        "req-test-1"
    );
}
