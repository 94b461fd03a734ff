//! Booking endpoints.
//!
//! - `POST /v1/bookings` — create a booking (reads the optional
//!   `idempotency-key` header)
//! - `GET /v1/bookings/:bookingId` — fetch a booking
//! - `POST /v1/bookings/:bookingId/confirm` — confirm a pending booking
//!
//! The create and confirm responses carry the booking plus a
//! human-readable `message`; the confirmation code is included so the
//! creator can present it back on confirmation.

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use medbook_core::Booking;
use medbook_core::booking::BookingDraft;
use medbook_core::types::BookingId;
use medbook_web::{AppError, IdempotencyKeyHeader, StrictJson};
use serde::{Deserialize, Serialize};

/// A booking plus a human-readable outcome message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithMessage {
    /// The booking, in its public shape.
    #[serde(flatten)]
    pub booking: Booking,
    /// Outcome message for the caller.
    pub message: String,
}

/// Create a new booking.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/v1/bookings \
///   -H "Content-Type: application/json" \
///   -H "idempotency-key: idem_b2c3" \
///   -d '{
///     "contact": {
///       "firstName": "Jane", "lastName": "Doe",
///       "email": "jane@example.com", "phone": "0400000000"
///     },
///     "slotRef": {
///       "slotId": "sess_1_09:00", "providerId": "prov_1",
///       "practiceId": "prac_1",
///       "start": "2025-03-10T09:00:00Z", "end": "2025-03-10T09:15:00Z"
///     }
///   }'
/// ```
///
/// # Errors
///
/// 400 on validation failure (with `details`), 409 when the slot's
/// session is gone or the key collides, 500 on storage failure.
pub async fn create_booking(
    State(state): State<AppState>,
    IdempotencyKeyHeader(idempotency_key): IdempotencyKeyHeader,
    StrictJson(draft): StrictJson<BookingDraft>,
) -> Result<(StatusCode, Json<BookingWithMessage>), AppError> {
    let booking = state.lifecycle.create(draft, idempotency_key).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingWithMessage {
            booking,
            message: "Booking created successfully. Please check your email for confirmation."
                .to_string(),
        }),
    ))
}

/// Fetch a booking by id.
///
/// Public read path: no tenant scoping, and the internal idempotency key
/// is not part of the response.
///
/// # Errors
///
/// 400 on a blank id, 404 when unknown, 500 on storage failure.
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.lifecycle.get(&BookingId::new(booking_id)).await?;
    Ok(Json(booking))
}

/// Request body for confirmation; the code is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfirmBookingRequest {
    /// The code handed out at creation.
    pub confirmation_code: Option<String>,
}

/// Confirm a pending booking.
///
/// # Errors
///
/// 400 on a blank id or a mismatched code, 404 when unknown, 409 when
/// the booking is not in pending status, 500 on storage failure.
pub async fn confirm_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    body: Option<Json<ConfirmBookingRequest>>,
) -> Result<Json<BookingWithMessage>, AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let booking = state
        .lifecycle
        .confirm(
            &BookingId::new(booking_id),
            request.confirmation_code.as_deref(),
        )
        .await?;

    Ok(Json(BookingWithMessage {
        booking,
        message: "Booking confirmed successfully".to_string(),
    }))
}
