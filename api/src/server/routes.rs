//! Router configuration for the booking service.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{health_check, readiness_check};
use super::state::AppState;
use crate::api::{bookings, practices, providers, slots};
use axum::{
    Router,
    routing::{get, post},
};
use medbook_web::middleware::request_id_layer;

/// Build the complete Axum router.
///
/// - Health checks at the root (`/health`, `/ready`)
/// - Versioned API under `/v1`: bookings, slot search, practices,
///   providers
/// - Request-id middleware across everything
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        // Booking lifecycle
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:bookingId", get(bookings::get_booking))
        .route(
            "/bookings/:bookingId/confirm",
            post(bookings::confirm_booking),
        )
        // Slot search
        .route("/slots", get(slots::search_slots))
        // Catalog
        .route(
            "/practices",
            post(practices::create_practice).get(practices::list_practices),
        )
        .route("/practices/:practiceId", get(practices::get_practice))
        .route(
            "/providers",
            post(providers::create_provider).get(providers::list_providers),
        )
        .route("/providers/:providerId", get(providers::get_provider));

    Router::new()
        // Health checks (no versioning)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // API routes under /v1 prefix
        .nest("/v1", v1_routes)
        .layer(request_id_layer())
        .with_state(state)
}
