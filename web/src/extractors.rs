//! Custom Axum extractors.
//!
//! This module contains the extractors handlers compose with:
//! - [`StrictJson`]: a typed JSON body whose parse failures become the
//!   same 400 validation body the domain produces
//! - [`TenantClaim`]: the tenant scope injected by the fronting auth
//!   layer as the `x-tenant-id` header
//! - [`IdempotencyKeyHeader`]: the optional `idempotency-key` request
//!   header read on booking creation
//! - [`RequestId`]: the per-request id placed in extensions by the
//!   middleware
//!
//! # Examples
//!
//! ```ignore
//! async fn create_booking(
//!     State(state): State<AppState>,
//!     IdempotencyKeyHeader(key): IdempotencyKeyHeader,
//!     StrictJson(draft): StrictJson<BookingDraft>,
//! ) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
//!     let booking = state.lifecycle.create(draft, key).await?;
//!     // …
//! }
//! ```

use crate::error::AppError;
use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection},
    http::request::Parts,
};
use medbook_core::types::{IdempotencyKey, TenantId};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Header carrying the tenant claim, injected by the auth layer in front
/// of this service.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Header carrying a caller-supplied idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Strictly parsed JSON body.
///
/// Wraps `axum::Json` so that shape mismatches (missing fields, unknown
/// fields, malformed timestamps, invalid JSON) surface as the standard
/// 400 validation body instead of Axum's plain-text rejection. This is
/// the parse-into-typed-struct boundary: nothing duck-typed gets past it.
#[derive(Debug, Clone, Copy)]
pub struct StrictJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject_body(&rejection)),
        }
    }
}

fn reject_body(rejection: &JsonRejection) -> AppError {
    AppError::validation(vec![serde_json::json!({
        "field": "body",
        "message": rejection.body_text(),
    })])
}

/// The tenant scope of the authenticated caller.
///
/// The identity provider integration lives outside this service; by the
/// time a request arrives here, the auth layer has resolved the caller's
/// tenant and injected it as the `x-tenant-id` header. Absence of the
/// claim on a tenant-scoped operation is a 401.
#[derive(Debug, Clone)]
pub struct TenantClaim(pub TenantId);

#[async_trait]
impl<S> FromRequestParts<S> for TenantClaim
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Self(TenantId::new(value)))
            .ok_or_else(|| AppError::unauthorized("Tenant ID not found"))
    }
}

/// The optional `idempotency-key` header.
///
/// Booking creation records the supplied key (or generates one when the
/// header is absent). Extraction never fails; a missing header yields
/// `None`.
#[derive(Debug, Clone)]
pub struct IdempotencyKeyHeader(pub Option<IdempotencyKey>);

#[async_trait]
impl<S> FromRequestParts<S> for IdempotencyKeyHeader
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(IDEMPOTENCY_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(IdempotencyKey::new);

        Ok(Self(key))
    }
}

/// Per-request id for log correlation.
///
/// Reads the id placed in request extensions by
/// [`crate::middleware::request_id_layer`], falling back to the
/// `X-Request-Id` header or a fresh UUID when the middleware is not
/// installed.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(id.clone());
        }

        let id = parts
            .headers
            .get(crate::middleware::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

        Ok(Self(id))
    }
}
