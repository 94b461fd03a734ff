//! Axum integration for the Medbook platform.
//!
//! This crate bridges the domain layer and HTTP:
//!
//! - [`AppError`]: translates domain failures into JSON error responses
//!   with a stable `error` message field (and `details` for validation
//!   failures)
//! - [`extractors`]: strict JSON bodies, the tenant claim injected by the
//!   fronting auth layer, and the optional `idempotency-key` header
//! - [`middleware`]: per-request id tracking with a tracing span
//!
//! # Request Flow
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Extract** the typed payload, claims and headers
//! 3. **Call** the lifecycle manager or store
//! 4. **Map** the domain result (or error) to a JSON response
//!
//! Handlers return `Result<Json<T>, AppError>`; no error propagates as an
//! unhandled fault.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{IdempotencyKeyHeader, RequestId, StrictJson, TenantClaim};
pub use middleware::{REQUEST_ID_HEADER, request_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
