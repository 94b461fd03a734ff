//! Medbook booking service.
//!
//! A multi-tenant medical-practice booking API. The interesting part is
//! the booking lifecycle: idempotent-by-identifier creation against a
//! best-effort slot-availability check, and a status state machine whose
//! single transition (`PENDING → CONFIRMED`) is guarded by a
//! compare-and-swap at the storage layer.
//!
//! # Layout
//!
//! - [`lifecycle`]: the booking lifecycle manager (the domain core)
//! - [`api`]: HTTP handlers per resource
//! - [`server`]: router, shared state, health endpoints
//! - [`config`]: environment-derived configuration, loaded once at startup
//!
//! # Request Flow
//!
//! ```text
//! request ─► extractors (strict JSON, claims, headers)
//!         ─► lifecycle manager / store
//!         ─► conditional write (create-if-absent, status CAS)
//!         ─► JSON response or typed error
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod lifecycle;
pub mod server;

pub use config::Config;
pub use lifecycle::{BookingError, BookingLifecycle, FieldViolation};
pub use server::{AppState, build_router};
