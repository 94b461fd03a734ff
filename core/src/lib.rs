//! # Medbook Core
//!
//! Domain types and store abstractions for the Medbook booking platform.
//!
//! This crate defines the shared vocabulary of the system:
//!
//! - **Identifiers**: opaque, prefixed ids for bookings, tenants, practices,
//!   providers, slots and sessions
//! - **Booking**: the central entity with its status state machine
//! - **Session**: the per-provider, per-day availability document that
//!   booking creation reads
//! - **Catalog**: practice and provider records
//! - **Stores**: dyn-compatible traits over a document store with
//!   conditional-write semantics (the only concurrency mechanism in the
//!   system)
//! - **Environment**: injected dependencies (clock, id source) so business
//!   logic stays deterministic under test
//!
//! # Concurrency Model
//!
//! Request handlers are stateless; correctness comes entirely from two
//! storage primitives:
//!
//! - `put_new`: atomically fails when the key already exists
//! - `transition`: compare-and-swap on the booking status field
//!
//! No locks, no multi-record transactions. See [`store`] for the contract.
//!
//! # Implementations
//!
//! - `medbook-postgres`: production stores backed by PostgreSQL
//! - `medbook-testing`: in-memory stores for fast, deterministic tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod booking;
pub mod catalog;
pub mod environment;
pub mod events;
pub mod session;
pub mod store;
pub mod types;

pub use booking::{Booking, BookingDraft, BookingRecord, BookingStatus};
pub use catalog::{Practice, PracticeDraft, Provider, ProviderDraft};
pub use environment::{Clock, IdSource, RandomIds, SystemClock};
pub use events::{BookingEvents, LogBookingEvents};
pub use session::{Session, SessionSlot, Slot};
pub use store::{
    BookingStore, PracticeStore, ProviderStore, SessionStore, StoreError, StoreFuture,
};
pub use types::{
    BookingId, Channel, ConfirmationCode, Contact, IdempotencyKey, PatientId, PracticeId,
    ProviderId, SessionId, SlotId, SlotRef, TenantId,
};
