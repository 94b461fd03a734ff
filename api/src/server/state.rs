//! Application state for the booking HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers: the booking
//! lifecycle manager and the stores the read-side endpoints query
//! directly. Everything is behind `Arc`, so cloning per request is
//! cheap.

use crate::lifecycle::BookingLifecycle;
use medbook_core::environment::{Clock, IdSource};
use medbook_core::store::{PracticeStore, ProviderStore, SessionStore};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The booking lifecycle manager (create / get / confirm).
    pub lifecycle: Arc<BookingLifecycle>,

    /// Session documents, for slot search.
    pub sessions: Arc<dyn SessionStore>,

    /// Practice records.
    pub practices: Arc<dyn PracticeStore>,

    /// Provider records.
    pub providers: Arc<dyn ProviderStore>,

    /// Clock, for search-range defaults and record timestamps.
    pub clock: Arc<dyn Clock>,

    /// Id source, for catalog record ids.
    pub ids: Arc<dyn IdSource>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        lifecycle: Arc<BookingLifecycle>,
        sessions: Arc<dyn SessionStore>,
        practices: Arc<dyn PracticeStore>,
        providers: Arc<dyn ProviderStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdSource>,
    ) -> Self {
        Self {
            lifecycle,
            sessions,
            practices,
            providers,
            clock,
            ids,
        }
    }
}
