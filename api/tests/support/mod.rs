//! Shared harness for router-level tests: the real router over in-memory
//! stores, with pinned clock and sequential ids.

#![allow(dead_code)] // each test binary uses a subset of the helpers

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use medbook_api::{AppState, BookingLifecycle, build_router};
use medbook_core::store::SessionStore;
use medbook_testing::{
    InMemoryBookingStore, InMemoryPracticeStore, InMemoryProviderStore, InMemorySessionStore,
    RecordingEvents, SequentialIds, fixtures, test_clock,
};
use std::sync::Arc;
use tower::ServiceExt;

/// The router plus handles on the doubles behind it.
pub struct TestApp {
    pub router: Router,
    pub bookings: Arc<InMemoryBookingStore>,
    pub sessions: Arc<InMemorySessionStore>,
    pub practices: Arc<InMemoryPracticeStore>,
    pub providers: Arc<InMemoryProviderStore>,
    pub events: Arc<RecordingEvents>,
}

/// Build the application over empty in-memory stores.
pub fn app() -> TestApp {
    let bookings = Arc::new(InMemoryBookingStore::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let practices = Arc::new(InMemoryPracticeStore::new());
    let providers = Arc::new(InMemoryProviderStore::new());
    let events = Arc::new(RecordingEvents::new());
    let clock = Arc::new(test_clock());
    let ids = Arc::new(SequentialIds::new());

    let lifecycle = Arc::new(BookingLifecycle::new(
        bookings.clone(),
        sessions.clone(),
        clock.clone(),
        ids.clone(),
        events.clone(),
    ));

    let state = AppState::new(
        lifecycle,
        sessions.clone(),
        practices.clone(),
        providers.clone(),
        clock,
        ids,
    );

    TestApp {
        router: build_router(state),
        bookings,
        sessions,
        practices,
        providers,
        events,
    }
}

/// Build the application with the standard session fixture already
/// seeded.
pub async fn app_with_session() -> TestApp {
    let app = app();
    app.sessions
        .put(fixtures::session())
        .await
        .expect("seeding the in-memory store cannot fail");
    app
}

impl TestApp {
    /// Send a GET and decode the JSON response.
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// Send a JSON POST and decode the JSON response.
    pub async fn post_json(
        &self,
        uri: &str,
        body: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.post_json_with_headers(uri, body, &[]).await
    }

    /// Send a JSON POST with extra headers and decode the JSON response.
    pub async fn post_json_with_headers(
        &self,
        uri: &str,
        body: &serde_json::Value,
        headers: &[(&str, &str)],
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// Send a POST with no body at all.
    pub async fn post_empty(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never errors");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body is readable");
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, value)
    }
}

/// A valid creation payload matching the standard session fixture.
pub fn valid_booking_payload() -> serde_json::Value {
    serde_json::json!({
        "contact": {
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "phone": "0400000000",
            "preferredChannel": "email"
        },
        "slotRef": {
            "slotId": "sess_1_09:00",
            "providerId": "prov_1",
            "practiceId": "prac_1",
            "start": "2025-03-10T09:00:00Z",
            "end": "2025-03-10T09:15:00Z"
        }
    })
}
