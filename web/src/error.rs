//! Error types for web handlers.
//!
//! This module defines the error type that bridges between domain errors
//! and HTTP responses, implementing Axum's `IntoResponse` trait.
//!
//! Every response body has the shape `{"error": <message>}`, with a
//! `details` array added for validation failures. Callers are expected to
//! branch on the status code first and the message second, so messages
//! are stable strings.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps a status code, a stable user-facing message, optional
/// field-level details and an internal source error that is logged but
/// never exposed to the client.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<Booking>, AppError> {
///     let booking = lifecycle.get(&id).await
///         .map_err(AppError::from)?;
///     Ok(Json(booking))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing, stable)
    message: String,
    /// Field-level details (validation failures)
    details: Option<serde_json::Value>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            details: None,
            source: None,
        }
    }

    /// Attach an internal source error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into())
    }

    /// Create a 400 validation error carrying field-level details.
    ///
    /// The message is always `Validation failed`; the details identify
    /// the offending fields.
    #[must_use]
    pub fn validation(details: impl Serialize) -> Self {
        let mut error = Self::bad_request("Validation failed");
        error.details = serde_json::to_value(details).ok();
        error
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into())
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message.into())
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message.into())
    }

    /// Create a 500 Internal Server Error with the generic message.
    ///
    /// Internal detail never leaks into the body; attach it with
    /// [`AppError::with_source`] so it reaches the log instead.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Stable, human-readable error message.
    error: String,
    /// Field-level details, present for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors with their source; clients only see the
        // generic message.
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    error = %source,
                    "internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    "internal server error"
                );
            }
        }

        let body = ErrorResponse {
            error: self.message,
            details: self.details,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal().with_source(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Booking ID is required");
        assert_eq!(
            err.to_string(),
            "[400 Bad Request] Booking ID is required"
        );
    }

    #[tokio::test]
    async fn body_carries_stable_error_field() {
        let (status, body) = body_json(AppError::not_found("Booking not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Booking not found");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn validation_body_carries_details() {
        let details = vec![serde_json::json!({
            "field": "contact.email",
            "message": "must be a valid email address"
        })];
        let (status, body) = body_json(AppError::validation(details)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "contact.email");
    }

    #[tokio::test]
    async fn internal_error_hides_its_source() {
        let (status, body) = body_json(
            AppError::internal().with_source(anyhow::anyhow!("connection refused")),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("connection refused"));
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = AppError::conflict("Slot no longer available");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Slot no longer available");
    }
}
