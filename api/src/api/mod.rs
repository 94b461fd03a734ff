//! HTTP API endpoints.
//!
//! One module per resource, plus the translation of domain errors into
//! HTTP responses. Handlers stay thin: extract, call the lifecycle
//! manager or store, map the result.

pub mod bookings;
pub mod practices;
pub mod providers;
pub mod slots;

use crate::lifecycle::BookingError;
use medbook_web::AppError;

impl From<BookingError> for AppError {
    fn from(error: BookingError) -> Self {
        let message = error.to_string();
        match error {
            BookingError::Validation(violations) => Self::validation(violations),
            BookingError::MissingBookingId => Self::bad_request(message),
            BookingError::InvalidConfirmationCode(_) => Self::bad_request(message),
            BookingError::NotFound(_) => Self::not_found(message),
            BookingError::SlotUnavailable { .. }
            | BookingError::DuplicateRequest(_)
            | BookingError::NotPending(_) => Self::conflict(message),
            BookingError::Store(store_error) => {
                Self::internal().with_source(anyhow::Error::new(store_error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use medbook_core::store::StoreError;
    use medbook_core::types::BookingId;

    #[test]
    fn domain_errors_map_to_spec_status_codes() {
        let id = || BookingId::new("book_1");
        let cases = [
            (BookingError::MissingBookingId, StatusCode::BAD_REQUEST),
            (
                BookingError::InvalidConfirmationCode(id()),
                StatusCode::BAD_REQUEST,
            ),
            (BookingError::NotFound(id()), StatusCode::NOT_FOUND),
            (BookingError::DuplicateRequest(id()), StatusCode::CONFLICT),
            (BookingError::NotPending(id()), StatusCode::CONFLICT),
            (
                BookingError::Store(StoreError::Backend("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(AppError::from(error).status(), status);
        }
    }

    #[test]
    fn messages_are_the_stable_spec_strings() {
        assert_eq!(
            AppError::from(BookingError::NotPending(BookingId::new("b"))).message(),
            "Booking is not in pending status"
        );
        assert_eq!(
            AppError::from(BookingError::NotFound(BookingId::new("b"))).message(),
            "Booking not found"
        );
        assert_eq!(
            AppError::from(BookingError::Store(StoreError::Backend("x".to_string()))).message(),
            "Internal server error"
        );
    }
}
