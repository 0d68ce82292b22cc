//! Application layer for PyroStage.
//!
//! Sits between the domain and the infrastructure/API layers: orchestrates
//! ledger operations and content CRUD through repository ports, enforces
//! authorization context, and dispatches fire-and-forget notifications.
//!
//! ## Modules
//!
//! - `services` - business services (BookingService, ContactService, ...)
//! - `validation` - input validation framework and request types

pub mod services;
pub mod validation;

pub use services::{
    Clock, NoOpNotifier, Notifier, ServiceConfig, ServiceContext, SystemClock,
};
pub use validation::{Validatable, ValidationResult, ValidationRules};

use pyrostage_domain::errors::{BookingError, ContentError};
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication required
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Resource conflict (e.g. duplicate slug)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Booking ledger errors, kept typed end-to-end
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// Content entity errors
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Transient storage conflict; retried internally before surfacing
    #[error("Transient storage conflict: {0}")]
    TransientConflict(String),

    /// Storage unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::ValidationFailed(_) => 400,
            Self::Conflict(_) => 409,
            Self::Booking(BookingError::NotFound(_)) => 404,
            Self::Booking(_) => 400,
            Self::Content(ContentError::DuplicateSlug(_)) => 409,
            Self::Content(_) => 404,
            Self::TransientConflict(_) => 503,
            Self::ServiceUnavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransientConflict(_) | Self::ServiceUnavailable(_)
        )
    }

    /// Machine-readable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::Conflict(_) => "CONFLICT",
            Self::Booking(BookingError::NotFound(_)) => "NOT_FOUND",
            Self::Booking(BookingError::InvalidStatusTransition { .. }) => "INVALID_TRANSITION",
            Self::Booking(_) => "BOOKING_ERROR",
            Self::Content(ContentError::DuplicateSlug(_)) => "CONFLICT",
            Self::Content(_) => "NOT_FOUND",
            Self::TransientConflict(_) => "TRANSIENT_CONFLICT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pyrostage_domain::booking::BookingStatus;
    use pyrostage_domain::identifiers::BookingId;

    #[test]
    fn test_error_http_status() {
        assert_eq!(ApplicationError::NotFound("x".into()).http_status(), 404);
        assert_eq!(ApplicationError::Unauthorized("x".into()).http_status(), 401);
        assert_eq!(ApplicationError::Forbidden("x".into()).http_status(), 403);
        assert_eq!(
            ApplicationError::ValidationFailed("x".into()).http_status(),
            400
        );
        assert_eq!(ApplicationError::Conflict("x".into()).http_status(), 409);
        assert_eq!(
            ApplicationError::Booking(BookingError::NotFound(BookingId::new())).http_status(),
            404
        );
        assert_eq!(
            ApplicationError::Booking(BookingError::InvalidStatusTransition {
                from: BookingStatus::Pending,
                to: BookingStatus::Completed,
            })
            .http_status(),
            400
        );
    }

    #[test]
    fn test_error_retryable() {
        assert!(ApplicationError::TransientConflict("x".into()).is_retryable());
        assert!(ApplicationError::ServiceUnavailable("x".into()).is_retryable());
        assert!(!ApplicationError::NotFound("x".into()).is_retryable());
        assert!(!ApplicationError::ValidationFailed("x".into()).is_retryable());
    }

    #[test]
    fn test_transition_error_code() {
        let err = ApplicationError::Booking(BookingError::InvalidStatusTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Pending,
        });
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }
}
