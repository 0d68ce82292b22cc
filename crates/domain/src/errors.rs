//! Error types for the PyroStage domain.
//!
//! The ledger and content errors defined here stay typed all the way to
//! the API layer, which maps them onto HTTP status codes. Cross-cutting
//! failure kinds (validation, authorization, storage) live in the
//! application layer's error type.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::booking::BookingStatus;
use crate::identifiers::{BookingId, ContactMessageId, ServiceId, TestimonialId};

/// Failure to parse a string-backed enum value.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Booking ledger errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    /// Booking not found
    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    /// Requested status change not permitted from the current state
    #[error("Booking status transition not allowed: {from} -> {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Event date violates the minimum advance-booking window
    #[error("Event date {event_date} is inside the minimum lead time of {min_lead_days} days")]
    EventDateTooSoon {
        event_date: NaiveDate,
        min_lead_days: i64,
    },

    /// Payment amount must be strictly positive
    #[error("Payment amount must be positive, got {amount}")]
    NonPositivePayment { amount: Decimal },
}

/// Content entity errors (contacts, catalog, testimonials, newsletter)
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContentError {
    #[error("Contact message not found: {0}")]
    ContactNotFound(ContactMessageId),

    #[error("Service offering not found: {0}")]
    ServiceNotFound(ServiceId),

    #[error("Service offering not found for slug: {0}")]
    ServiceSlugNotFound(String),

    #[error("Duplicate service slug: {0}")]
    DuplicateSlug(String),

    #[error("Testimonial not found: {0}")]
    TestimonialNotFound(TestimonialId),

    #[error("Subscriber not found for email: {0}")]
    SubscriberNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_names_both_statuses() {
        let err = BookingError::InvalidStatusTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Confirmed,
        };
        let msg = err.to_string();
        assert!(msg.contains("cancelled"));
        assert!(msg.contains("confirmed"));
    }

    #[test]
    fn lead_time_error_carries_the_window() {
        let err = BookingError::EventDateTooSoon {
            event_date: NaiveDate::from_ymd_opt(2025, 5, 4).unwrap(),
            min_lead_days: 7,
        };
        assert!(err.to_string().contains("7 days"));
    }

    #[test]
    fn unknown_variant_message() {
        let err = UnknownVariant::new("venue_type", "underwater");
        assert_eq!(err.to_string(), "unknown venue_type value: underwater");
    }
}
