//! Notification events emitted by ledger and intake operations.
//!
//! Each event carries an immutable snapshot of the data the notification
//! pipeline needs, so rendering never has to read back from storage. Events
//! are fire-and-forget: a failure anywhere downstream of the emitting
//! operation must not affect that operation's outcome.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::booking::{Booking, BookingStatus, PaymentStatus};
use crate::identifiers::BookingId;

/// Snapshot of the booking fields notifications render from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSnapshot {
    pub id: BookingId,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub event_type: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_location: String,
    pub service_type: String,
    pub service_package: String,
    pub display_duration: String,
    pub total_price: Decimal,
    pub deposit_paid: Decimal,
    pub balance_due: Decimal,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
}

impl From<&Booking> for BookingSnapshot {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            client_name: booking.client_name.clone(),
            client_email: booking.client_email.clone(),
            client_phone: booking.client_phone.clone(),
            event_type: booking.event_type.clone(),
            event_name: booking.event_name.clone(),
            event_date: booking.event_date,
            event_time: booking.event_time.clone(),
            event_location: booking.event_location.clone(),
            service_type: booking.service_type.clone(),
            service_package: booking.service_package.clone(),
            display_duration: booking.display_duration.clone(),
            total_price: booking.total_price,
            deposit_paid: booking.deposit_paid,
            balance_due: booking.balance_due,
            booking_status: booking.booking_status,
            payment_status: booking.payment_status,
        }
    }
}

/// Events dispatched to the notification pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    BookingReceived {
        booking: BookingSnapshot,
    },
    BookingStatusChanged {
        booking: BookingSnapshot,
        old_status: BookingStatus,
        new_status: BookingStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    PaymentRecorded {
        booking: BookingSnapshot,
        amount: Decimal,
    },
    BookingCancelled {
        booking: BookingSnapshot,
        fee: Decimal,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    ContactReceived {
        name: String,
        email: String,
        phone: String,
        event_type: String,
        message: String,
    },
    NewsletterSubscribed {
        email: String,
    },
}

impl NotificationEvent {
    /// Stable name used for queue routing and log fields.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BookingReceived { .. } => "booking_received",
            Self::BookingStatusChanged { .. } => "booking_status_changed",
            Self::PaymentRecorded { .. } => "payment_recorded",
            Self::BookingCancelled { .. } => "booking_cancelled",
            Self::ContactReceived { .. } => "contact_received",
            Self::NewsletterSubscribed { .. } => "newsletter_subscribed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_is_tagged_snake_case() {
        let event = NotificationEvent::NewsletterSubscribed {
            email: "fan@example.com".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"newsletter_subscribed\""));

        let back: NotificationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_type(), "newsletter_subscribed");
    }
}
