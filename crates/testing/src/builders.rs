//! Fluent builders for domain entities.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use pyrostage_domain::booking::{Booking, BookingDraft, DisplayType, VenueType};
use pyrostage_domain::identifiers::BookingId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Builder for [`Booking`] test instances.
///
/// Defaults produce a pending outdoor wedding booking 50 days out with a
/// 75,000 total and no discount; override what the test cares about.
pub struct BookingBuilder {
    id: BookingId,
    client_name: String,
    client_email: String,
    event_name: String,
    event_date: NaiveDate,
    total_price: Decimal,
    discount: Decimal,
    created_at: DateTime<Utc>,
}

impl Default for BookingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingBuilder {
    pub fn new() -> Self {
        Self {
            id: BookingId::new(),
            client_name: "Amina Odhiambo".to_string(),
            client_email: "amina@example.com".to_string(),
            event_name: "Odhiambo Wedding".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            total_price: dec!(75000),
            discount: Decimal::ZERO,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    pub fn with_id(mut self, id: BookingId) -> Self {
        self.id = id;
        self
    }

    pub fn with_client_email(mut self, email: impl Into<String>) -> Self {
        self.client_email = email.into();
        self
    }

    pub fn with_event_date(mut self, date: NaiveDate) -> Self {
        self.event_date = date;
        self
    }

    pub fn with_total_price(mut self, total: Decimal) -> Self {
        self.total_price = total;
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn build(self) -> Booking {
        Booking::create(
            self.id,
            BookingDraft {
                client_name: self.client_name,
                client_email: self.client_email,
                client_phone: "+254700111222".to_string(),
                client_address: None,
                event_type: "wedding".to_string(),
                event_name: self.event_name,
                event_date: self.event_date,
                event_time: "20:00".to_string(),
                event_location: "Karen Country Club".to_string(),
                venue_type: VenueType::Outdoor,
                expected_guests: Some(250),
                service_type: "fireworks".to_string(),
                service_package: "gold".to_string(),
                additional_services: vec![],
                display_duration: "15 minutes".to_string(),
                display_type: DisplayType::Aerial,
                colors_requested: Some("gold, white".to_string()),
                music_sync: true,
                special_effects: None,
                base_price: self.total_price,
                additional_charges: Decimal::ZERO,
                discount: self.discount,
                total_price: self.total_price,
                special_instructions: None,
                emergency_contact: None,
                insurance_required: true,
                team_size: None,
                created_by: None,
            },
            self.created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyrostage_domain::booking::BookingStatus;

    #[test]
    fn builder_defaults_are_pending() {
        let booking = BookingBuilder::new().build();
        assert_eq!(booking.booking_status, BookingStatus::Pending);
        assert_eq!(booking.balance_due, dec!(75000));
    }

    #[test]
    fn builder_overrides_apply() {
        let booking = BookingBuilder::new()
            .with_total_price(dec!(100000))
            .with_discount(dec!(10000))
            .build();
        assert_eq!(booking.balance_due, dec!(90000));
    }
}
