//! Booking request types and their validation.

use super::{Validatable, ValidationResult, ValidationRules, ValidatorExt};
use chrono::NaiveDate;
use pyrostage_domain::booking::{BookingDraft, BookingStatus, DisplayType, VenueType};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Intake request for a new booking.
///
/// Enum fields (`venue_type`, `display_type`) are rejected at
/// deserialization when out of range; amount and guest rules are layered on
/// in [`Validatable::validate_all`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 100))]
    pub client_name: String,

    pub client_email: String,

    pub client_phone: String,

    pub client_address: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub event_type: String,

    #[validate(length(min = 1, max = 100))]
    pub event_name: String,

    pub event_date: NaiveDate,

    #[validate(length(min = 1, max = 20))]
    pub event_time: String,

    #[validate(length(min = 1, max = 200))]
    pub event_location: String,

    pub venue_type: VenueType,

    pub expected_guests: Option<u32>,

    #[validate(length(min = 1, max = 50))]
    pub service_type: String,

    #[validate(length(min = 1, max = 50))]
    pub service_package: String,

    #[serde(default)]
    pub additional_services: Vec<String>,

    #[validate(length(min = 1, max = 20))]
    pub display_duration: String,

    pub display_type: DisplayType,

    pub colors_requested: Option<String>,

    #[serde(default)]
    pub music_sync: bool,

    pub special_effects: Option<String>,

    pub base_price: Decimal,

    #[serde(default)]
    pub additional_charges: Decimal,

    #[serde(default)]
    pub discount: Decimal,

    pub total_price: Decimal,

    pub special_instructions: Option<String>,

    pub emergency_contact: Option<String>,

    #[serde(default)]
    pub insurance_required: bool,

    pub team_size: Option<u32>,
}

impl Validatable for CreateBookingRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = self.to_validation_result();

        result.merge(ValidationRules::validate_email(&self.client_email));
        result.merge(ValidationRules::validate_phone(&self.client_phone));
        result.merge(ValidationRules::validate_positive(
            self.base_price,
            "base_price",
        ));
        result.merge(ValidationRules::validate_positive(
            self.total_price,
            "total_price",
        ));
        result.merge(ValidationRules::validate_non_negative(
            self.additional_charges,
            "additional_charges",
        ));
        result.merge(ValidationRules::validate_non_negative(
            self.discount,
            "discount",
        ));

        if let Some(guests) = self.expected_guests {
            if guests == 0 {
                result.add_field_error("expected_guests", "Expected guests must be positive");
            }
        }

        if let Some(team_size) = self.team_size {
            if team_size == 0 {
                result.add_field_error("team_size", "Team size must be positive");
            }
        }

        result
    }
}

impl CreateBookingRequest {
    /// Convert into the domain intake value once validated.
    pub fn into_draft(self, created_by: Option<String>) -> BookingDraft {
        BookingDraft {
            client_name: self.client_name,
            client_email: self.client_email,
            client_phone: self.client_phone,
            client_address: self.client_address,
            event_type: self.event_type,
            event_name: self.event_name,
            event_date: self.event_date,
            event_time: self.event_time,
            event_location: self.event_location,
            venue_type: self.venue_type,
            expected_guests: self.expected_guests,
            service_type: self.service_type,
            service_package: self.service_package,
            additional_services: self.additional_services,
            display_duration: self.display_duration,
            display_type: self.display_type,
            colors_requested: self.colors_requested,
            music_sync: self.music_sync,
            special_effects: self.special_effects,
            base_price: self.base_price,
            additional_charges: self.additional_charges,
            discount: self.discount,
            total_price: self.total_price,
            special_instructions: self.special_instructions,
            emergency_contact: self.emergency_contact,
            insurance_required: self.insurance_required,
            team_size: self.team_size,
            created_by,
        }
    }
}

/// Request to move a booking along the status state machine.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatusTransitionRequest {
    pub target_status: BookingStatus,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl Validatable for StatusTransitionRequest {
    fn validate_all(&self) -> ValidationResult {
        self.to_validation_result()
    }
}

/// Request to record a payment against a booking.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,

    #[validate(length(max = 50))]
    pub payment_method: Option<String>,

    #[validate(length(max = 100))]
    pub reference_number: Option<String>,
}

impl Validatable for RecordPaymentRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = self.to_validation_result();
        result.merge(ValidationRules::validate_positive(self.amount, "amount"));
        result
    }
}

/// Request to cancel a booking.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CancelBookingRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

impl Validatable for CancelBookingRequest {
    fn validate_all(&self) -> ValidationResult {
        self.to_validation_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_request() -> CreateBookingRequest {
        CreateBookingRequest {
            client_name: "Amina Odhiambo".into(),
            client_email: "amina@example.com".into(),
            client_phone: "+254700111222".into(),
            client_address: None,
            event_type: "wedding".into(),
            event_name: "Odhiambo Wedding".into(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            event_time: "20:00".into(),
            event_location: "Karen Country Club".into(),
            venue_type: VenueType::Outdoor,
            expected_guests: Some(250),
            service_type: "fireworks".into(),
            service_package: "gold".into(),
            additional_services: vec![],
            display_duration: "15 minutes".into(),
            display_type: DisplayType::Aerial,
            colors_requested: None,
            music_sync: false,
            special_effects: None,
            base_price: dec!(70000),
            additional_charges: dec!(5000),
            discount: Decimal::ZERO,
            total_price: dec!(75000),
            special_instructions: None,
            emergency_contact: None,
            insurance_required: true,
            team_size: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate_all().valid);
    }

    #[test]
    fn bad_email_rejected() {
        let mut request = valid_request();
        request.client_email = "no-at-sign".into();
        let result = request.validate_all();
        assert!(!result.valid);
        assert!(result.field_errors.contains_key("email"));
    }

    #[test]
    fn non_positive_prices_rejected() {
        let mut request = valid_request();
        request.total_price = Decimal::ZERO;
        assert!(!request.validate_all().valid);

        let mut request = valid_request();
        request.discount = dec!(-1);
        assert!(!request.validate_all().valid);
    }

    #[test]
    fn zero_guests_rejected() {
        let mut request = valid_request();
        request.expected_guests = Some(0);
        assert!(!request.validate_all().valid);
    }

    #[test]
    fn enum_fields_reject_unknown_values_at_deserialization() {
        let json = r#"{"target_status": "exploded"}"#;
        assert!(serde_json::from_str::<StatusTransitionRequest>(json).is_err());

        let json = r#"{"target_status": "confirmed"}"#;
        let request: StatusTransitionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.target_status, BookingStatus::Confirmed);
    }

    #[test]
    fn payment_amount_must_be_positive() {
        let request = RecordPaymentRequest {
            amount: Decimal::ZERO,
            payment_method: None,
            reference_number: None,
        };
        assert!(!request.validate_all().valid);

        let request = RecordPaymentRequest {
            amount: dec!(2500),
            payment_method: Some("mpesa".into()),
            reference_number: Some("QX12AB34".into()),
        };
        assert!(request.validate_all().valid);
    }
}
