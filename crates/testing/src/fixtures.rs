//! Ready-made request payloads for tests.

use chrono::NaiveDate;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use pyrostage_application::validation::{
    CreateBookingRequest, CreateContactRequest, CreateServiceRequest, CreateTestimonialRequest,
    SubscribeRequest,
};
use pyrostage_domain::booking::{DisplayType, VenueType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A valid booking intake request for an event on `event_date`.
pub fn booking_request(event_date: NaiveDate) -> CreateBookingRequest {
    CreateBookingRequest {
        client_name: Name().fake(),
        client_email: SafeEmail().fake(),
        client_phone: "+254700111222".to_string(),
        client_address: None,
        event_type: "wedding".to_string(),
        event_name: "Garden Wedding".to_string(),
        event_date,
        event_time: "20:00".to_string(),
        event_location: "Karen Country Club".to_string(),
        venue_type: VenueType::Outdoor,
        expected_guests: Some(250),
        service_type: "fireworks".to_string(),
        service_package: "gold".to_string(),
        additional_services: vec!["stage-fog".to_string()],
        display_duration: "15 minutes".to_string(),
        display_type: DisplayType::Aerial,
        colors_requested: Some("gold, white".to_string()),
        music_sync: true,
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

/// A valid contact form submission.
pub fn contact_request() -> CreateContactRequest {
    CreateContactRequest {
        name: Name().fake(),
        email: SafeEmail().fake(),
        phone: "+254711000111".to_string(),
        event_type: "corporate".to_string(),
        event_date: None,
        budget: Some("100k-200k".to_string()),
        message: "Looking for a year-end display for our staff party.".to_string(),
    }
}

/// A valid catalog entry request.
pub fn service_request(slug: &str) -> CreateServiceRequest {
    CreateServiceRequest {
        name: "Gold Package".to_string(),
        slug: slug.to_string(),
        category: "fireworks".to_string(),
        description: "Our flagship 15-minute aerial display with music sync.".to_string(),
        features: vec!["music sync".to_string(), "aerial shells".to_string()],
        base_price: dec!(50000),
        price_range_min: dec!(50000),
        price_range_max: dec!(120000),
        duration: "15 minutes".to_string(),
        is_popular: true,
        display_order: 1,
        image_url: None,
        disclaimer: None,
        min_guests: None,
        max_guests: None,
    }
}

/// A valid testimonial submission.
pub fn testimonial_request(rating: u8) -> CreateTestimonialRequest {
    CreateTestimonialRequest {
        client_name: Name().fake(),
        event_type: "wedding".to_string(),
        event_date: None,
        rating,
        testimonial: "The finale lit up the whole valley. Unforgettable.".to_string(),
        client_location: Some("Nairobi".to_string()),
        service_used: Some("Gold Package".to_string()),
    }
}

/// A valid newsletter subscription request.
pub fn subscribe_request(email: &str) -> SubscribeRequest {
    SubscribeRequest {
        email: email.to_string(),
        name: None,
        source: Some("website".to_string()),
    }
}
