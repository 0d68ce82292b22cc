//! Request types for the content surfaces: contacts, catalog,
//! testimonials, and the newsletter.

use super::{Validatable, ValidationResult, ValidationRules, ValidatorExt};
use chrono::NaiveDate;
use pyrostage_domain::catalog::ServiceOfferingUpdate;
use pyrostage_domain::testimonial::{MAX_RATING, MIN_RATING};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Public contact form submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub email: String,

    pub phone: String,

    #[validate(length(min = 1, max = 50))]
    pub event_type: String,

    pub event_date: Option<NaiveDate>,

    #[validate(length(max = 50))]
    pub budget: Option<String>,

    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

impl Validatable for CreateContactRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = self.to_validation_result();
        result.merge(ValidationRules::validate_email(&self.email));
        result.merge(ValidationRules::validate_phone(&self.phone));
        result
    }
}

/// New catalog entry (admin).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub slug: String,

    #[validate(length(min = 1, max = 50))]
    pub category: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    #[serde(default)]
    pub features: Vec<String>,

    pub base_price: Decimal,

    pub price_range_min: Decimal,

    pub price_range_max: Decimal,

    #[validate(length(min = 1, max = 50))]
    pub duration: String,

    #[serde(default)]
    pub is_popular: bool,

    #[serde(default)]
    pub display_order: u32,

    #[validate(url)]
    pub image_url: Option<String>,

    pub disclaimer: Option<String>,

    pub min_guests: Option<u32>,

    pub max_guests: Option<u32>,
}

impl Validatable for CreateServiceRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = self.to_validation_result();

        result.merge(ValidationRules::validate_slug(&self.slug));
        result.merge(ValidationRules::validate_non_negative(
            self.base_price,
            "base_price",
        ));
        result.merge(ValidationRules::validate_non_negative(
            self.price_range_min,
            "price_range_min",
        ));

        if self.price_range_max < self.price_range_min {
            result.add_field_error(
                "price_range_max",
                "Maximum price must not be below minimum price",
            );
        }

        if let (Some(min), Some(max)) = (self.min_guests, self.max_guests) {
            if max < min {
                result.add_field_error("max_guests", "Maximum guests must not be below minimum");
            }
        }

        result
    }
}

/// Catalog entry update (admin); omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,

    pub features: Option<Vec<String>>,

    pub base_price: Option<Decimal>,

    pub price_range_min: Option<Decimal>,

    pub price_range_max: Option<Decimal>,

    #[validate(length(min = 1, max = 50))]
    pub duration: Option<String>,

    pub is_popular: Option<bool>,

    pub display_order: Option<u32>,

    #[validate(url)]
    pub image_url: Option<String>,

    pub disclaimer: Option<String>,
}

impl Validatable for UpdateServiceRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = self.to_validation_result();

        if let Some(price) = self.base_price {
            result.merge(ValidationRules::validate_non_negative(price, "base_price"));
        }
        if let (Some(min), Some(max)) = (self.price_range_min, self.price_range_max) {
            if max < min {
                result.add_field_error(
                    "price_range_max",
                    "Maximum price must not be below minimum price",
                );
            }
        }

        result
    }
}

impl UpdateServiceRequest {
    pub fn into_update(self) -> ServiceOfferingUpdate {
        ServiceOfferingUpdate {
            name: self.name,
            category: self.category,
            description: self.description,
            features: self.features,
            base_price: self.base_price,
            price_range_min: self.price_range_min,
            price_range_max: self.price_range_max,
            duration: self.duration,
            is_popular: self.is_popular,
            display_order: self.display_order,
            image_url: self.image_url,
            disclaimer: self.disclaimer,
        }
    }
}

/// Public testimonial submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTestimonialRequest {
    #[validate(length(min = 1, max = 100))]
    pub client_name: String,

    #[validate(length(min = 1, max = 50))]
    pub event_type: String,

    pub event_date: Option<NaiveDate>,

    pub rating: u8,

    #[validate(length(min = 1, max = 3000))]
    pub testimonial: String,

    #[validate(length(max = 100))]
    pub client_location: Option<String>,

    #[validate(length(max = 100))]
    pub service_used: Option<String>,
}

impl Validatable for CreateTestimonialRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = self.to_validation_result();

        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            result.add_field_error(
                "rating",
                format!("Rating must be between {} and {}", MIN_RATING, MAX_RATING),
            );
        }

        result
    }
}

/// Newsletter subscription request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribeRequest {
    pub email: String,

    #[validate(length(max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 50))]
    pub source: Option<String>,
}

impl Validatable for SubscribeRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = self.to_validation_result();
        result.merge(ValidationRules::validate_email(self.email.trim()));
        result
    }
}
