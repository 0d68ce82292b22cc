//! Client testimonials.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::TestimonialId;

/// Valid rating bounds, inclusive.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A review left by a past client. New submissions start unapproved and are
/// only published after staff moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub client_name: String,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    pub rating: u8,
    pub testimonial: String,
    pub is_approved: bool,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_used: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new testimonial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialDraft {
    pub client_name: String,
    pub event_type: String,
    pub event_date: Option<NaiveDate>,
    pub rating: u8,
    pub testimonial: String,
    pub client_location: Option<String>,
    pub service_used: Option<String>,
}

impl Testimonial {
    /// Build a new, unapproved testimonial.
    pub fn create(id: TestimonialId, draft: TestimonialDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            client_name: draft.client_name,
            event_type: draft.event_type,
            event_date: draft.event_date,
            rating: draft.rating,
            testimonial: draft.testimonial,
            is_approved: false,
            is_featured: false,
            client_location: draft.client_location,
            service_used: draft.service_used,
            created_at: now,
        }
    }
}
