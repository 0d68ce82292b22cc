//! Application state shared across request handlers.

use crate::config::ApiConfig;
use pyrostage_application::services::{
    BookingService, CatalogService, ContactService, NewsletterService, TestimonialService,
};
use std::sync::Arc;

/// Shared state injected into every route handler.
///
/// Services are wired by the binary (Postgres + Redis in production,
/// in-memory doubles in tests) and handed in already constructed.
#[derive(Clone)]
pub struct AppState {
    /// API configuration
    pub config: Arc<ApiConfig>,

    /// JWT verification key material
    pub jwt_secret: Arc<String>,

    pub booking_service: Arc<BookingService>,
    pub contact_service: Arc<ContactService>,
    pub catalog_service: Arc<CatalogService>,
    pub testimonial_service: Arc<TestimonialService>,
    pub newsletter_service: Arc<NewsletterService>,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        booking_service: Arc<BookingService>,
        contact_service: Arc<ContactService>,
        catalog_service: Arc<CatalogService>,
        testimonial_service: Arc<TestimonialService>,
        newsletter_service: Arc<NewsletterService>,
    ) -> Self {
        let jwt_secret = Arc::new(config.jwt_secret.clone());
        Self {
            config: Arc::new(config),
            jwt_secret,
            booking_service,
            contact_service,
            catalog_service,
            testimonial_service,
            newsletter_service,
        }
    }

    /// Get the JWT verification secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
