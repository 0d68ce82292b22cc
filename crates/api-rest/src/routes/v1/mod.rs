//! API v1 routes.

pub mod admin;
pub mod bookings;
pub mod contacts;
pub mod newsletter;
pub mod services;
pub mod testimonials;

use crate::state::AppState;
use axum::Router;
use pyrostage_application::services::ServiceContext;
use uuid::Uuid;

/// All v1 routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(bookings::routes())
        .merge(contacts::routes())
        .merge(services::routes())
        .merge(testimonials::routes())
        .merge(newsletter::routes())
        .merge(admin::routes())
}

/// Service context for unauthenticated requests.
pub(crate) fn anonymous_ctx() -> ServiceContext {
    ServiceContext::anonymous(Uuid::new_v4().to_string())
}
