//! Administrative endpoints.

use crate::{
    error::{ApiError, ApiResult},
    extractors::AuthenticatedUser,
    responses::ApiResponse,
    state::AppState,
};
use axum::{extract::State, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Dashboard aggregates across all entities.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub completed_events: u64,
    pub total_revenue: Decimal,
    pub services_count: u64,
    pub testimonials_count: u64,
    pub newsletter_subscribers: u64,
}

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/stats", get(dashboard_stats))
}

/// Dashboard statistics (staff only)
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    responses(
        (status = 200, description = "Dashboard aggregates", body = DashboardStats),
        (status = 403, description = "Staff privileges required"),
    ),
    security(("bearer_auth" = []))
)]
async fn dashboard_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<DashboardStats>>> {
    if !user.is_staff() {
        return Err(ApiError::Forbidden(
            "Staff privileges required for dashboard stats".to_string(),
        ));
    }

    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let booking_stats = state.booking_service.stats(&ctx).await?;
    let services_count = state.catalog_service.active_count().await?;
    let testimonials_count = state.testimonial_service.approved_count().await?;
    let newsletter_subscribers = state.newsletter_service.active_count().await?;

    Ok(Json(ApiResponse::success(DashboardStats {
        total_bookings: booking_stats.total_bookings,
        pending_bookings: booking_stats.pending_bookings,
        completed_events: booking_stats.completed_events,
        total_revenue: booking_stats.total_revenue,
        services_count,
        testimonials_count,
        newsletter_subscribers,
    })))
}
