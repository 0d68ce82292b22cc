//! Testimonial endpoints.

use crate::{
    error::{ApiError, ApiResult},
    extractors::{AuthenticatedUser, Pagination, ValidatedJson},
    responses::{ApiResponse, Created, PaginatedResponse},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use chrono::NaiveDate;
use pyrostage_application::services::TestimonialFilters;
use pyrostage_application::validation::CreateTestimonialRequest;
use pyrostage_domain::identifiers::TestimonialId;
use pyrostage_domain::testimonial::Testimonial;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Testimonial representation returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TestimonialResponse {
    pub id: String,
    pub client_name: String,
    pub event_type: String,
    pub event_date: Option<NaiveDate>,
    pub rating: u8,
    pub testimonial: String,
    pub is_approved: bool,
    pub is_featured: bool,
    pub client_location: Option<String>,
    pub service_used: Option<String>,
    pub created_at: String,
}

impl From<Testimonial> for TestimonialResponse {
    fn from(testimonial: Testimonial) -> Self {
        Self {
            id: testimonial.id.to_string(),
            client_name: testimonial.client_name,
            event_type: testimonial.event_type,
            event_date: testimonial.event_date,
            rating: testimonial.rating,
            testimonial: testimonial.testimonial,
            is_approved: testimonial.is_approved,
            is_featured: testimonial.is_featured,
            client_location: testimonial.client_location,
            service_used: testimonial.service_used,
            created_at: testimonial.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TestimonialListQuery {
    #[serde(default)]
    pub featured_only: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct FeatureQuery {
    pub featured: Option<bool>,
}

/// Testimonial routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/testimonials", get(list_testimonials).post(submit_testimonial))
        .route("/testimonials/:id/approve", patch(approve_testimonial))
        .route("/testimonials/:id/feature", patch(feature_testimonial))
}

fn parse_testimonial_id(id: &str) -> Result<TestimonialId, ApiError> {
    id.parse::<Uuid>()
        .map(TestimonialId::from)
        .map_err(|_| ApiError::BadRequest(format!("Invalid testimonial id: {}", id)))
}

/// Submit a testimonial
///
/// New submissions stay unpublished until staff approval.
#[utoipa::path(
    post,
    path = "/testimonials",
    tag = "testimonials",
    responses(
        (status = 201, description = "Testimonial submitted", body = TestimonialResponse),
        (status = 400, description = "Validation failure"),
    )
)]
async fn submit_testimonial(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTestimonialRequest>,
) -> ApiResult<Created<TestimonialResponse>> {
    let testimonial = state.testimonial_service.submit(request).await?;
    Ok(Created(testimonial.into()))
}

/// List approved testimonials
#[utoipa::path(
    get,
    path = "/testimonials",
    tag = "testimonials",
    responses(
        (status = 200, description = "Page of testimonials", body = PaginatedResponse<TestimonialResponse>),
    )
)]
async fn list_testimonials(
    State(state): State<AppState>,
    pagination: Pagination,
    Query(query): Query<TestimonialListQuery>,
) -> ApiResult<Json<PaginatedResponse<TestimonialResponse>>> {
    let filters = TestimonialFilters {
        approved_only: true,
        featured_only: query.featured_only,
    };

    let result = state
        .testimonial_service
        .list(filters, pagination.params)
        .await?;

    Ok(Json(result.map(TestimonialResponse::from).into()))
}

/// Approve a testimonial (staff only)
#[utoipa::path(
    patch,
    path = "/testimonials/{id}/approve",
    tag = "testimonials",
    params(("id" = String, Path, description = "Testimonial id")),
    responses(
        (status = 200, description = "Testimonial approved", body = TestimonialResponse),
        (status = 404, description = "Testimonial not found"),
    ),
    security(("bearer_auth" = []))
)]
async fn approve_testimonial(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<TestimonialResponse>>> {
    let id = parse_testimonial_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let testimonial = state.testimonial_service.approve(&ctx, id).await?;
    Ok(Json(ApiResponse::success(testimonial.into())))
}

/// Feature or unfeature a testimonial (staff only)
#[utoipa::path(
    patch,
    path = "/testimonials/{id}/feature",
    tag = "testimonials",
    params(
        ("id" = String, Path, description = "Testimonial id"),
        ("featured" = Option<bool>, Query, description = "Feature flag (default true)"),
    ),
    responses(
        (status = 200, description = "Feature flag updated", body = TestimonialResponse),
        (status = 404, description = "Testimonial not found"),
    ),
    security(("bearer_auth" = []))
)]
async fn feature_testimonial(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Query(query): Query<FeatureQuery>,
) -> ApiResult<Json<ApiResponse<TestimonialResponse>>> {
    let id = parse_testimonial_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let testimonial = state
        .testimonial_service
        .feature(&ctx, id, query.featured.unwrap_or(true))
        .await?;
    Ok(Json(ApiResponse::success(testimonial.into())))
}
