//! Service catalog endpoints.

use crate::{
    error::{ApiError, ApiResult},
    extractors::{AuthenticatedUser, Pagination, ValidatedJson},
    responses::{ApiResponse, Created, PaginatedResponse},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use pyrostage_application::services::CatalogFilters;
use pyrostage_application::validation::{CreateServiceRequest, UpdateServiceRequest};
use pyrostage_domain::catalog::ServiceOffering;
use pyrostage_domain::identifiers::ServiceId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Catalog entry representation returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    pub features: Vec<String>,
    pub base_price: Decimal,
    pub price_range_min: Decimal,
    pub price_range_max: Decimal,
    pub duration: String,
    pub is_popular: bool,
    pub is_active: bool,
    pub display_order: u32,
    pub image_url: Option<String>,
    pub disclaimer: Option<String>,
    pub min_guests: Option<u32>,
    pub max_guests: Option<u32>,
}

impl From<ServiceOffering> for ServiceResponse {
    fn from(offering: ServiceOffering) -> Self {
        Self {
            id: offering.id.to_string(),
            name: offering.name,
            slug: offering.slug,
            category: offering.category,
            description: offering.description,
            features: offering.features,
            base_price: offering.base_price,
            price_range_min: offering.price_range_min,
            price_range_max: offering.price_range_max,
            duration: offering.duration,
            is_popular: offering.is_popular,
            is_active: offering.is_active,
            display_order: offering.display_order,
            image_url: offering.image_url,
            disclaimer: offering.disclaimer,
            min_guests: offering.min_guests,
            max_guests: offering.max_guests,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServiceListQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub popular_only: bool,
    pub include_inactive: Option<bool>,
}

/// Catalog routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route(
            "/services/:id",
            get(get_service).put(update_service).delete(deactivate_service),
        )
        .route("/services/slug/:slug", get(get_service_by_slug))
}

fn parse_service_id(id: &str) -> Result<ServiceId, ApiError> {
    id.parse::<Uuid>()
        .map(ServiceId::from)
        .map_err(|_| ApiError::BadRequest(format!("Invalid service id: {}", id)))
}

fn require_admin(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if !user.is_admin() {
        return Err(ApiError::Forbidden(
            "Admin privileges required to manage the catalog".to_string(),
        ));
    }
    Ok(())
}

/// List catalog entries
#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    responses(
        (status = 200, description = "Page of catalog entries", body = PaginatedResponse<ServiceResponse>),
    )
)]
async fn list_services(
    State(state): State<AppState>,
    pagination: Pagination,
    Query(query): Query<ServiceListQuery>,
) -> ApiResult<Json<PaginatedResponse<ServiceResponse>>> {
    let filters = CatalogFilters {
        category: query.category,
        popular_only: query.popular_only,
        active_only: !query.include_inactive.unwrap_or(false),
    };

    let result = state
        .catalog_service
        .list(filters, pagination.params)
        .await?;

    Ok(Json(result.map(ServiceResponse::from).into()))
}

/// Get a catalog entry by id
#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "services",
    params(("id" = String, Path, description = "Service id")),
    responses(
        (status = 200, description = "Catalog entry", body = ServiceResponse),
        (status = 404, description = "Service not found"),
    )
)]
async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ServiceResponse>>> {
    let id = parse_service_id(&id)?;
    let offering = state.catalog_service.get(id).await?;
    Ok(Json(ApiResponse::success(offering.into())))
}

/// Get a catalog entry by slug
#[utoipa::path(
    get,
    path = "/services/slug/{slug}",
    tag = "services",
    params(("slug" = String, Path, description = "Service slug")),
    responses(
        (status = 200, description = "Catalog entry", body = ServiceResponse),
        (status = 404, description = "Service not found"),
    )
)]
async fn get_service_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ApiResponse<ServiceResponse>>> {
    let offering = state.catalog_service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(offering.into())))
}

/// Create a catalog entry (admin only)
#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    responses(
        (status = 201, description = "Catalog entry created", body = ServiceResponse),
        (status = 409, description = "Slug already exists"),
    ),
    security(("bearer_auth" = []))
)]
async fn create_service(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateServiceRequest>,
) -> ApiResult<Created<ServiceResponse>> {
    require_admin(&user)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let offering = state.catalog_service.create(&ctx, request).await?;
    Ok(Created(offering.into()))
}

/// Update a catalog entry (admin only)
#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "services",
    params(("id" = String, Path, description = "Service id")),
    responses(
        (status = 200, description = "Catalog entry updated", body = ServiceResponse),
        (status = 404, description = "Service not found"),
    ),
    security(("bearer_auth" = []))
)]
async fn update_service(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateServiceRequest>,
) -> ApiResult<Json<ApiResponse<ServiceResponse>>> {
    require_admin(&user)?;
    let id = parse_service_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let offering = state.catalog_service.update(&ctx, id, request).await?;
    Ok(Json(ApiResponse::success(offering.into())))
}

/// Deactivate a catalog entry (admin only; soft delete)
#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "services",
    params(("id" = String, Path, description = "Service id")),
    responses(
        (status = 200, description = "Catalog entry deactivated", body = ServiceResponse),
        (status = 404, description = "Service not found"),
    ),
    security(("bearer_auth" = []))
)]
async fn deactivate_service(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ServiceResponse>>> {
    require_admin(&user)?;
    let id = parse_service_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let offering = state.catalog_service.deactivate(&ctx, id).await?;
    Ok(Json(ApiResponse::success(offering.into())))
}
