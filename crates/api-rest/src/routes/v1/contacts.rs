//! Contact inquiry endpoints.

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
use pyrostage_application::services::ContactFilters;
use pyrostage_application::validation::CreateContactRequest;
use pyrostage_domain::contact::ContactMessage;
use pyrostage_domain::identifiers::ContactMessageId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Contact inquiry representation returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_type: String,
    pub event_date: Option<NaiveDate>,
    pub budget: Option<String>,
    pub message: String,
    pub created_at: String,
    pub is_read: bool,
    pub responded: bool,
    pub notes: Option<String>,
}

impl From<ContactMessage> for ContactResponse {
    fn from(message: ContactMessage) -> Self {
        Self {
            id: message.id.to_string(),
            name: message.name,
            email: message.email,
            phone: message.phone,
            event_type: message.event_type,
            event_date: message.event_date,
            budget: message.budget,
            message: message.message,
            created_at: message.created_at.to_rfc3339(),
            is_read: message.is_read,
            responded: message.responded,
            notes: message.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactListQuery {
    pub is_read: Option<bool>,
    pub responded: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddNotesRequest {
    #[validate(length(min = 1, max = 2000))]
    pub notes: String,
}

/// Contact routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/:id", get(get_contact))
        .route("/contacts/:id/read", patch(mark_read))
        .route("/contacts/:id/notes", patch(add_notes))
}

fn parse_contact_id(id: &str) -> Result<ContactMessageId, ApiError> {
    id.parse::<Uuid>()
        .map(ContactMessageId::from)
        .map_err(|_| ApiError::BadRequest(format!("Invalid contact id: {}", id)))
}

/// Submit a contact inquiry
#[utoipa::path(
    post,
    path = "/contacts",
    tag = "contacts",
    responses(
        (status = 201, description = "Inquiry received", body = ContactResponse),
        (status = 400, description = "Validation failure"),
    )
)]
async fn create_contact(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateContactRequest>,
) -> ApiResult<Created<ContactResponse>> {
    let message = state.contact_service.create(request).await?;
    Ok(Created(message.into()))
}

/// List contact inquiries (staff only)
#[utoipa::path(
    get,
    path = "/contacts",
    tag = "contacts",
    responses(
        (status = 200, description = "Page of inquiries", body = PaginatedResponse<ContactResponse>),
        (status = 403, description = "Staff privileges required"),
    ),
    security(("bearer_auth" = []))
)]
async fn list_contacts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    pagination: Pagination,
    Query(query): Query<ContactListQuery>,
) -> ApiResult<Json<PaginatedResponse<ContactResponse>>> {
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let filters = ContactFilters {
        is_read: query.is_read,
        responded: query.responded,
    };

    let result = state
        .contact_service
        .list(&ctx, filters, pagination.params)
        .await?;

    Ok(Json(result.map(ContactResponse::from).into()))
}

/// Get one inquiry (staff only)
#[utoipa::path(
    get,
    path = "/contacts/{id}",
    tag = "contacts",
    params(("id" = String, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Inquiry details", body = ContactResponse),
        (status = 404, description = "Inquiry not found"),
    ),
    security(("bearer_auth" = []))
)]
async fn get_contact(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ContactResponse>>> {
    let id = parse_contact_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let message = state.contact_service.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(message.into())))
}

/// Mark an inquiry as read (staff only)
#[utoipa::path(
    patch,
    path = "/contacts/{id}/read",
    tag = "contacts",
    params(("id" = String, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Inquiry marked read", body = ContactResponse),
        (status = 404, description = "Inquiry not found"),
    ),
    security(("bearer_auth" = []))
)]
async fn mark_read(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ContactResponse>>> {
    let id = parse_contact_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let message = state.contact_service.mark_read(&ctx, id).await?;
    Ok(Json(ApiResponse::success(message.into())))
}

/// Attach follow-up notes to an inquiry (staff only)
#[utoipa::path(
    patch,
    path = "/contacts/{id}/notes",
    tag = "contacts",
    params(("id" = String, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Notes saved", body = ContactResponse),
        (status = 404, description = "Inquiry not found"),
    ),
    security(("bearer_auth" = []))
)]
async fn add_notes(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<AddNotesRequest>,
) -> ApiResult<Json<ApiResponse<ContactResponse>>> {
    let id = parse_contact_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let message = state
        .contact_service
        .add_notes(&ctx, id, &request.notes)
        .await?;
    Ok(Json(ApiResponse::success(message.into())))
}
