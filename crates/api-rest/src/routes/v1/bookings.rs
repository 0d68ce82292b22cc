//! Booking endpoints.

use crate::{
    error::{ApiError, ApiResult},
    extractors::{AuthenticatedUser, MaybeAuthenticatedUser, Pagination, ValidatedJson},
    responses::{ApiResponse, Created, PaginatedResponse},
    routes::v1::anonymous_ctx,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use pyrostage_application::services::{AvailabilityReport, BookingFilters};
use pyrostage_application::validation::{
    CancelBookingRequest, CreateBookingRequest, RecordPaymentRequest, StatusTransitionRequest,
};
use pyrostage_domain::booking::{Booking, BookingStatus};
use pyrostage_domain::identifiers::BookingId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Booking representation returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub event_type: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_location: String,
    pub venue_type: String,
    pub expected_guests: Option<u32>,
    pub service_type: String,
    pub service_package: String,
    pub additional_services: Vec<String>,
    pub display_duration: String,
    pub display_type: String,
    pub colors_requested: Option<String>,
    pub music_sync: bool,
    pub base_price: Decimal,
    pub additional_charges: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
    pub deposit_paid: Decimal,
    pub balance_due: Decimal,
    pub booking_status: String,
    pub payment_status: String,
    pub created_at: String,
    pub confirmed_at: Option<String>,
    pub completed_at: Option<String>,
    pub permit_required: bool,
    pub permit_obtained: bool,
    pub insurance_required: bool,
    pub assigned_team_leader: Option<String>,
    pub team_size: u32,
    pub cancellation_reason: Option<String>,
    pub cancellation_fee: Option<Decimal>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            client_name: booking.client_name,
            client_email: booking.client_email,
            client_phone: booking.client_phone,
            event_type: booking.event_type,
            event_name: booking.event_name,
            event_date: booking.event_date,
            event_time: booking.event_time,
            event_location: booking.event_location,
            venue_type: booking.venue_type.as_str().to_string(),
            expected_guests: booking.expected_guests,
            service_type: booking.service_type,
            service_package: booking.service_package,
            additional_services: booking.additional_services,
            display_duration: booking.display_duration,
            display_type: booking.display_type.as_str().to_string(),
            colors_requested: booking.colors_requested,
            music_sync: booking.music_sync,
            base_price: booking.base_price,
            additional_charges: booking.additional_charges,
            discount: booking.discount,
            total_price: booking.total_price,
            deposit_paid: booking.deposit_paid,
            balance_due: booking.balance_due,
            booking_status: booking.booking_status.as_str().to_string(),
            payment_status: booking.payment_status.as_str().to_string(),
            created_at: booking.created_at.to_rfc3339(),
            confirmed_at: booking.confirmed_at.map(|t| t.to_rfc3339()),
            completed_at: booking.completed_at.map(|t| t.to_rfc3339()),
            permit_required: booking.permit_required,
            permit_obtained: booking.permit_obtained,
            insurance_required: booking.insurance_required,
            assigned_team_leader: booking.assigned_team_leader,
            team_size: booking.team_size,
            cancellation_reason: booking.cancellation_reason,
            cancellation_fee: booking.cancellation_fee,
        }
    }
}

/// Query parameters for listing bookings
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookingListQuery {
    #[schema(value_type = Option<String>)]
    pub status: Option<BookingStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub client_email: Option<String>,
    pub service_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

/// Booking routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/upcoming", get(upcoming_bookings))
        .route("/bookings/calendar/availability", get(check_availability))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/status", patch(update_booking_status))
        .route("/bookings/:id/payments", post(record_payment))
        .route("/bookings/:id/cancel", post(cancel_booking))
}

fn parse_booking_id(id: &str) -> Result<BookingId, ApiError> {
    id.parse::<Uuid>()
        .map(BookingId::from)
        .map_err(|_| ApiError::BadRequest(format!("Invalid booking id: {}", id)))
}

/// Create booking
///
/// Public intake endpoint; the event date must respect the minimum lead
/// time and all pricing fields are validated before anything persists.
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Validation failure or event date too soon"),
    )
)]
async fn create_booking(
    State(state): State<AppState>,
    maybe_user: MaybeAuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<Created<BookingResponse>> {
    // Staff can enter bookings on a client's behalf; the actor is recorded
    // either way.
    let ctx = match maybe_user.user() {
        Some(user) => user.service_context(&Uuid::new_v4().to_string()),
        None => anonymous_ctx(),
    };

    let booking = state.booking_service.create(&ctx, request).await?;

    Ok(Created(booking.into()))
}

/// List bookings
///
/// Staff see everything; clients see only their own bookings.
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    responses(
        (status = 200, description = "Page of bookings", body = PaginatedResponse<BookingResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
async fn list_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    pagination: Pagination,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<Json<PaginatedResponse<BookingResponse>>> {
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let filters = BookingFilters {
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
        client_email: query.client_email,
        service_type: query.service_type,
    };

    let result = state
        .booking_service
        .list(&ctx, filters, pagination.params)
        .await?;

    Ok(Json(result.map(BookingResponse::from).into()))
}

/// Get booking by id
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking details", body = BookingResponse),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = []))
)]
async fn get_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<BookingResponse>>> {
    let id = parse_booking_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let booking = state.booking_service.get(&ctx, id).await?;

    Ok(Json(ApiResponse::success(booking.into())))
}

/// Transition booking status
///
/// Staff only. Invalid transitions return 400 naming the current and
/// requested statuses; the booking is left unmodified.
#[utoipa::path(
    patch,
    path = "/bookings/{id}/status",
    tag = "bookings",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Status updated", body = BookingResponse),
        (status = 400, description = "Transition not permitted"),
        (status = 403, description = "Staff privileges required"),
    ),
    security(("bearer_auth" = []))
)]
async fn update_booking_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<StatusTransitionRequest>,
) -> ApiResult<Json<ApiResponse<BookingResponse>>> {
    let id = parse_booking_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let booking = state
        .booking_service
        .transition_status(&ctx, id, request)
        .await?;

    Ok(Json(ApiResponse::success(booking.into())))
}

/// Record a payment
#[utoipa::path(
    post,
    path = "/bookings/{id}/payments",
    tag = "bookings",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Payment recorded", body = BookingResponse),
        (status = 400, description = "Non-positive amount"),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = []))
)]
async fn record_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<RecordPaymentRequest>,
) -> ApiResult<Json<ApiResponse<BookingResponse>>> {
    let id = parse_booking_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());

    let booking = state
        .booking_service
        .record_payment(&ctx, id, request)
        .await?;

    Ok(Json(ApiResponse::success(booking.into())))
}

/// Cancel a booking
///
/// Computes and records the schedule-based cancellation fee; the fee is
/// informational and never deducted from the deposit automatically.
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 400, description = "Booking already terminal"),
    ),
    security(("bearer_auth" = []))
)]
async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    request: Option<ValidatedJson<CancelBookingRequest>>,
) -> ApiResult<Json<ApiResponse<BookingResponse>>> {
    let id = parse_booking_id(&id)?;
    let ctx = user.service_context(&Uuid::new_v4().to_string());
    let request = request.map(|r| r.0).unwrap_or_default();

    let booking = state.booking_service.cancel(&ctx, id, request).await?;

    Ok(Json(ApiResponse::success(booking.into())))
}

/// Upcoming bookings within a look-ahead window
#[utoipa::path(
    get,
    path = "/bookings/upcoming",
    tag = "bookings",
    params(("days" = Option<i64>, Query, description = "Look-ahead window in days (default 30)")),
    responses(
        (status = 200, description = "Upcoming bookings", body = Vec<BookingResponse>),
    ),
    security(("bearer_auth" = []))
)]
async fn upcoming_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<Json<ApiResponse<Vec<BookingResponse>>>> {
    let ctx = user.service_context(&Uuid::new_v4().to_string());
    let days = query.days.unwrap_or(30).clamp(1, 365);

    let bookings = state.booking_service.upcoming(&ctx, days).await?;
    let responses: Vec<BookingResponse> = bookings.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(responses)))
}

/// Calendar availability over a date range
///
/// Confirmed bookings block dates; useful for front-end calendars.
#[utoipa::path(
    get,
    path = "/bookings/calendar/availability",
    tag = "bookings",
    params(
        ("date_from" = String, Query, description = "Range start (inclusive)"),
        ("date_to" = String, Query, description = "Range end (inclusive)"),
    ),
    responses(
        (status = 200, description = "Booked and available dates"),
        (status = 400, description = "Invalid range"),
    )
)]
async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<ApiResponse<AvailabilityReport>>> {
    let report = state
        .booking_service
        .availability(query.date_from, query.date_to)
        .await?;

    Ok(Json(ApiResponse::success(report)))
}
