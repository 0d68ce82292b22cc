//! Newsletter subscription endpoints.

use crate::{
    error::ApiResult,
    extractors::ValidatedJson,
    responses::ApiResponse,
    state::AppState,
};
use axum::{extract::State, routing::post, Json, Router};
use pyrostage_application::validation::SubscribeRequest;
use pyrostage_domain::newsletter::NewsletterSubscriber;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Subscriber representation returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriberResponse {
    pub email: String,
    pub is_active: bool,
    pub subscribed_at: String,
}

impl From<NewsletterSubscriber> for SubscriberResponse {
    fn from(subscriber: NewsletterSubscriber) -> Self {
        Self {
            email: subscriber.email,
            is_active: subscriber.is_active,
            subscribed_at: subscriber.subscribed_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UnsubscribeRequest {
    #[validate(length(min = 3, max = 254))]
    pub email: String,
}

/// Newsletter routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/newsletter/subscribe", post(subscribe))
        .route("/newsletter/unsubscribe", post(unsubscribe))
}

/// Subscribe to the newsletter
///
/// Idempotent: resubscribing an active address is a no-op; a lapsed
/// subscription is reactivated.
#[utoipa::path(
    post,
    path = "/newsletter/subscribe",
    tag = "newsletter",
    responses(
        (status = 200, description = "Subscribed", body = SubscriberResponse),
        (status = 400, description = "Invalid email"),
    )
)]
async fn subscribe(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SubscribeRequest>,
) -> ApiResult<Json<ApiResponse<SubscriberResponse>>> {
    let subscriber = state.newsletter_service.subscribe(request).await?;
    Ok(Json(ApiResponse::success(subscriber.into())))
}

/// Unsubscribe from the newsletter
#[utoipa::path(
    post,
    path = "/newsletter/unsubscribe",
    tag = "newsletter",
    responses(
        (status = 200, description = "Unsubscribed", body = SubscriberResponse),
        (status = 404, description = "Email not subscribed"),
    )
)]
async fn unsubscribe(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UnsubscribeRequest>,
) -> ApiResult<Json<ApiResponse<SubscriberResponse>>> {
    let subscriber = state.newsletter_service.unsubscribe(&request.email).await?;
    Ok(Json(ApiResponse::success(subscriber.into())))
}
