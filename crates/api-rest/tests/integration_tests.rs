//! End-to-end tests for the REST surface against in-memory services.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use pyrostage_api_rest::extractors::Claims;
use pyrostage_api_rest::{create_app, ApiConfig, AppState};
use pyrostage_application::services::{
    BookingService, CatalogService, ContactService, NewsletterService, ServiceConfig,
    TestimonialService,
};
use pyrostage_domain::user::UserRole;
use pyrostage_testing::mocks::{
    FixedClock, InMemoryBookingRepository, InMemoryCatalogRepository, InMemoryContactRepository,
    InMemoryNewsletterRepository, InMemoryTestimonialRepository, RecordingNotifier,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret";

fn test_app() -> axum::Router {
    let config = ApiConfig {
        jwt_secret: TEST_SECRET.to_string(),
        enable_swagger: false,
        ..Default::default()
    };

    let clock = Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
    ));
    let notifier = Arc::new(RecordingNotifier::new());
    let service_config = ServiceConfig::default();

    let booking_service = Arc::new(BookingService::new(
        Arc::new(InMemoryBookingRepository::new()),
        notifier.clone(),
        clock.clone(),
        service_config.clone(),
    ));
    let contact_service = Arc::new(ContactService::new(
        Arc::new(InMemoryContactRepository::new()),
        notifier.clone(),
        clock.clone(),
        service_config.clone(),
    ));
    let catalog_service = Arc::new(CatalogService::new(
        Arc::new(InMemoryCatalogRepository::new()),
        clock.clone(),
        service_config.clone(),
    ));
    let testimonial_service = Arc::new(TestimonialService::new(
        Arc::new(InMemoryTestimonialRepository::new()),
        clock.clone(),
        service_config,
    ));
    let newsletter_service = Arc::new(NewsletterService::new(
        Arc::new(InMemoryNewsletterRepository::new()),
        notifier,
        clock,
    ));

    let state = AppState::new(
        config,
        booking_service,
        contact_service,
        catalog_service,
        testimonial_service,
        newsletter_service,
    );

    create_app(state)
}

fn token(email: &str, role: UserRole) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        role,
        exp: (now + Duration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

fn booking_payload() -> Value {
    json!({
        "client_name": "Amina Odhiambo",
        "client_email": "amina@example.com",
        "client_phone": "+254700111222",
        "event_type": "wedding",
        "event_name": "Odhiambo Wedding",
        "event_date": "2025-06-20",
        "event_time": "20:00",
        "event_location": "Karen Country Club",
        "venue_type": "outdoor",
        "expected_guests": 250,
        "service_type": "fireworks",
        "service_package": "gold",
        "display_duration": "15 minutes",
        "display_type": "aerial",
        "music_sync": true,
        "base_price": "70000",
        "additional_charges": "5000",
        "discount": "5000",
        "total_price": "75000",
        "insurance_required": true
    })
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, payload: &Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

fn patch_json(uri: &str, payload: &Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app();
    let (status, body) = send(&app, get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_booking_returns_created_with_derived_fields() {
    let app = test_app();
    let (status, body) = send(&app, post_json("/api/v1/bookings", &booking_payload(), None)).await;

    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["booking_status"], "pending");
    assert_eq!(data["payment_status"], "pending");
    assert_eq!(data["balance_due"], "70000");
    assert_eq!(data["permit_required"], true);
}

#[tokio::test]
async fn create_booking_rejects_unknown_venue_type() {
    let app = test_app();
    let mut payload = booking_payload();
    payload["venue_type"] = json!("underwater");

    let (status, _) = send(&app, post_json("/api/v1/bookings", &payload, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_booking_rejects_short_lead_time() {
    let app = test_app();
    let mut payload = booking_payload();
    // Fixed clock sits at 2025-05-01; 3 days out is inside the 7-day window
    payload["event_date"] = json!("2025-05-04");

    let (status, body) = send(&app, post_json("/api/v1/bookings", &payload, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BOOKING_ERROR");
}

#[tokio::test]
async fn booking_reads_require_authentication() {
    let app = test_app();

    let (status, _) = send(
        &app,
        get(
            "/api/v1/bookings/00000000-0000-0000-0000-000000000000",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let staff = token("ops@pyrostage.example", UserRole::Staff);
    let (status, _) = send(
        &app,
        get(
            "/api/v1/bookings/00000000-0000-0000-0000-000000000000",
            Some(&staff),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_transitions_enforce_the_state_machine() {
    let app = test_app();
    let staff = token("ops@pyrostage.example", UserRole::Staff);

    let (_, created) = send(&app, post_json("/api/v1/bookings", &booking_payload(), None)).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Client tokens cannot transition
    let client = token("amina@example.com", UserRole::Client);
    let (status, _) = send(
        &app,
        patch_json(
            &format!("/api/v1/bookings/{}/status", id),
            &json!({"target_status": "confirmed"}),
            Some(&client),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Staff confirm succeeds and stamps confirmed_at
    let (status, body) = send(
        &app,
        patch_json(
            &format!("/api/v1/bookings/{}/status", id),
            &json!({"target_status": "confirmed"}),
            Some(&staff),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["booking_status"], "confirmed");
    assert!(body["data"]["confirmed_at"].is_string());

    // Confirmed -> completed skips in_progress and is rejected
    let (status, body) = send(
        &app,
        patch_json(
            &format!("/api/v1/bookings/{}/status", id),
            &json!({"target_status": "completed"}),
            Some(&staff),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn payments_update_the_ledger() {
    let app = test_app();
    let staff = token("ops@pyrostage.example", UserRole::Staff);

    let mut payload = booking_payload();
    payload["discount"] = json!("0");
    let (_, created) = send(&app, post_json("/api/v1/bookings", &payload, None)).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/v1/bookings/{}/payments", id),
            &json!({"amount": "25000", "payment_method": "mpesa"}),
            Some(&staff),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deposit_paid"], "25000");
    assert_eq!(body["data"]["balance_due"], "50000");
    assert_eq!(body["data"]["payment_status"], "partial");

    // Non-positive amounts are rejected
    let (status, _) = send(
        &app,
        post_json(
            &format!("/api/v1/bookings/{}/payments", id),
            &json!({"amount": "0"}),
            Some(&staff),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancellation_records_the_fee() {
    let app = test_app();
    let staff = token("ops@pyrostage.example", UserRole::Staff);

    // Event on 2025-06-20, clock at 2025-05-01: 50 days out, no fee
    let (_, created) = send(&app, post_json("/api/v1/bookings", &booking_payload(), None)).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/v1/bookings/{}/cancel", id),
            &json!({"reason": "client request"}),
            Some(&staff),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["booking_status"], "cancelled");
    assert_eq!(body["data"]["cancellation_fee"], "0");
    assert_eq!(body["data"]["cancellation_reason"], "client request");

    // Cancelling again is rejected
    let (status, _) = send(
        &app,
        post_json(
            &format!("/api/v1/bookings/{}/cancel", id),
            &json!({}),
            Some(&staff),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn newsletter_subscription_round_trip() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/newsletter/subscribe",
            &json!({"email": "Fan@Example.com"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "fan@example.com");

    let (status, _) = send(
        &app,
        post_json(
            "/api/v1/newsletter/unsubscribe",
            &json!({"email": "fan@example.com"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post_json(
            "/api/v1/newsletter/unsubscribe",
            &json!({"email": "ghost@example.com"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_stats_are_gated_by_role() {
    let app = test_app();

    let client = token("amina@example.com", UserRole::Client);
    let (status, _) = send(&app, get("/api/v1/admin/stats", Some(&client))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token("boss@pyrostage.example", UserRole::Admin);
    let (status, body) = send(&app, get("/api/v1/admin/stats", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_bookings"], 0);
}
