//! Application builder.
//!
//! Assembles routes, middleware, and state into the Axum router.

use crate::{
    middleware::{logging_middleware, request_id::request_id_middleware, RateLimitConfig, RateLimitLayer},
    routes,
    state::AppState,
};
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the main application router.
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = build_cors_layer(&config.cors_allowed_origins);
    let rate_limit =
        RateLimitLayer::with_config(RateLimitConfig::per_minute(config.rate_limit_per_minute));

    let mut app = Router::new()
        // Health check routes (no auth required)
        .merge(routes::health::routes())
        // API v1 routes
        .nest("/api/v1", routes::v1::routes())
        .with_state(state);

    if config.enable_swagger {
        app = app.merge(swagger_ui());
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors)
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(rate_limit)
            .layer(middleware::from_fn(request_id_middleware))
            .layer(middleware::from_fn(logging_middleware)),
    )
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

fn swagger_ui() -> SwaggerUi {
    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "PyroStage API",
            version = "0.1.0",
            description = "Booking and content-management API for PyroStage Fireworks & Stage FX",
            license(name = "MIT"),
        ),
        servers(
            (url = "/api/v1", description = "API v1")
        ),
        tags(
            (name = "health", description = "Health check endpoints"),
            (name = "bookings", description = "Booking ledger"),
            (name = "contacts", description = "Contact inquiries"),
            (name = "services", description = "Service catalog"),
            (name = "testimonials", description = "Client testimonials"),
            (name = "newsletter", description = "Newsletter subscriptions"),
            (name = "admin", description = "Administrative surface"),
        )
    )]
    struct ApiDoc;

    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
