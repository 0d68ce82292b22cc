//! PyroStage API server binary.

use anyhow::Context;
use pyrostage_api_rest::{create_app, ApiConfig, AppState};
use pyrostage_application::services::{
    BookingService, CatalogService, Clock, ContactService, NewsletterService, NoOpNotifier,
    Notifier, ServiceConfig, SystemClock, TestimonialService,
};
use pyrostage_common::config::AppConfig;
use pyrostage_common::telemetry::init_telemetry;
use pyrostage_infrastructure::{
    create_pool, run_migrations, PgBookingRepository, PgCatalogRepository, PgContactRepository,
    PgNewsletterRepository, PgTestimonialRepository, RedisNotifier,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api_config = ApiConfig::from_env();
    init_telemetry(&api_config.log_level, api_config.log_json);

    let app_config = AppConfig::load().context("failed to load application config")?;

    let service_config = ServiceConfig {
        policy: app_config.booking.to_policy(),
        ..Default::default()
    };

    let pool = create_pool(&app_config.database)
        .await
        .context("failed to connect to PostgreSQL")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    // Notification dispatch is fire-and-forget; a Redis outage at startup
    // downgrades to a no-op notifier rather than blocking the API.
    let notifier: Arc<dyn Notifier> = match RedisNotifier::connect(
        &app_config.redis.url,
        app_config.redis.queue_prefix.clone(),
    )
    .await
    {
        Ok(notifier) => Arc::new(notifier),
        Err(error) => {
            warn!(%error, "Redis unavailable; notification dispatch disabled");
            Arc::new(NoOpNotifier)
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let booking_service = Arc::new(BookingService::new(
        Arc::new(PgBookingRepository::new(pool.clone())),
        notifier.clone(),
        clock.clone(),
        service_config.clone(),
    ));
    let contact_service = Arc::new(ContactService::new(
        Arc::new(PgContactRepository::new(pool.clone())),
        notifier.clone(),
        clock.clone(),
        service_config.clone(),
    ));
    let catalog_service = Arc::new(CatalogService::new(
        Arc::new(PgCatalogRepository::new(pool.clone())),
        clock.clone(),
        service_config.clone(),
    ));
    let testimonial_service = Arc::new(TestimonialService::new(
        Arc::new(PgTestimonialRepository::new(pool.clone())),
        clock.clone(),
        service_config.clone(),
    ));
    let newsletter_service = Arc::new(NewsletterService::new(
        Arc::new(PgNewsletterRepository::new(pool)),
        notifier,
        clock,
    ));

    let address = api_config.server_address();
    let state = AppState::new(
        api_config,
        booking_service,
        contact_service,
        catalog_service,
        testimonial_service,
        newsletter_service,
    );

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(%address, "PyroStage API listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
