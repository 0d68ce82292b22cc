//! Infrastructure layer for PyroStage.
//!
//! PostgreSQL-backed implementations of the application repository ports
//! and the Redis-backed notification queue.

pub mod database;
pub mod messaging;
pub mod repositories;

pub use database::{create_pool, run_migrations};
pub use messaging::{NotificationJob, QueueProducer, RedisNotifier};
pub use repositories::{
    PgBookingRepository, PgCatalogRepository, PgContactRepository, PgNewsletterRepository,
    PgTestimonialRepository,
};
