//! PostgreSQL repository implementations.

mod booking_repository;
mod catalog_repository;
mod contact_repository;
mod newsletter_repository;
mod testimonial_repository;

pub use booking_repository::PgBookingRepository;
pub use catalog_repository::PgCatalogRepository;
pub use contact_repository::PgContactRepository;
pub use newsletter_repository::PgNewsletterRepository;
pub use testimonial_repository::PgTestimonialRepository;

use pyrostage_application::ApplicationError;

/// Map sqlx errors onto the application error taxonomy.
///
/// Serialization failures (SQLSTATE 40001) and deadlocks (40P01) surface as
/// transient conflicts so the service layer's bounded retry kicks in; unique
/// violations become conflicts; connectivity faults are service-unavailable.
pub(crate) fn map_sqlx_err(err: sqlx::Error) -> ApplicationError {
    match &err {
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("40001") | Some("40P01") => {
                ApplicationError::TransientConflict(db.message().to_string())
            }
            Some("23505") => ApplicationError::Conflict(db.message().to_string()),
            Some("23514") => ApplicationError::ValidationFailed(db.message().to_string()),
            _ => ApplicationError::Internal(db.message().to_string()),
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            ApplicationError::ServiceUnavailable(err.to_string())
        }
        _ => ApplicationError::Internal(err.to_string()),
    }
}

/// Parse a stored enum string, treating failures as data corruption.
pub(crate) fn parse_stored<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> Result<T, ApplicationError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ApplicationError::Internal(format!("corrupt {} column: {}", column, e)))
}
