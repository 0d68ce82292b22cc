//! Application services.
//!
//! Business logic orchestration: validation, authorization context,
//! repository access, and notification dispatch. Each service owns one
//! aggregate and talks to storage exclusively through its port trait.

mod booking;
mod catalog;
mod contact;
mod newsletter;
mod testimonial;

pub use booking::*;
pub use catalog::*;
pub use contact::*;
pub use newsletter::*;
pub use testimonial::*;

use crate::ApplicationError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use pyrostage_domain::booking::BookingPolicy;
use pyrostage_domain::events::NotificationEvent;
use pyrostage_common::retry::RetryConfig;

/// Service configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum page size for list operations
    pub max_page_size: u32,
    /// Default page size for list operations
    pub default_page_size: u32,
    /// Booking business rules (lead time, cancellation fee schedule)
    pub policy: BookingPolicy,
    /// Retry behavior for transient storage conflicts
    pub retry: RetryConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            default_page_size: 20,
            policy: BookingPolicy::default(),
            retry: RetryConfig::exponential(3),
        }
    }
}

/// Per-request context for service calls.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// Email of the acting principal, if authenticated
    pub actor_email: Option<String>,
    /// Whether the actor holds staff/admin privileges
    pub is_admin: bool,
    /// Request correlation id for tracing
    pub correlation_id: String,
}

impl ServiceContext {
    pub fn anonymous(correlation_id: impl Into<String>) -> Self {
        Self {
            actor_email: None,
            is_admin: false,
            correlation_id: correlation_id.into(),
        }
    }

    pub fn authenticated(email: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self {
            actor_email: Some(email.into().to_lowercase()),
            is_admin: false,
            correlation_id: correlation_id.into(),
        }
    }

    pub fn with_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// The actor email, or an Unauthorized error when anonymous.
    pub fn require_authenticated(&self) -> Result<&str, ApplicationError> {
        self.actor_email
            .as_deref()
            .ok_or_else(|| ApplicationError::Unauthorized("Authentication required".to_string()))
    }

    pub fn require_admin(&self) -> Result<(), ApplicationError> {
        if !self.is_admin {
            return Err(ApplicationError::Forbidden(
                "Admin privileges required".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the actor may read or act on a record owned by `owner_email`.
    pub fn can_access(&self, owner_email: &str) -> bool {
        self.is_admin
            || self
                .actor_email
                .as_deref()
                .is_some_and(|email| email.eq_ignore_ascii_case(owner_email))
    }
}

/// Time source, injected so date-based rules are testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Today's calendar date in UTC.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time source used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fire-and-forget notification port.
///
/// Services log delivery failures and never let them affect the outcome of
/// the triggering operation.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: NotificationEvent) -> anyhow::Result<()>;
}

/// Notifier that drops events; used in tests and as a startup fallback.
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _event: NotificationEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_context() {
        let ctx = ServiceContext::anonymous("corr-1");
        assert!(ctx.require_authenticated().is_err());
        assert!(ctx.require_admin().is_err());

        let ctx = ServiceContext::authenticated("Client@Example.com", "corr-2");
        assert_eq!(ctx.require_authenticated().unwrap(), "client@example.com");
        assert!(ctx.can_access("client@example.com"));
        assert!(!ctx.can_access("other@example.com"));
        assert!(ctx.require_admin().is_err());

        let ctx = ctx.with_admin();
        assert!(ctx.require_admin().is_ok());
        assert!(ctx.can_access("anyone@example.com"));
    }

    #[test]
    fn test_system_clock_today_is_date_of_now() {
        let clock = SystemClock;
        assert_eq!(clock.today(), clock.now().date_naive());
    }
}
