//! Newsletter subscription service.

use super::{Clock, Notifier};
use crate::validation::{SubscribeRequest, Validatable};
use crate::ApplicationResult;
use async_trait::async_trait;
use pyrostage_domain::errors::ContentError;
use pyrostage_domain::events::NotificationEvent;
use pyrostage_domain::identifiers::SubscriberId;
use pyrostage_domain::newsletter::NewsletterSubscriber;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Storage port for newsletter subscribers.
#[async_trait]
pub trait NewsletterRepositoryPort: Send + Sync {
    async fn get_by_email(&self, email: &str) -> ApplicationResult<Option<NewsletterSubscriber>>;

    async fn insert(&self, subscriber: &NewsletterSubscriber) -> ApplicationResult<()>;

    async fn update(&self, subscriber: &NewsletterSubscriber) -> ApplicationResult<()>;

    async fn active_count(&self) -> ApplicationResult<u64>;
}

/// Newsletter service implementation.
pub struct NewsletterService {
    repository: Arc<dyn NewsletterRepositoryPort>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl NewsletterService {
    pub fn new(
        repository: Arc<dyn NewsletterRepositoryPort>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// Subscribe an email address.
    ///
    /// Idempotent: an active subscriber is returned unchanged; a lapsed one
    /// is reactivated with a fresh subscription time.
    #[instrument(skip(self, request))]
    pub async fn subscribe(
        &self,
        request: SubscribeRequest,
    ) -> ApplicationResult<NewsletterSubscriber> {
        request.validate_all().ensure_valid()?;

        let email = request.email.trim().to_lowercase();
        let now = self.clock.now();

        if let Some(mut existing) = self.repository.get_by_email(&email).await? {
            if !existing.is_active {
                existing.resubscribe(now);
                self.repository.update(&existing).await?;
                info!(email = %email, "Subscriber reactivated");
            }
            return Ok(existing);
        }

        let subscriber = NewsletterSubscriber::create(
            SubscriberId::new(),
            &email,
            request.name,
            request.source.as_deref().unwrap_or("website"),
            now,
        );
        self.repository.insert(&subscriber).await?;

        info!(email = %email, source = %subscriber.source, "Newsletter subscription created");

        let event = NotificationEvent::NewsletterSubscribed {
            email: subscriber.email.clone(),
        };
        if let Err(error) = self.notifier.notify(event).await {
            warn!(%error, "Newsletter notification dispatch failed");
        }

        Ok(subscriber)
    }

    /// Deactivate a subscription.
    #[instrument(skip(self))]
    pub async fn unsubscribe(&self, email: &str) -> ApplicationResult<NewsletterSubscriber> {
        let email = email.trim().to_lowercase();
        let mut subscriber = self
            .repository
            .get_by_email(&email)
            .await?
            .ok_or_else(|| ContentError::SubscriberNotFound(email.clone()))?;

        subscriber.unsubscribe(self.clock.now());
        self.repository.update(&subscriber).await?;

        info!(email = %email, "Subscriber unsubscribed");
        Ok(subscriber)
    }

    pub async fn active_count(&self) -> ApplicationResult<u64> {
        self.repository.active_count().await
    }
}
