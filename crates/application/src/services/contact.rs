//! Contact inquiry service.

use super::{Clock, Notifier, ServiceConfig, ServiceContext};
use crate::validation::{CreateContactRequest, Validatable};
use crate::ApplicationResult;
use async_trait::async_trait;
use pyrostage_common::pagination::{PaginatedResult, PaginationParams};
use pyrostage_domain::contact::{ContactMessage, ContactMessageDraft};
use pyrostage_domain::errors::ContentError;
use pyrostage_domain::events::NotificationEvent;
use pyrostage_domain::identifiers::ContactMessageId;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Query filters for contact inquiry listings.
#[derive(Debug, Clone, Default)]
pub struct ContactFilters {
    pub is_read: Option<bool>,
    pub responded: Option<bool>,
}

/// Storage port for contact inquiries.
#[async_trait]
pub trait ContactRepositoryPort: Send + Sync {
    async fn create(&self, message: &ContactMessage) -> ApplicationResult<()>;

    async fn get_by_id(&self, id: ContactMessageId) -> ApplicationResult<Option<ContactMessage>>;

    async fn list(
        &self,
        filters: &ContactFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<ContactMessage>, u64)>;

    async fn mark_read(&self, id: ContactMessageId) -> ApplicationResult<ContactMessage>;

    async fn add_notes(&self, id: ContactMessageId, notes: &str)
        -> ApplicationResult<ContactMessage>;
}

/// Contact inquiry service implementation.
pub struct ContactService {
    repository: Arc<dyn ContactRepositoryPort>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl ContactService {
    pub fn new(
        repository: Arc<dyn ContactRepositoryPort>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repository,
            notifier,
            clock,
            config,
        }
    }

    /// Record a new inquiry from the public contact form.
    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateContactRequest) -> ApplicationResult<ContactMessage> {
        request.validate_all().ensure_valid()?;

        let message = ContactMessage::create(
            ContactMessageId::new(),
            ContactMessageDraft {
                name: request.name,
                email: request.email,
                phone: request.phone,
                event_type: request.event_type,
                event_date: request.event_date,
                budget: request.budget,
                message: request.message,
            },
            self.clock.now(),
        );

        self.repository.create(&message).await?;

        info!(contact_id = %message.id, email = %message.email, "Contact inquiry received");

        let event = NotificationEvent::ContactReceived {
            name: message.name.clone(),
            email: message.email.clone(),
            phone: message.phone.clone(),
            event_type: message.event_type.clone(),
            message: message.message.clone(),
        };
        if let Err(error) = self.notifier.notify(event).await {
            warn!(%error, "Contact notification dispatch failed");
        }

        Ok(message)
    }

    /// List inquiries with read/responded filters. Staff only.
    #[instrument(skip(self, ctx, filters), fields(correlation_id = %ctx.correlation_id))]
    pub async fn list(
        &self,
        ctx: &ServiceContext,
        filters: ContactFilters,
        pagination: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<ContactMessage>> {
        ctx.require_admin()?;

        let pagination = PaginationParams::new(
            pagination.page,
            pagination.per_page.min(self.config.max_page_size),
        );

        let (items, total) = self.repository.list(&filters, &pagination).await?;
        Ok(PaginatedResult::from_params(items, &pagination, total))
    }

    /// Fetch one inquiry. Staff only.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn get(
        &self,
        ctx: &ServiceContext,
        id: ContactMessageId,
    ) -> ApplicationResult<ContactMessage> {
        ctx.require_admin()?;
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ContentError::ContactNotFound(id).into())
    }

    /// Mark an inquiry as read. Staff only.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn mark_read(
        &self,
        ctx: &ServiceContext,
        id: ContactMessageId,
    ) -> ApplicationResult<ContactMessage> {
        ctx.require_admin()?;
        let message = self.repository.mark_read(id).await?;
        info!(contact_id = %id, "Contact inquiry marked read");
        Ok(message)
    }

    /// Attach staff follow-up notes to an inquiry. Staff only.
    #[instrument(skip(self, ctx, notes), fields(correlation_id = %ctx.correlation_id))]
    pub async fn add_notes(
        &self,
        ctx: &ServiceContext,
        id: ContactMessageId,
        notes: &str,
    ) -> ApplicationResult<ContactMessage> {
        ctx.require_admin()?;
        self.repository.add_notes(id, notes).await
    }
}
