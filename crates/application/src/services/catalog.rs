//! Service catalog management.

use super::{Clock, ServiceConfig, ServiceContext};
use crate::validation::{CreateServiceRequest, UpdateServiceRequest, Validatable};
use crate::{ApplicationError, ApplicationResult};
use async_trait::async_trait;
use pyrostage_common::pagination::{PaginatedResult, PaginationParams};
use pyrostage_domain::catalog::{ServiceOffering, ServiceOfferingDraft};
use pyrostage_domain::errors::ContentError;
use pyrostage_domain::identifiers::ServiceId;
use std::sync::Arc;
use tracing::{info, instrument};

/// Query filters for catalog listings.
#[derive(Debug, Clone)]
pub struct CatalogFilters {
    pub category: Option<String>,
    pub popular_only: bool,
    /// Hide deactivated entries; on for the public surface
    pub active_only: bool,
}

impl Default for CatalogFilters {
    fn default() -> Self {
        Self {
            category: None,
            popular_only: false,
            active_only: true,
        }
    }
}

/// Storage port for the service catalog.
#[async_trait]
pub trait CatalogRepositoryPort: Send + Sync {
    async fn create(&self, offering: &ServiceOffering) -> ApplicationResult<()>;

    async fn get_by_id(&self, id: ServiceId) -> ApplicationResult<Option<ServiceOffering>>;

    async fn get_by_slug(&self, slug: &str) -> ApplicationResult<Option<ServiceOffering>>;

    async fn list(
        &self,
        filters: &CatalogFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<ServiceOffering>, u64)>;

    async fn update(&self, offering: &ServiceOffering) -> ApplicationResult<()>;

    async fn deactivate(&self, id: ServiceId) -> ApplicationResult<ServiceOffering>;

    async fn slug_exists(&self, slug: &str) -> ApplicationResult<bool>;

    async fn active_count(&self) -> ApplicationResult<u64>;
}

/// Catalog service implementation.
pub struct CatalogService {
    repository: Arc<dyn CatalogRepositoryPort>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl CatalogService {
    pub fn new(
        repository: Arc<dyn CatalogRepositoryPort>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Create a new catalog entry. Admin only; slugs are unique.
    #[instrument(skip(self, ctx, request), fields(correlation_id = %ctx.correlation_id))]
    pub async fn create(
        &self,
        ctx: &ServiceContext,
        request: CreateServiceRequest,
    ) -> ApplicationResult<ServiceOffering> {
        request.validate_all().ensure_valid()?;
        ctx.require_admin()?;

        if self.repository.slug_exists(&request.slug).await? {
            return Err(ApplicationError::Content(ContentError::DuplicateSlug(
                request.slug,
            )));
        }

        let offering = ServiceOffering::create(
            ServiceId::new(),
            ServiceOfferingDraft {
                name: request.name,
                slug: request.slug,
                category: request.category,
                description: request.description,
                features: request.features,
                base_price: request.base_price,
                price_range_min: request.price_range_min,
                price_range_max: request.price_range_max,
                duration: request.duration,
                is_popular: request.is_popular,
                display_order: request.display_order,
                image_url: request.image_url,
                disclaimer: request.disclaimer,
                min_guests: request.min_guests,
                max_guests: request.max_guests,
            },
            self.clock.now(),
        );

        self.repository.create(&offering).await?;
        info!(service_id = %offering.id, slug = %offering.slug, "Catalog entry created");
        Ok(offering)
    }

    pub async fn get(&self, id: ServiceId) -> ApplicationResult<ServiceOffering> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ContentError::ServiceNotFound(id).into())
    }

    pub async fn get_by_slug(&self, slug: &str) -> ApplicationResult<ServiceOffering> {
        self.repository
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| ContentError::ServiceSlugNotFound(slug.to_string()).into())
    }

    /// Public listing ordered by display order.
    #[instrument(skip(self, filters))]
    pub async fn list(
        &self,
        filters: CatalogFilters,
        pagination: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<ServiceOffering>> {
        let pagination = PaginationParams::new(
            pagination.page,
            pagination.per_page.min(self.config.max_page_size),
        );

        let (items, total) = self.repository.list(&filters, &pagination).await?;
        Ok(PaginatedResult::from_params(items, &pagination, total))
    }

    /// Update a catalog entry in place. Admin only.
    #[instrument(skip(self, ctx, request), fields(correlation_id = %ctx.correlation_id))]
    pub async fn update(
        &self,
        ctx: &ServiceContext,
        id: ServiceId,
        request: UpdateServiceRequest,
    ) -> ApplicationResult<ServiceOffering> {
        request.validate_all().ensure_valid()?;
        ctx.require_admin()?;

        let mut offering = self.get(id).await?;
        offering.apply(request.into_update(), self.clock.now());
        self.repository.update(&offering).await?;

        info!(service_id = %id, "Catalog entry updated");
        Ok(offering)
    }

    /// Soft-delete a catalog entry. Admin only.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn deactivate(
        &self,
        ctx: &ServiceContext,
        id: ServiceId,
    ) -> ApplicationResult<ServiceOffering> {
        ctx.require_admin()?;
        let offering = self.repository.deactivate(id).await?;
        info!(service_id = %id, "Catalog entry deactivated");
        Ok(offering)
    }

    pub async fn active_count(&self) -> ApplicationResult<u64> {
        self.repository.active_count().await
    }
}
