//! Testimonial moderation service.

use super::{Clock, ServiceConfig, ServiceContext};
use crate::validation::{CreateTestimonialRequest, Validatable};
use crate::ApplicationResult;
use async_trait::async_trait;
use pyrostage_common::pagination::{PaginatedResult, PaginationParams};
use pyrostage_domain::identifiers::TestimonialId;
use pyrostage_domain::testimonial::{Testimonial, TestimonialDraft};
use std::sync::Arc;
use tracing::{info, instrument};

/// Query filters for testimonial listings.
#[derive(Debug, Clone)]
pub struct TestimonialFilters {
    /// Only published testimonials; on for the public surface
    pub approved_only: bool,
    pub featured_only: bool,
}

impl Default for TestimonialFilters {
    fn default() -> Self {
        Self {
            approved_only: true,
            featured_only: false,
        }
    }
}

/// Storage port for testimonials.
#[async_trait]
pub trait TestimonialRepositoryPort: Send + Sync {
    async fn create(&self, testimonial: &Testimonial) -> ApplicationResult<()>;

    async fn list(
        &self,
        filters: &TestimonialFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<Testimonial>, u64)>;

    async fn set_approved(
        &self,
        id: TestimonialId,
        approved: bool,
    ) -> ApplicationResult<Testimonial>;

    async fn set_featured(
        &self,
        id: TestimonialId,
        featured: bool,
    ) -> ApplicationResult<Testimonial>;

    async fn approved_count(&self) -> ApplicationResult<u64>;
}

/// Testimonial service implementation.
pub struct TestimonialService {
    repository: Arc<dyn TestimonialRepositoryPort>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl TestimonialService {
    pub fn new(
        repository: Arc<dyn TestimonialRepositoryPort>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Submit a testimonial; it stays unpublished until approved.
    #[instrument(skip(self, request))]
    pub async fn submit(&self, request: CreateTestimonialRequest) -> ApplicationResult<Testimonial> {
        request.validate_all().ensure_valid()?;

        let testimonial = Testimonial::create(
            TestimonialId::new(),
            TestimonialDraft {
                client_name: request.client_name,
                event_type: request.event_type,
                event_date: request.event_date,
                rating: request.rating,
                testimonial: request.testimonial,
                client_location: request.client_location,
                service_used: request.service_used,
            },
            self.clock.now(),
        );

        self.repository.create(&testimonial).await?;
        info!(testimonial_id = %testimonial.id, rating = testimonial.rating, "Testimonial submitted");
        Ok(testimonial)
    }

    #[instrument(skip(self, filters))]
    pub async fn list(
        &self,
        filters: TestimonialFilters,
        pagination: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Testimonial>> {
        let pagination = PaginationParams::new(
            pagination.page,
            pagination.per_page.min(self.config.max_page_size),
        );

        let (items, total) = self.repository.list(&filters, &pagination).await?;
        Ok(PaginatedResult::from_params(items, &pagination, total))
    }

    /// Publish a testimonial. Staff only.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn approve(
        &self,
        ctx: &ServiceContext,
        id: TestimonialId,
    ) -> ApplicationResult<Testimonial> {
        ctx.require_admin()?;
        let testimonial = self.repository.set_approved(id, true).await?;
        info!(testimonial_id = %id, "Testimonial approved");
        Ok(testimonial)
    }

    /// Feature a testimonial on the landing page. Staff only.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn feature(
        &self,
        ctx: &ServiceContext,
        id: TestimonialId,
        featured: bool,
    ) -> ApplicationResult<Testimonial> {
        ctx.require_admin()?;
        self.repository.set_featured(id, featured).await
    }

    pub async fn approved_count(&self) -> ApplicationResult<u64> {
        self.repository.approved_count().await
    }
}
