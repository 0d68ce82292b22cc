//! Testimonial repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use pyrostage_application::services::{TestimonialFilters, TestimonialRepositoryPort};
use pyrostage_application::{ApplicationError, ApplicationResult};
use pyrostage_common::pagination::PaginationParams;
use pyrostage_domain::errors::ContentError;
use pyrostage_domain::identifiers::TestimonialId;
use pyrostage_domain::testimonial::Testimonial;

use super::map_sqlx_err;

/// PostgreSQL implementation of [`TestimonialRepositoryPort`].
pub struct PgTestimonialRepository {
    pool: PgPool,
}

impl PgTestimonialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_testimonial(row: &PgRow) -> Result<Testimonial, ApplicationError> {
    Ok(Testimonial {
        id: TestimonialId::from(row.get::<uuid::Uuid, _>("id")),
        client_name: row.get("client_name"),
        event_type: row.get("event_type"),
        event_date: row.get("event_date"),
        rating: row.get::<i16, _>("rating") as u8,
        testimonial: row.get("testimonial"),
        is_approved: row.get("is_approved"),
        is_featured: row.get("is_featured"),
        client_location: row.get("client_location"),
        service_used: row.get("service_used"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl TestimonialRepositoryPort for PgTestimonialRepository {
    #[instrument(skip(self, testimonial), fields(testimonial_id = %testimonial.id))]
    async fn create(&self, testimonial: &Testimonial) -> ApplicationResult<()> {
        sqlx::query(
            r#"
            INSERT INTO testimonials (
                id, client_name, event_type, event_date, rating, testimonial,
                is_approved, is_featured, client_location, service_used, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(testimonial.id.as_uuid())
        .bind(&testimonial.client_name)
        .bind(&testimonial.event_type)
        .bind(testimonial.event_date)
        .bind(testimonial.rating as i16)
        .bind(&testimonial.testimonial)
        .bind(testimonial.is_approved)
        .bind(testimonial.is_featured)
        .bind(&testimonial.client_location)
        .bind(&testimonial.service_used)
        .bind(testimonial.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    #[instrument(skip(self, filters))]
    async fn list(
        &self,
        filters: &TestimonialFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<Testimonial>, u64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM testimonials
            WHERE (NOT $1 OR is_approved)
              AND (NOT $2 OR is_featured)
            "#,
        )
        .bind(filters.approved_only)
        .bind(filters.featured_only)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM testimonials
            WHERE (NOT $1 OR is_approved)
              AND (NOT $2 OR is_featured)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filters.approved_only)
        .bind(filters.featured_only)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let testimonials = rows
            .iter()
            .map(row_to_testimonial)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((testimonials, total as u64))
    }

    #[instrument(skip(self))]
    async fn set_approved(
        &self,
        id: TestimonialId,
        approved: bool,
    ) -> ApplicationResult<Testimonial> {
        let row = sqlx::query(
            "UPDATE testimonials SET is_approved = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id.as_uuid())
        .bind(approved)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        match row {
            Some(row) => row_to_testimonial(&row),
            None => Err(ContentError::TestimonialNotFound(id).into()),
        }
    }

    #[instrument(skip(self))]
    async fn set_featured(
        &self,
        id: TestimonialId,
        featured: bool,
    ) -> ApplicationResult<Testimonial> {
        let row = sqlx::query(
            "UPDATE testimonials SET is_featured = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id.as_uuid())
        .bind(featured)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        match row {
            Some(row) => row_to_testimonial(&row),
            None => Err(ContentError::TestimonialNotFound(id).into()),
        }
    }

    #[instrument(skip(self))]
    async fn approved_count(&self) -> ApplicationResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM testimonials WHERE is_approved")
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(count as u64)
    }
}
