//! Service catalog repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use pyrostage_application::services::{CatalogFilters, CatalogRepositoryPort};
use pyrostage_application::{ApplicationError, ApplicationResult};
use pyrostage_common::pagination::PaginationParams;
use pyrostage_domain::catalog::ServiceOffering;
use pyrostage_domain::errors::ContentError;
use pyrostage_domain::identifiers::ServiceId;

use super::map_sqlx_err;

/// PostgreSQL implementation of [`CatalogRepositoryPort`].
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_offering(row: &PgRow) -> Result<ServiceOffering, ApplicationError> {
    Ok(ServiceOffering {
        id: ServiceId::from(row.get::<uuid::Uuid, _>("id")),
        name: row.get("name"),
        slug: row.get("slug"),
        category: row.get("category"),
        description: row.get("description"),
        features: row.get("features"),
        base_price: row.get("base_price"),
        price_range_min: row.get("price_range_min"),
        price_range_max: row.get("price_range_max"),
        duration: row.get("duration"),
        is_popular: row.get("is_popular"),
        is_active: row.get("is_active"),
        display_order: row.get::<i32, _>("display_order") as u32,
        image_url: row.get("image_url"),
        disclaimer: row.get("disclaimer"),
        min_guests: row.get::<Option<i32>, _>("min_guests").map(|g| g as u32),
        max_guests: row.get::<Option<i32>, _>("max_guests").map(|g| g as u32),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl CatalogRepositoryPort for PgCatalogRepository {
    #[instrument(skip(self, offering), fields(service_id = %offering.id))]
    async fn create(&self, offering: &ServiceOffering) -> ApplicationResult<()> {
        sqlx::query(
            r#"
            INSERT INTO services (
                id, name, slug, category, description, features,
                base_price, price_range_min, price_range_max, duration,
                is_popular, is_active, display_order, image_url, disclaimer,
                min_guests, max_guests, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19
            )
            "#,
        )
        .bind(offering.id.as_uuid())
        .bind(&offering.name)
        .bind(&offering.slug)
        .bind(&offering.category)
        .bind(&offering.description)
        .bind(&offering.features)
        .bind(offering.base_price)
        .bind(offering.price_range_min)
        .bind(offering.price_range_max)
        .bind(&offering.duration)
        .bind(offering.is_popular)
        .bind(offering.is_active)
        .bind(offering.display_order as i32)
        .bind(&offering.image_url)
        .bind(&offering.disclaimer)
        .bind(offering.min_guests.map(|g| g as i32))
        .bind(offering.max_guests.map(|g| g as i32))
        .bind(offering.created_at)
        .bind(offering.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ServiceId) -> ApplicationResult<Option<ServiceOffering>> {
        let row = sqlx::query("SELECT * FROM services WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.as_ref().map(row_to_offering).transpose()
    }

    #[instrument(skip(self))]
    async fn get_by_slug(&self, slug: &str) -> ApplicationResult<Option<ServiceOffering>> {
        let row = sqlx::query("SELECT * FROM services WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.as_ref().map(row_to_offering).transpose()
    }

    #[instrument(skip(self, filters))]
    async fn list(
        &self,
        filters: &CatalogFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<ServiceOffering>, u64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM services
            WHERE ($1::text IS NULL OR category = $1)
              AND (NOT $2 OR is_popular)
              AND (NOT $3 OR is_active)
            "#,
        )
        .bind(&filters.category)
        .bind(filters.popular_only)
        .bind(filters.active_only)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM services
            WHERE ($1::text IS NULL OR category = $1)
              AND (NOT $2 OR is_popular)
              AND (NOT $3 OR is_active)
            ORDER BY display_order ASC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&filters.category)
        .bind(filters.popular_only)
        .bind(filters.active_only)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let offerings = rows
            .iter()
            .map(row_to_offering)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((offerings, total as u64))
    }

    #[instrument(skip(self, offering), fields(service_id = %offering.id))]
    async fn update(&self, offering: &ServiceOffering) -> ApplicationResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE services SET
                name = $2, category = $3, description = $4, features = $5,
                base_price = $6, price_range_min = $7, price_range_max = $8,
                duration = $9, is_popular = $10, display_order = $11,
                image_url = $12, disclaimer = $13, updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(offering.id.as_uuid())
        .bind(&offering.name)
        .bind(&offering.category)
        .bind(&offering.description)
        .bind(&offering.features)
        .bind(offering.base_price)
        .bind(offering.price_range_min)
        .bind(offering.price_range_max)
        .bind(&offering.duration)
        .bind(offering.is_popular)
        .bind(offering.display_order as i32)
        .bind(&offering.image_url)
        .bind(&offering.disclaimer)
        .bind(offering.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(ContentError::ServiceNotFound(offering.id).into());
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: ServiceId) -> ApplicationResult<ServiceOffering> {
        let row = sqlx::query(
            "UPDATE services SET is_active = FALSE WHERE id = $1 RETURNING *",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        match row {
            Some(row) => row_to_offering(&row),
            None => Err(ContentError::ServiceNotFound(id).into()),
        }
    }

    #[instrument(skip(self))]
    async fn slug_exists(&self, slug: &str) -> ApplicationResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM services WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn active_count(&self) -> ApplicationResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE is_active")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(count as u64)
    }
}
