//! Newsletter subscriber repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use pyrostage_application::services::NewsletterRepositoryPort;
use pyrostage_application::{ApplicationError, ApplicationResult};
use pyrostage_domain::identifiers::SubscriberId;
use pyrostage_domain::newsletter::NewsletterSubscriber;

use super::map_sqlx_err;

/// PostgreSQL implementation of [`NewsletterRepositoryPort`].
pub struct PgNewsletterRepository {
    pool: PgPool,
}

impl PgNewsletterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_subscriber(row: &PgRow) -> Result<NewsletterSubscriber, ApplicationError> {
    Ok(NewsletterSubscriber {
        id: SubscriberId::from(row.get::<uuid::Uuid, _>("id")),
        email: row.get("email"),
        name: row.get("name"),
        subscribed_at: row.get("subscribed_at"),
        unsubscribed_at: row.get("unsubscribed_at"),
        is_active: row.get("is_active"),
        source: row.get("source"),
        consent_given: row.get("consent_given"),
        consent_date: row.get("consent_date"),
    })
}

#[async_trait]
impl NewsletterRepositoryPort for PgNewsletterRepository {
    #[instrument(skip(self))]
    async fn get_by_email(
        &self,
        email: &str,
    ) -> ApplicationResult<Option<NewsletterSubscriber>> {
        let row = sqlx::query("SELECT * FROM newsletter_subscribers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.as_ref().map(row_to_subscriber).transpose()
    }

    #[instrument(skip(self, subscriber), fields(email = %subscriber.email))]
    async fn insert(&self, subscriber: &NewsletterSubscriber) -> ApplicationResult<()> {
        sqlx::query(
            r#"
            INSERT INTO newsletter_subscribers (
                id, email, name, subscribed_at, unsubscribed_at, is_active,
                source, consent_given, consent_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(subscriber.id.as_uuid())
        .bind(&subscriber.email)
        .bind(&subscriber.name)
        .bind(subscriber.subscribed_at)
        .bind(subscriber.unsubscribed_at)
        .bind(subscriber.is_active)
        .bind(&subscriber.source)
        .bind(subscriber.consent_given)
        .bind(subscriber.consent_date)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    #[instrument(skip(self, subscriber), fields(email = %subscriber.email))]
    async fn update(&self, subscriber: &NewsletterSubscriber) -> ApplicationResult<()> {
        sqlx::query(
            r#"
            UPDATE newsletter_subscribers SET
                name = $2,
                subscribed_at = $3,
                unsubscribed_at = $4,
                is_active = $5
            WHERE email = $1
            "#,
        )
        .bind(&subscriber.email)
        .bind(&subscriber.name)
        .bind(subscriber.subscribed_at)
        .bind(subscriber.unsubscribed_at)
        .bind(subscriber.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn active_count(&self) -> ApplicationResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM newsletter_subscribers WHERE is_active")
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(count as u64)
    }
}
