//! Contact inquiry repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use pyrostage_application::services::{ContactFilters, ContactRepositoryPort};
use pyrostage_application::{ApplicationError, ApplicationResult};
use pyrostage_common::pagination::PaginationParams;
use pyrostage_domain::contact::ContactMessage;
use pyrostage_domain::errors::ContentError;
use pyrostage_domain::identifiers::ContactMessageId;

use super::map_sqlx_err;

/// PostgreSQL implementation of [`ContactRepositoryPort`].
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_message(row: &PgRow) -> Result<ContactMessage, ApplicationError> {
    Ok(ContactMessage {
        id: ContactMessageId::from(row.get::<uuid::Uuid, _>("id")),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        event_type: row.get("event_type"),
        event_date: row.get("event_date"),
        budget: row.get("budget"),
        message: row.get("message"),
        created_at: row.get("created_at"),
        is_read: row.get("is_read"),
        responded: row.get("responded"),
        notes: row.get("notes"),
    })
}

#[async_trait]
impl ContactRepositoryPort for PgContactRepository {
    #[instrument(skip(self, message), fields(contact_id = %message.id))]
    async fn create(&self, message: &ContactMessage) -> ApplicationResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contact_messages (
                id, name, email, phone, event_type, event_date, budget,
                message, created_at, is_read, responded, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.event_type)
        .bind(message.event_date)
        .bind(&message.budget)
        .bind(&message.message)
        .bind(message.created_at)
        .bind(message.is_read)
        .bind(message.responded)
        .bind(&message.notes)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ContactMessageId) -> ApplicationResult<Option<ContactMessage>> {
        let row = sqlx::query("SELECT * FROM contact_messages WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.as_ref().map(row_to_message).transpose()
    }

    #[instrument(skip(self, filters))]
    async fn list(
        &self,
        filters: &ContactFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<ContactMessage>, u64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM contact_messages
            WHERE ($1::bool IS NULL OR is_read = $1)
              AND ($2::bool IS NULL OR responded = $2)
            "#,
        )
        .bind(filters.is_read)
        .bind(filters.responded)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM contact_messages
            WHERE ($1::bool IS NULL OR is_read = $1)
              AND ($2::bool IS NULL OR responded = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filters.is_read)
        .bind(filters.responded)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let messages = rows
            .iter()
            .map(row_to_message)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((messages, total as u64))
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: ContactMessageId) -> ApplicationResult<ContactMessage> {
        let row = sqlx::query(
            "UPDATE contact_messages SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        match row {
            Some(row) => row_to_message(&row),
            None => Err(ContentError::ContactNotFound(id).into()),
        }
    }

    #[instrument(skip(self, notes))]
    async fn add_notes(
        &self,
        id: ContactMessageId,
        notes: &str,
    ) -> ApplicationResult<ContactMessage> {
        let row = sqlx::query(
            "UPDATE contact_messages SET notes = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id.as_uuid())
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        match row {
            Some(row) => row_to_message(&row),
            None => Err(ContentError::ContactNotFound(id).into()),
        }
    }
}
