//! Booking repository implementation.
//!
//! The three ledger mutations (status transition, payment, cancellation)
//! run inside a transaction with `SELECT ... FOR UPDATE` row locking, so
//! concurrent mutations of the same booking serialize and the additive
//! deposit update is never lost. The domain entity performs the actual
//! state change inside the critical section.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use pyrostage_application::services::{BookingFilters, BookingRepositoryPort, BookingStats};
use pyrostage_application::{ApplicationError, ApplicationResult};
use pyrostage_common::pagination::PaginationParams;
use pyrostage_domain::booking::{Booking, BookingStatus, CancellationPolicy};
use pyrostage_domain::errors::BookingError;
use pyrostage_domain::identifiers::BookingId;

use super::{map_sqlx_err, parse_stored};

/// PostgreSQL implementation of [`BookingRepositoryPort`].
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_booking(row: &PgRow) -> Result<Booking, ApplicationError> {
    let venue_type: String = row.get("venue_type");
    let display_type: String = row.get("display_type");
    let booking_status: String = row.get("booking_status");
    let payment_status: String = row.get("payment_status");

    Ok(Booking {
        id: BookingId::from(row.get::<uuid::Uuid, _>("id")),
        client_name: row.get("client_name"),
        client_email: row.get("client_email"),
        client_phone: row.get("client_phone"),
        client_address: row.get("client_address"),
        event_type: row.get("event_type"),
        event_name: row.get("event_name"),
        event_date: row.get("event_date"),
        event_time: row.get("event_time"),
        event_location: row.get("event_location"),
        venue_type: parse_stored(&venue_type, "venue_type")?,
        expected_guests: row
            .get::<Option<i32>, _>("expected_guests")
            .map(|g| g as u32),
        service_type: row.get("service_type"),
        service_package: row.get("service_package"),
        additional_services: row.get("additional_services"),
        display_duration: row.get("display_duration"),
        display_type: parse_stored(&display_type, "display_type")?,
        colors_requested: row.get("colors_requested"),
        music_sync: row.get("music_sync"),
        special_effects: row.get("special_effects"),
        base_price: row.get("base_price"),
        additional_charges: row.get("additional_charges"),
        discount: row.get("discount"),
        total_price: row.get("total_price"),
        deposit_paid: row.get("deposit_paid"),
        balance_due: row.get("balance_due"),
        booking_status: parse_stored(&booking_status, "booking_status")?,
        payment_status: parse_stored(&payment_status, "payment_status")?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        confirmed_at: row.get("confirmed_at"),
        completed_at: row.get("completed_at"),
        special_instructions: row.get("special_instructions"),
        emergency_contact: row.get("emergency_contact"),
        insurance_required: row.get("insurance_required"),
        permit_required: row.get("permit_required"),
        permit_obtained: row.get("permit_obtained"),
        assigned_team_leader: row.get("assigned_team_leader"),
        team_size: row.get::<i32, _>("team_size") as u32,
        cancellation_reason: row.get("cancellation_reason"),
        cancellation_fee: row.get("cancellation_fee"),
        created_by: row.get("created_by"),
        updated_by: row.get("updated_by"),
    })
}

/// Lock a booking row for update inside `tx`.
async fn fetch_for_update(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: BookingId,
) -> ApplicationResult<Booking> {
    let row = sqlx::query("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_sqlx_err)?;

    match row {
        Some(row) => row_to_booking(&row),
        None => Err(BookingError::NotFound(id).into()),
    }
}

#[async_trait]
impl BookingRepositoryPort for PgBookingRepository {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn create(&self, booking: &Booking) -> ApplicationResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, client_name, client_email, client_phone, client_address,
                event_type, event_name, event_date, event_time, event_location,
                venue_type, expected_guests, service_type, service_package,
                additional_services, display_duration, display_type,
                colors_requested, music_sync, special_effects,
                base_price, additional_charges, discount, total_price,
                deposit_paid, balance_due, booking_status, payment_status,
                created_at, updated_at, confirmed_at, completed_at,
                special_instructions, emergency_contact, insurance_required,
                permit_required, permit_obtained, assigned_team_leader,
                team_size, cancellation_reason, cancellation_fee,
                created_by, updated_by
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24, $25, $26, $27, $28, $29, $30,
                $31, $32, $33, $34, $35, $36, $37, $38, $39, $40,
                $41, $42, $43
            )
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(&booking.client_name)
        .bind(&booking.client_email)
        .bind(&booking.client_phone)
        .bind(&booking.client_address)
        .bind(&booking.event_type)
        .bind(&booking.event_name)
        .bind(booking.event_date)
        .bind(&booking.event_time)
        .bind(&booking.event_location)
        .bind(booking.venue_type.as_str())
        .bind(booking.expected_guests.map(|g| g as i32))
        .bind(&booking.service_type)
        .bind(&booking.service_package)
        .bind(&booking.additional_services)
        .bind(&booking.display_duration)
        .bind(booking.display_type.as_str())
        .bind(&booking.colors_requested)
        .bind(booking.music_sync)
        .bind(&booking.special_effects)
        .bind(booking.base_price)
        .bind(booking.additional_charges)
        .bind(booking.discount)
        .bind(booking.total_price)
        .bind(booking.deposit_paid)
        .bind(booking.balance_due)
        .bind(booking.booking_status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .bind(booking.confirmed_at)
        .bind(booking.completed_at)
        .bind(&booking.special_instructions)
        .bind(&booking.emergency_contact)
        .bind(booking.insurance_required)
        .bind(booking.permit_required)
        .bind(booking.permit_obtained)
        .bind(&booking.assigned_team_leader)
        .bind(booking.team_size as i32)
        .bind(&booking.cancellation_reason)
        .bind(booking.cancellation_fee)
        .bind(&booking.created_by)
        .bind(&booking.updated_by)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        debug!(booking_id = %booking.id, "Booking row inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: BookingId) -> ApplicationResult<Option<Booking>> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.as_ref().map(row_to_booking).transpose()
    }

    #[instrument(skip(self, filters))]
    async fn list(
        &self,
        filters: &BookingFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<Booking>, u64)> {
        let status = filters.status.map(|s| s.as_str().to_string());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE ($1::text IS NULL OR booking_status = $1)
              AND ($2::date IS NULL OR event_date >= $2)
              AND ($3::date IS NULL OR event_date <= $3)
              AND ($4::text IS NULL OR client_email = $4)
              AND ($5::text IS NULL OR service_type = $5)
            "#,
        )
        .bind(&status)
        .bind(filters.date_from)
        .bind(filters.date_to)
        .bind(&filters.client_email)
        .bind(&filters.service_type)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM bookings
            WHERE ($1::text IS NULL OR booking_status = $1)
              AND ($2::date IS NULL OR event_date >= $2)
              AND ($3::date IS NULL OR event_date <= $3)
              AND ($4::text IS NULL OR client_email = $4)
              AND ($5::text IS NULL OR service_type = $5)
            ORDER BY event_date ASC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(&status)
        .bind(filters.date_from)
        .bind(filters.date_to)
        .bind(&filters.client_email)
        .bind(&filters.service_type)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let bookings = rows
            .iter()
            .map(row_to_booking)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((bookings, total as u64))
    }

    #[instrument(skip(self))]
    async fn transition_status(
        &self,
        id: BookingId,
        target: BookingStatus,
        now: DateTime<Utc>,
        updated_by: Option<String>,
    ) -> ApplicationResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let mut booking = fetch_for_update(&mut tx, id).await?;
        booking.transition_to(target, now)?;
        booking.updated_by = updated_by;

        sqlx::query(
            r#"
            UPDATE bookings SET
                booking_status = $2,
                confirmed_at = $3,
                completed_at = $4,
                updated_at = $5,
                updated_by = $6
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(booking.booking_status.as_str())
        .bind(booking.confirmed_at)
        .bind(booking.completed_at)
        .bind(booking.updated_at)
        .bind(&booking.updated_by)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;
        debug!(booking_id = %id, status = %booking.booking_status, "Booking status persisted");
        Ok(booking)
    }

    #[instrument(skip(self))]
    async fn record_payment(
        &self,
        id: BookingId,
        amount: Decimal,
        now: DateTime<Utc>,
        recorded_by: Option<String>,
    ) -> ApplicationResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let mut booking = fetch_for_update(&mut tx, id).await?;
        booking.record_payment(amount, now)?;
        booking.updated_by = recorded_by;

        sqlx::query(
            r#"
            UPDATE bookings SET
                deposit_paid = $2,
                balance_due = $3,
                payment_status = $4,
                updated_at = $5,
                updated_by = $6
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(booking.deposit_paid)
        .bind(booking.balance_due)
        .bind(booking.payment_status.as_str())
        .bind(booking.updated_at)
        .bind(&booking.updated_by)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;
        debug!(booking_id = %id, deposit = %booking.deposit_paid, "Payment persisted");
        Ok(booking)
    }

    #[instrument(skip(self, policy))]
    async fn cancel(
        &self,
        id: BookingId,
        reason: Option<String>,
        today: NaiveDate,
        policy: &CancellationPolicy,
        now: DateTime<Utc>,
        cancelled_by: Option<String>,
    ) -> ApplicationResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let mut booking = fetch_for_update(&mut tx, id).await?;
        booking.cancel(reason, today, policy, now)?;
        booking.updated_by = cancelled_by;

        sqlx::query(
            r#"
            UPDATE bookings SET
                booking_status = $2,
                cancellation_reason = $3,
                cancellation_fee = $4,
                updated_at = $5,
                updated_by = $6
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(booking.booking_status.as_str())
        .bind(&booking.cancellation_reason)
        .bind(booking.cancellation_fee)
        .bind(booking.updated_at)
        .bind(&booking.updated_by)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;
        debug!(booking_id = %id, "Cancellation persisted");
        Ok(booking)
    }

    #[instrument(skip(self))]
    async fn upcoming(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        client_email: Option<&str>,
    ) -> ApplicationResult<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM bookings
            WHERE event_date >= $1
              AND event_date <= $2
              AND booking_status != 'cancelled'
              AND ($3::text IS NULL OR client_email = $3)
            ORDER BY event_date ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(client_email)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        rows.iter().map(row_to_booking).collect()
    }

    #[instrument(skip(self))]
    async fn booked_dates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApplicationResult<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT event_date FROM bookings
            WHERE booking_status = 'confirmed'
              AND event_date >= $1
              AND event_date <= $2
            ORDER BY event_date ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(dates)
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> ApplicationResult<BookingStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_bookings,
                COUNT(*) FILTER (WHERE booking_status = 'pending') AS pending_bookings,
                COUNT(*) FILTER (WHERE booking_status = 'completed') AS completed_events,
                COALESCE(SUM(total_price) FILTER (WHERE booking_status = 'completed'), 0)
                    AS total_revenue
            FROM bookings
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(BookingStats {
            total_bookings: row.get::<i64, _>("total_bookings") as u64,
            pending_bookings: row.get::<i64, _>("pending_bookings") as u64,
            completed_events: row.get::<i64, _>("completed_events") as u64,
            total_revenue: row.get("total_revenue"),
        })
    }
}
