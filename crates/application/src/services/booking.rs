//! Booking service.
//!
//! Orchestrates the booking ledger: intake validation with the lead-time
//! rule, status transitions, payment application, cancellation with fee
//! computation, and the read-side queries (listing, upcoming, calendar
//! availability, dashboard stats). All mutations go through the repository
//! port as single transactional units; transient conflicts are retried a
//! bounded number of times.

use super::{Clock, Notifier, ServiceConfig, ServiceContext};
use crate::validation::{
    CancelBookingRequest, CreateBookingRequest, RecordPaymentRequest, StatusTransitionRequest,
    Validatable,
};
use crate::{ApplicationError, ApplicationResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use pyrostage_common::datetime::date_range_inclusive;
use pyrostage_common::pagination::{DateRange, PaginatedResult, PaginationParams};
use pyrostage_common::retry::retry_with_predicate;
use pyrostage_domain::booking::{Booking, BookingStatus, CancellationPolicy};
use pyrostage_domain::errors::BookingError;
use pyrostage_domain::events::{BookingSnapshot, NotificationEvent};
use pyrostage_domain::identifiers::BookingId;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Query filters for booking listings.
#[derive(Debug, Clone, Default)]
pub struct BookingFilters {
    pub status: Option<BookingStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub client_email: Option<String>,
    pub service_type: Option<String>,
}

/// Aggregates for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct BookingStats {
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub completed_events: u64,
    /// Revenue over completed events
    pub total_revenue: Decimal,
}

/// Calendar availability over a date range. Confirmed bookings block dates.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub booked_dates: Vec<NaiveDate>,
    pub available_dates: Vec<NaiveDate>,
}

/// Storage port for the booking ledger.
///
/// `transition_status`, `record_payment`, and `cancel` are atomic
/// read-validate-write units: implementations must lock the row for the
/// duration so concurrent mutations serialize and the additive deposit
/// update is never lost.
#[async_trait]
pub trait BookingRepositoryPort: Send + Sync {
    async fn create(&self, booking: &Booking) -> ApplicationResult<()>;

    async fn get_by_id(&self, id: BookingId) -> ApplicationResult<Option<Booking>>;

    async fn list(
        &self,
        filters: &BookingFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<Booking>, u64)>;

    async fn transition_status(
        &self,
        id: BookingId,
        target: BookingStatus,
        now: DateTime<Utc>,
        updated_by: Option<String>,
    ) -> ApplicationResult<Booking>;

    async fn record_payment(
        &self,
        id: BookingId,
        amount: Decimal,
        now: DateTime<Utc>,
        recorded_by: Option<String>,
    ) -> ApplicationResult<Booking>;

    async fn cancel(
        &self,
        id: BookingId,
        reason: Option<String>,
        today: NaiveDate,
        policy: &CancellationPolicy,
        now: DateTime<Utc>,
        cancelled_by: Option<String>,
    ) -> ApplicationResult<Booking>;

    async fn upcoming(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        client_email: Option<&str>,
    ) -> ApplicationResult<Vec<Booking>>;

    /// Event dates of confirmed bookings inside the range.
    async fn booked_dates(&self, from: NaiveDate, to: NaiveDate)
        -> ApplicationResult<Vec<NaiveDate>>;

    async fn stats(&self) -> ApplicationResult<BookingStats>;
}

/// Booking service implementation.
pub struct BookingService {
    repository: Arc<dyn BookingRepositoryPort>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl BookingService {
    pub fn new(
        repository: Arc<dyn BookingRepositoryPort>,
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

    /// Create a new booking from a validated intake request.
    #[instrument(skip(self, ctx, request), fields(correlation_id = %ctx.correlation_id))]
    pub async fn create(
        &self,
        ctx: &ServiceContext,
        request: CreateBookingRequest,
    ) -> ApplicationResult<Booking> {
        request.validate_all().ensure_valid()?;

        let now = self.clock.now();
        self.config
            .policy
            .validate_lead_time(request.event_date, self.clock.today())
            .map_err(ApplicationError::from)?;

        let draft = request.into_draft(ctx.actor_email.clone());
        let booking = Booking::create(BookingId::new(), draft, now);

        self.repository.create(&booking).await?;

        info!(
            booking_id = %booking.id,
            event = %booking.event_name,
            client = %booking.client_email,
            "Booking created"
        );

        self.dispatch(NotificationEvent::BookingReceived {
            booking: BookingSnapshot::from(&booking),
        })
        .await;

        Ok(booking)
    }

    /// Fetch a booking; owners see their own, staff see everything.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn get(&self, ctx: &ServiceContext, id: BookingId) -> ApplicationResult<Booking> {
        let booking = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(BookingError::NotFound(id))?;

        if !ctx.can_access(&booking.client_email) {
            return Err(ApplicationError::Forbidden(
                "Not authorized to access this booking".to_string(),
            ));
        }

        Ok(booking)
    }

    /// List bookings with filters; non-staff callers only see their own.
    #[instrument(skip(self, ctx, filters), fields(correlation_id = %ctx.correlation_id))]
    pub async fn list(
        &self,
        ctx: &ServiceContext,
        mut filters: BookingFilters,
        pagination: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Booking>> {
        if !ctx.is_admin {
            let email = ctx.require_authenticated()?;
            filters.client_email = Some(email.to_string());
        }

        let pagination = PaginationParams::new(
            pagination.page,
            pagination.per_page.min(self.config.max_page_size),
        );

        let (items, total) = self.repository.list(&filters, &pagination).await?;
        Ok(PaginatedResult::from_params(items, &pagination, total))
    }

    /// Transition a booking along the status state machine. Staff only.
    #[instrument(skip(self, ctx, request), fields(correlation_id = %ctx.correlation_id))]
    pub async fn transition_status(
        &self,
        ctx: &ServiceContext,
        id: BookingId,
        request: StatusTransitionRequest,
    ) -> ApplicationResult<Booking> {
        request.validate_all().ensure_valid()?;
        ctx.require_admin()?;

        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(BookingError::NotFound(id))?;
        let old_status = existing.booking_status;

        let now = self.clock.now();
        let updated = self
            .with_retry(|| {
                self.repository.transition_status(
                    id,
                    request.target_status,
                    now,
                    ctx.actor_email.clone(),
                )
            })
            .await?;

        info!(
            booking_id = %id,
            from = %old_status,
            to = %updated.booking_status,
            "Booking status transitioned"
        );

        self.dispatch(NotificationEvent::BookingStatusChanged {
            booking: BookingSnapshot::from(&updated),
            old_status,
            new_status: updated.booking_status,
            notes: request.notes.clone(),
        })
        .await;

        Ok(updated)
    }

    /// Apply a payment to the deposit running total.
    #[instrument(skip(self, ctx, request), fields(correlation_id = %ctx.correlation_id))]
    pub async fn record_payment(
        &self,
        ctx: &ServiceContext,
        id: BookingId,
        request: RecordPaymentRequest,
    ) -> ApplicationResult<Booking> {
        request.validate_all().ensure_valid()?;

        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(BookingError::NotFound(id))?;

        if !ctx.can_access(&existing.client_email) {
            return Err(ApplicationError::Forbidden(
                "Not authorized to record payment for this booking".to_string(),
            ));
        }

        let now = self.clock.now();
        let updated = self
            .with_retry(|| {
                self.repository
                    .record_payment(id, request.amount, now, ctx.actor_email.clone())
            })
            .await?;

        info!(
            booking_id = %id,
            amount = %request.amount,
            balance_due = %updated.balance_due,
            payment_status = %updated.payment_status,
            "Payment recorded"
        );

        if updated.deposit_paid > updated.effective_total() {
            warn!(
                booking_id = %id,
                deposit_paid = %updated.deposit_paid,
                effective_total = %updated.effective_total(),
                "Cumulative deposit exceeds effective total; flag for reconciliation"
            );
        }

        self.dispatch(NotificationEvent::PaymentRecorded {
            booking: BookingSnapshot::from(&updated),
            amount: request.amount,
        })
        .await;

        Ok(updated)
    }

    /// Cancel a booking, recording the schedule-based fee.
    #[instrument(skip(self, ctx, request), fields(correlation_id = %ctx.correlation_id))]
    pub async fn cancel(
        &self,
        ctx: &ServiceContext,
        id: BookingId,
        request: CancelBookingRequest,
    ) -> ApplicationResult<Booking> {
        request.validate_all().ensure_valid()?;

        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(BookingError::NotFound(id))?;

        if !ctx.can_access(&existing.client_email) {
            return Err(ApplicationError::Forbidden(
                "Not authorized to cancel this booking".to_string(),
            ));
        }

        let today = self.clock.today();
        let now = self.clock.now();
        let updated = self
            .with_retry(|| {
                self.repository.cancel(
                    id,
                    request.reason.clone(),
                    today,
                    &self.config.policy.cancellation,
                    now,
                    ctx.actor_email.clone(),
                )
            })
            .await?;

        let fee = updated.cancellation_fee.unwrap_or(Decimal::ZERO);
        warn!(
            booking_id = %id,
            fee = %fee,
            reason = request.reason.as_deref().unwrap_or("-"),
            "Booking cancelled"
        );

        self.dispatch(NotificationEvent::BookingCancelled {
            booking: BookingSnapshot::from(&updated),
            fee,
            reason: request.reason.clone(),
        })
        .await;

        Ok(updated)
    }

    /// Bookings whose event falls inside the next `days` days.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn upcoming(
        &self,
        ctx: &ServiceContext,
        days: i64,
    ) -> ApplicationResult<Vec<Booking>> {
        let email_filter = if ctx.is_admin {
            None
        } else {
            Some(ctx.require_authenticated()?.to_string())
        };

        let from = self.clock.today();
        let to = from + chrono::Duration::days(days);
        self.repository
            .upcoming(from, to, email_filter.as_deref())
            .await
    }

    /// Calendar availability for a date range.
    #[instrument(skip(self))]
    pub async fn availability(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> ApplicationResult<AvailabilityReport> {
        DateRange::new(Some(date_from), Some(date_to))
            .validate()
            .map_err(ApplicationError::ValidationFailed)?;

        let booked = self.repository.booked_dates(date_from, date_to).await?;
        let available = date_range_inclusive(date_from, date_to)
            .into_iter()
            .filter(|date| !booked.contains(date))
            .collect();

        Ok(AvailabilityReport {
            date_from,
            date_to,
            booked_dates: booked,
            available_dates: available,
        })
    }

    /// Dashboard aggregates. Staff only.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn stats(&self, ctx: &ServiceContext) -> ApplicationResult<BookingStats> {
        ctx.require_admin()?;
        self.repository.stats().await
    }

    /// Retry transient storage conflicts a bounded number of times.
    async fn with_retry<F, Fut>(&self, operation: F) -> ApplicationResult<Booking>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = ApplicationResult<Booking>>,
    {
        retry_with_predicate(self.config.retry.clone(), operation, |err| {
            err.is_retryable()
        })
        .await
    }

    /// Dispatch a notification; failures are logged, never propagated.
    async fn dispatch(&self, event: NotificationEvent) {
        let event_type = event.event_type();
        if let Err(error) = self.notifier.notify(event).await {
            warn!(%error, event_type, "Notification dispatch failed");
        } else {
            debug!(event_type, "Notification dispatched");
        }
    }
}
