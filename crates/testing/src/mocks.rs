//! In-memory implementations of the application ports.
//!
//! Behavior mirrors the Postgres repositories closely enough for service
//! and API tests: mutations go through the same domain methods, so status
//! and payment invariants hold identically.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::{Mutex, RwLock};
use pyrostage_application::services::{
    BookingFilters, BookingRepositoryPort, BookingStats, CatalogFilters, CatalogRepositoryPort,
    Clock, ContactFilters, ContactRepositoryPort, NewsletterRepositoryPort, Notifier,
    TestimonialFilters, TestimonialRepositoryPort,
};
use pyrostage_application::{ApplicationError, ApplicationResult};
use pyrostage_common::pagination::PaginationParams;
use pyrostage_domain::booking::{Booking, BookingStatus, CancellationPolicy};
use pyrostage_domain::catalog::ServiceOffering;
use pyrostage_domain::contact::ContactMessage;
use pyrostage_domain::errors::{BookingError, ContentError};
use pyrostage_domain::events::NotificationEvent;
use pyrostage_domain::identifiers::{BookingId, ContactMessageId, ServiceId, TestimonialId};
use pyrostage_domain::newsletter::NewsletterSubscriber;
use pyrostage_domain::testimonial::Testimonial;
use rust_decimal::Decimal;
use std::collections::HashMap;

fn paginate<T: Clone>(items: Vec<T>, pagination: &PaginationParams) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let page = items
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .collect();
    (page, total)
}

/// In-memory booking repository.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<BookingId, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a booking directly, bypassing the service layer.
    pub fn seed(&self, booking: Booking) {
        self.bookings.write().insert(booking.id, booking);
    }
}

#[async_trait]
impl BookingRepositoryPort for InMemoryBookingRepository {
    async fn create(&self, booking: &Booking) -> ApplicationResult<()> {
        self.bookings.write().insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: BookingId) -> ApplicationResult<Option<Booking>> {
        Ok(self.bookings.read().get(&id).cloned())
    }

    async fn list(
        &self,
        filters: &BookingFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<Booking>, u64)> {
        let mut bookings: Vec<_> = self
            .bookings
            .read()
            .values()
            .filter(|b| {
                filters.status.map_or(true, |s| b.booking_status == s)
                    && filters.date_from.map_or(true, |d| b.event_date >= d)
                    && filters.date_to.map_or(true, |d| b.event_date <= d)
                    && filters
                        .client_email
                        .as_deref()
                        .map_or(true, |e| b.client_email.eq_ignore_ascii_case(e))
                    && filters
                        .service_type
                        .as_deref()
                        .map_or(true, |s| b.service_type == s)
            })
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.event_date);

        Ok(paginate(bookings, pagination))
    }

    async fn transition_status(
        &self,
        id: BookingId,
        target: BookingStatus,
        now: DateTime<Utc>,
        updated_by: Option<String>,
    ) -> ApplicationResult<Booking> {
        let mut bookings = self.bookings.write();
        let booking = bookings
            .get_mut(&id)
            .ok_or(BookingError::NotFound(id))
            .map_err(ApplicationError::from)?;
        booking.transition_to(target, now)?;
        booking.updated_by = updated_by;
        Ok(booking.clone())
    }

    async fn record_payment(
        &self,
        id: BookingId,
        amount: Decimal,
        now: DateTime<Utc>,
        recorded_by: Option<String>,
    ) -> ApplicationResult<Booking> {
        let mut bookings = self.bookings.write();
        let booking = bookings
            .get_mut(&id)
            .ok_or(BookingError::NotFound(id))
            .map_err(ApplicationError::from)?;
        booking.record_payment(amount, now)?;
        booking.updated_by = recorded_by;
        Ok(booking.clone())
    }

    async fn cancel(
        &self,
        id: BookingId,
        reason: Option<String>,
        today: NaiveDate,
        policy: &CancellationPolicy,
        now: DateTime<Utc>,
        cancelled_by: Option<String>,
    ) -> ApplicationResult<Booking> {
        let mut bookings = self.bookings.write();
        let booking = bookings
            .get_mut(&id)
            .ok_or(BookingError::NotFound(id))
            .map_err(ApplicationError::from)?;
        booking.cancel(reason, today, policy, now)?;
        booking.updated_by = cancelled_by;
        Ok(booking.clone())
    }

    async fn upcoming(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        client_email: Option<&str>,
    ) -> ApplicationResult<Vec<Booking>> {
        let mut bookings: Vec<_> = self
            .bookings
            .read()
            .values()
            .filter(|b| {
                b.event_date >= from
                    && b.event_date <= to
                    && b.booking_status != BookingStatus::Cancelled
                    && client_email.map_or(true, |e| b.client_email.eq_ignore_ascii_case(e))
            })
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.event_date);
        Ok(bookings)
    }

    async fn booked_dates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApplicationResult<Vec<NaiveDate>> {
        let mut dates: Vec<_> = self
            .bookings
            .read()
            .values()
            .filter(|b| {
                b.booking_status == BookingStatus::Confirmed
                    && b.event_date >= from
                    && b.event_date <= to
            })
            .map(|b| b.event_date)
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    async fn stats(&self) -> ApplicationResult<BookingStats> {
        let bookings = self.bookings.read();
        let total_bookings = bookings.len() as u64;
        let pending_bookings = bookings
            .values()
            .filter(|b| b.booking_status == BookingStatus::Pending)
            .count() as u64;
        let completed: Vec<_> = bookings
            .values()
            .filter(|b| b.booking_status == BookingStatus::Completed)
            .collect();
        let completed_events = completed.len() as u64;
        let total_revenue = completed.iter().map(|b| b.total_price).sum();

        Ok(BookingStats {
            total_bookings,
            pending_bookings,
            completed_events,
            total_revenue,
        })
    }
}

/// In-memory contact repository.
#[derive(Default)]
pub struct InMemoryContactRepository {
    messages: RwLock<HashMap<ContactMessageId, ContactMessage>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepositoryPort for InMemoryContactRepository {
    async fn create(&self, message: &ContactMessage) -> ApplicationResult<()> {
        self.messages.write().insert(message.id, message.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: ContactMessageId) -> ApplicationResult<Option<ContactMessage>> {
        Ok(self.messages.read().get(&id).cloned())
    }

    async fn list(
        &self,
        filters: &ContactFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<ContactMessage>, u64)> {
        let mut messages: Vec<_> = self
            .messages
            .read()
            .values()
            .filter(|m| {
                filters.is_read.map_or(true, |r| m.is_read == r)
                    && filters.responded.map_or(true, |r| m.responded == r)
            })
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(messages, pagination))
    }

    async fn mark_read(&self, id: ContactMessageId) -> ApplicationResult<ContactMessage> {
        let mut messages = self.messages.write();
        let message = messages
            .get_mut(&id)
            .ok_or(ContentError::ContactNotFound(id))
            .map_err(ApplicationError::from)?;
        message.is_read = true;
        Ok(message.clone())
    }

    async fn add_notes(
        &self,
        id: ContactMessageId,
        notes: &str,
    ) -> ApplicationResult<ContactMessage> {
        let mut messages = self.messages.write();
        let message = messages
            .get_mut(&id)
            .ok_or(ContentError::ContactNotFound(id))
            .map_err(ApplicationError::from)?;
        message.notes = Some(notes.to_string());
        Ok(message.clone())
    }
}

/// In-memory catalog repository.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    offerings: RwLock<HashMap<ServiceId, ServiceOffering>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepositoryPort for InMemoryCatalogRepository {
    async fn create(&self, offering: &ServiceOffering) -> ApplicationResult<()> {
        self.offerings.write().insert(offering.id, offering.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: ServiceId) -> ApplicationResult<Option<ServiceOffering>> {
        Ok(self.offerings.read().get(&id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> ApplicationResult<Option<ServiceOffering>> {
        Ok(self
            .offerings
            .read()
            .values()
            .find(|o| o.slug == slug)
            .cloned())
    }

    async fn list(
        &self,
        filters: &CatalogFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<ServiceOffering>, u64)> {
        let mut offerings: Vec<_> = self
            .offerings
            .read()
            .values()
            .filter(|o| {
                filters.category.as_deref().map_or(true, |c| o.category == c)
                    && (!filters.popular_only || o.is_popular)
                    && (!filters.active_only || o.is_active)
            })
            .cloned()
            .collect();
        offerings.sort_by_key(|o| o.display_order);
        Ok(paginate(offerings, pagination))
    }

    async fn update(&self, offering: &ServiceOffering) -> ApplicationResult<()> {
        let mut offerings = self.offerings.write();
        if !offerings.contains_key(&offering.id) {
            return Err(ContentError::ServiceNotFound(offering.id).into());
        }
        offerings.insert(offering.id, offering.clone());
        Ok(())
    }

    async fn deactivate(&self, id: ServiceId) -> ApplicationResult<ServiceOffering> {
        let mut offerings = self.offerings.write();
        let offering = offerings
            .get_mut(&id)
            .ok_or(ContentError::ServiceNotFound(id))
            .map_err(ApplicationError::from)?;
        offering.is_active = false;
        Ok(offering.clone())
    }

    async fn slug_exists(&self, slug: &str) -> ApplicationResult<bool> {
        Ok(self.offerings.read().values().any(|o| o.slug == slug))
    }

    async fn active_count(&self) -> ApplicationResult<u64> {
        Ok(self.offerings.read().values().filter(|o| o.is_active).count() as u64)
    }
}

/// In-memory testimonial repository.
#[derive(Default)]
pub struct InMemoryTestimonialRepository {
    testimonials: RwLock<HashMap<TestimonialId, Testimonial>>,
}

impl InMemoryTestimonialRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TestimonialRepositoryPort for InMemoryTestimonialRepository {
    async fn create(&self, testimonial: &Testimonial) -> ApplicationResult<()> {
        self.testimonials
            .write()
            .insert(testimonial.id, testimonial.clone());
        Ok(())
    }

    async fn list(
        &self,
        filters: &TestimonialFilters,
        pagination: &PaginationParams,
    ) -> ApplicationResult<(Vec<Testimonial>, u64)> {
        let mut testimonials: Vec<_> = self
            .testimonials
            .read()
            .values()
            .filter(|t| {
                (!filters.approved_only || t.is_approved)
                    && (!filters.featured_only || t.is_featured)
            })
            .cloned()
            .collect();
        testimonials.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(testimonials, pagination))
    }

    async fn set_approved(
        &self,
        id: TestimonialId,
        approved: bool,
    ) -> ApplicationResult<Testimonial> {
        let mut testimonials = self.testimonials.write();
        let testimonial = testimonials
            .get_mut(&id)
            .ok_or(ContentError::TestimonialNotFound(id))
            .map_err(ApplicationError::from)?;
        testimonial.is_approved = approved;
        Ok(testimonial.clone())
    }

    async fn set_featured(
        &self,
        id: TestimonialId,
        featured: bool,
    ) -> ApplicationResult<Testimonial> {
        let mut testimonials = self.testimonials.write();
        let testimonial = testimonials
            .get_mut(&id)
            .ok_or(ContentError::TestimonialNotFound(id))
            .map_err(ApplicationError::from)?;
        testimonial.is_featured = featured;
        Ok(testimonial.clone())
    }

    async fn approved_count(&self) -> ApplicationResult<u64> {
        Ok(self
            .testimonials
            .read()
            .values()
            .filter(|t| t.is_approved)
            .count() as u64)
    }
}

/// In-memory newsletter repository.
#[derive(Default)]
pub struct InMemoryNewsletterRepository {
    subscribers: RwLock<HashMap<String, NewsletterSubscriber>>,
}

impl InMemoryNewsletterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NewsletterRepositoryPort for InMemoryNewsletterRepository {
    async fn get_by_email(
        &self,
        email: &str,
    ) -> ApplicationResult<Option<NewsletterSubscriber>> {
        Ok(self.subscribers.read().get(email).cloned())
    }

    async fn insert(&self, subscriber: &NewsletterSubscriber) -> ApplicationResult<()> {
        self.subscribers
            .write()
            .insert(subscriber.email.clone(), subscriber.clone());
        Ok(())
    }

    async fn update(&self, subscriber: &NewsletterSubscriber) -> ApplicationResult<()> {
        self.subscribers
            .write()
            .insert(subscriber.email.clone(), subscriber.clone());
        Ok(())
    }

    async fn active_count(&self) -> ApplicationResult<u64> {
        Ok(self
            .subscribers
            .read()
            .values()
            .filter(|s| s.is_active)
            .count() as u64)
    }
}

/// Notifier that records every event for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().clone()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.event_type()).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: NotificationEvent) -> anyhow::Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Notifier whose delivery always fails; operations must still succeed.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _event: NotificationEvent) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("notification channel unavailable"))
    }
}

/// Clock pinned to a settable instant.
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut now = self.now.write();
        *now += duration;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}
