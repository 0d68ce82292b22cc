//! Service-level tests for the booking ledger.
//!
//! Driven through in-memory ports and a fixed clock so every date rule is
//! deterministic.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use pyrostage_application::services::{
    BookingFilters, BookingService, ServiceConfig, ServiceContext,
};
use pyrostage_application::validation::{
    CancelBookingRequest, CreateBookingRequest, RecordPaymentRequest, StatusTransitionRequest,
};
use pyrostage_application::ApplicationError;
use pyrostage_application::Clock;
use pyrostage_common::pagination::PaginationParams;
use pyrostage_domain::booking::{BookingStatus, PaymentStatus};
use pyrostage_domain::errors::BookingError;
use pyrostage_domain::identifiers::BookingId;
use pyrostage_testing::builders::BookingBuilder;
use pyrostage_testing::mocks::{
    FailingNotifier, FixedClock, InMemoryBookingRepository, RecordingNotifier,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

struct Harness {
    service: BookingService,
    repository: Arc<InMemoryBookingRepository>,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<FixedClock>,
}

fn harness() -> Harness {
    let repository = Arc::new(InMemoryBookingRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
    ));
    let service = BookingService::new(
        repository.clone(),
        notifier.clone(),
        clock.clone(),
        ServiceConfig::default(),
    );
    Harness {
        service,
        repository,
        notifier,
        clock,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
}

fn request(event_in_days: i64, total: Decimal, discount: Decimal) -> CreateBookingRequest {
    let mut request = pyrostage_testing::fixtures::booking_request(today() + Duration::days(event_in_days));
    request.total_price = total;
    request.base_price = total;
    request.discount = discount;
    request
}

fn anonymous() -> ServiceContext {
    ServiceContext::anonymous("test-corr")
}

fn admin() -> ServiceContext {
    ServiceContext::authenticated("ops@pyrostage.example", "test-corr").with_admin()
}

fn owner(email: &str) -> ServiceContext {
    ServiceContext::authenticated(email, "test-corr")
}

#[tokio::test]
async fn create_nets_discount_into_initial_balance() {
    let h = harness();

    let booking = h
        .service
        .create(&anonymous(), request(50, dec!(75000), dec!(5000)))
        .await
        .unwrap();

    assert_eq!(booking.balance_due, dec!(70000));
    assert_eq!(booking.deposit_paid, Decimal::ZERO);
    assert_eq!(booking.booking_status, BookingStatus::Pending);
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert!(booking.permit_required);
    assert_eq!(booking.team_size, 3);

    assert_eq!(h.notifier.event_types(), vec!["booking_received"]);
}

#[tokio::test]
async fn create_rejects_event_inside_lead_time() {
    let h = harness();

    let err = h
        .service
        .create(&anonymous(), request(6, dec!(50000), Decimal::ZERO))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Booking(BookingError::EventDateTooSoon { .. })
    ));
    assert_eq!(err.http_status(), 400);
    // Nothing persisted, nothing notified
    assert!(h.notifier.events().is_empty());
}

#[tokio::test]
async fn create_accepts_event_exactly_at_lead_time() {
    let h = harness();
    assert!(h
        .service
        .create(&anonymous(), request(7, dec!(50000), Decimal::ZERO))
        .await
        .is_ok());
}

#[tokio::test]
async fn create_rejects_malformed_email() {
    let h = harness();
    let mut bad = request(50, dec!(50000), Decimal::ZERO);
    bad.client_email = "not-an-email".to_string();

    let err = h.service.create(&anonymous(), bad).await.unwrap_err();
    assert!(matches!(err, ApplicationError::ValidationFailed(_)));
}

#[tokio::test]
async fn payment_flow_partial_then_paid() {
    let h = harness();
    let booking = h
        .service
        .create(&anonymous(), request(50, dec!(75000), Decimal::ZERO))
        .await
        .unwrap();
    let ctx = owner(&booking.client_email);

    let after_first = h
        .service
        .record_payment(
            &ctx,
            booking.id,
            RecordPaymentRequest {
                amount: dec!(25000),
                payment_method: Some("mpesa".into()),
                reference_number: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(after_first.deposit_paid, dec!(25000));
    assert_eq!(after_first.balance_due, dec!(50000));
    assert_eq!(after_first.payment_status, PaymentStatus::Partial);

    let after_second = h
        .service
        .record_payment(
            &ctx,
            booking.id,
            RecordPaymentRequest {
                amount: dec!(50000),
                payment_method: None,
                reference_number: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(after_second.deposit_paid, dec!(75000));
    assert_eq!(after_second.balance_due, Decimal::ZERO);
    assert_eq!(after_second.payment_status, PaymentStatus::Paid);

    assert_eq!(
        h.notifier.event_types(),
        vec!["booking_received", "payment_recorded", "payment_recorded"]
    );
}

#[tokio::test]
async fn payment_rejects_non_positive_amount() {
    let h = harness();
    let booking = h
        .service
        .create(&anonymous(), request(50, dec!(75000), Decimal::ZERO))
        .await
        .unwrap();

    let err = h
        .service
        .record_payment(
            &admin(),
            booking.id,
            RecordPaymentRequest {
                amount: Decimal::ZERO,
                payment_method: None,
                reference_number: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::ValidationFailed(_)));

    // Ledger untouched
    let unchanged = h.service.get(&admin(), booking.id).await.unwrap();
    assert_eq!(unchanged.deposit_paid, Decimal::ZERO);
}

#[tokio::test]
async fn payment_by_non_owner_forbidden() {
    let h = harness();
    let booking = h
        .service
        .create(&anonymous(), request(50, dec!(75000), Decimal::ZERO))
        .await
        .unwrap();

    let err = h
        .service
        .record_payment(
            &owner("someone-else@example.com"),
            booking.id,
            RecordPaymentRequest {
                amount: dec!(1000),
                payment_method: None,
                reference_number: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn transition_confirm_sets_timestamp_and_direct_complete_rejected() {
    let h = harness();
    let booking = h
        .service
        .create(&anonymous(), request(50, dec!(75000), Decimal::ZERO))
        .await
        .unwrap();

    let confirmed = h
        .service
        .transition_status(
            &admin(),
            booking.id,
            StatusTransitionRequest {
                target_status: BookingStatus::Confirmed,
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(confirmed.booking_status, BookingStatus::Confirmed);
    assert_eq!(confirmed.confirmed_at, Some(h.clock.now()));

    // Seed another pending booking and try to jump straight to completed
    let other = h
        .service
        .create(&anonymous(), request(60, dec!(10000), Decimal::ZERO))
        .await
        .unwrap();

    let err = h
        .service
        .transition_status(
            &admin(),
            other.id,
            StatusTransitionRequest {
                target_status: BookingStatus::Completed,
                notes: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Booking(BookingError::InvalidStatusTransition {
            from: BookingStatus::Pending,
            to: BookingStatus::Completed,
        })
    ));

    // Rejected transition leaves the booking unmodified
    let unchanged = h.service.get(&admin(), other.id).await.unwrap();
    assert_eq!(unchanged.booking_status, BookingStatus::Pending);
    assert!(unchanged.completed_at.is_none());
}

#[tokio::test]
async fn transition_requires_admin() {
    let h = harness();
    let booking = h
        .service
        .create(&anonymous(), request(50, dec!(75000), Decimal::ZERO))
        .await
        .unwrap();

    let err = h
        .service
        .transition_status(
            &owner(&booking.client_email),
            booking.id,
            StatusTransitionRequest {
                target_status: BookingStatus::Confirmed,
                notes: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn confirmed_at_is_never_altered_by_later_operations() {
    let h = harness();
    let booking = h
        .service
        .create(&anonymous(), request(50, dec!(75000), Decimal::ZERO))
        .await
        .unwrap();

    let confirmed = h
        .service
        .transition_status(
            &admin(),
            booking.id,
            StatusTransitionRequest {
                target_status: BookingStatus::Confirmed,
                notes: None,
            },
        )
        .await
        .unwrap();
    let confirmed_at = confirmed.confirmed_at;

    h.clock.advance(chrono::Duration::days(2));

    h.service
        .transition_status(
            &admin(),
            booking.id,
            StatusTransitionRequest {
                target_status: BookingStatus::InProgress,
                notes: None,
            },
        )
        .await
        .unwrap();

    let completed = h
        .service
        .transition_status(
            &admin(),
            booking.id,
            StatusTransitionRequest {
                target_status: BookingStatus::Completed,
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(completed.confirmed_at, confirmed_at);
    assert_eq!(completed.completed_at, Some(h.clock.now()));
}

#[tokio::test]
async fn cancellation_fee_depends_on_days_until_event() {
    let h = harness();

    // 3 days out: 50% fee. Too close to create through intake, so seed.
    let close = BookingBuilder::new()
        .with_event_date(today() + Duration::days(3))
        .with_total_price(dec!(100000))
        .build();
    h.repository.seed(close.clone());

    let cancelled = h
        .service
        .cancel(
            &admin(),
            close.id,
            CancelBookingRequest {
                reason: Some("client request".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.cancellation_fee, Some(dec!(50000.00)));
    assert_eq!(cancelled.booking_status, BookingStatus::Cancelled);

    // 40 days out: no fee
    let far = BookingBuilder::new()
        .with_event_date(today() + Duration::days(40))
        .with_total_price(dec!(100000))
        .build();
    h.repository.seed(far.clone());

    let cancelled = h
        .service
        .cancel(&admin(), far.id, CancelBookingRequest::default())
        .await
        .unwrap();
    assert_eq!(cancelled.cancellation_fee, Some(Decimal::ZERO));

    // 10 days out: 20% fee
    let mid = BookingBuilder::new()
        .with_event_date(today() + Duration::days(10))
        .with_total_price(dec!(100000))
        .build();
    h.repository.seed(mid.clone());

    let cancelled = h
        .service
        .cancel(&admin(), mid.id, CancelBookingRequest::default())
        .await
        .unwrap();
    assert_eq!(cancelled.cancellation_fee, Some(dec!(20000.00)));
}

#[tokio::test]
async fn cancelled_booking_rejects_all_further_transitions() {
    let h = harness();
    let booking = h
        .service
        .create(&anonymous(), request(50, dec!(75000), Decimal::ZERO))
        .await
        .unwrap();

    h.service
        .cancel(&admin(), booking.id, CancelBookingRequest::default())
        .await
        .unwrap();

    for target in BookingStatus::all() {
        let result = h
            .service
            .transition_status(
                &admin(),
                booking.id,
                StatusTransitionRequest {
                    target_status: *target,
                    notes: None,
                },
            )
            .await;
        assert!(
            matches!(
                result,
                Err(ApplicationError::Booking(
                    BookingError::InvalidStatusTransition { .. }
                ))
            ),
            "cancelled booking accepted transition to {:?}",
            target
        );
    }

    // Double cancel is also rejected
    let err = h
        .service
        .cancel(&admin(), booking.id, CancelBookingRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Booking(BookingError::InvalidStatusTransition { .. })
    ));
}

#[tokio::test]
async fn notification_failure_never_fails_the_operation() {
    let repository = Arc::new(InMemoryBookingRepository::new());
    let clock = Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
    ));
    let service = BookingService::new(
        repository.clone(),
        Arc::new(FailingNotifier),
        clock,
        ServiceConfig::default(),
    );

    let booking = service
        .create(&anonymous(), request(50, dec!(75000), Decimal::ZERO))
        .await
        .expect("creation must succeed despite notifier failure");

    service
        .record_payment(
            &admin(),
            booking.id,
            RecordPaymentRequest {
                amount: dec!(1000),
                payment_method: None,
                reference_number: None,
            },
        )
        .await
        .expect("payment must succeed despite notifier failure");
}

#[tokio::test]
async fn get_unknown_booking_is_not_found() {
    let h = harness();
    let err = h.service.get(&admin(), BookingId::new()).await.unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Booking(BookingError::NotFound(_))
    ));
    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn list_scopes_non_admin_to_own_bookings() {
    let h = harness();
    let mut first = request(50, dec!(75000), Decimal::ZERO);
    first.client_email = "mine@example.com".to_string();
    let mine = h.service.create(&anonymous(), first).await.unwrap();

    let mut second = request(60, dec!(30000), Decimal::ZERO);
    second.client_email = "theirs@example.com".to_string();
    h.service.create(&anonymous(), second).await.unwrap();

    let page = h
        .service
        .list(
            &owner(&mine.client_email),
            BookingFilters::default(),
            PaginationParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, mine.id);

    let all = h
        .service
        .list(
            &admin(),
            BookingFilters::default(),
            PaginationParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(all.total, 2);

    // Anonymous callers cannot list at all
    let err = h
        .service
        .list(
            &anonymous(),
            BookingFilters::default(),
            PaginationParams::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Unauthorized(_)));
}

#[tokio::test]
async fn availability_blocks_confirmed_dates() {
    let h = harness();
    let booking = h
        .service
        .create(&anonymous(), request(10, dec!(75000), Decimal::ZERO))
        .await
        .unwrap();
    h.service
        .transition_status(
            &admin(),
            booking.id,
            StatusTransitionRequest {
                target_status: BookingStatus::Confirmed,
                notes: None,
            },
        )
        .await
        .unwrap();

    let from = today() + Duration::days(9);
    let to = today() + Duration::days(11);
    let report = h.service.availability(from, to).await.unwrap();

    assert_eq!(report.booked_dates, vec![booking.event_date]);
    assert_eq!(report.available_dates.len(), 2);
    assert!(!report.available_dates.contains(&booking.event_date));
}

#[tokio::test]
async fn stats_require_admin_and_aggregate_completed_revenue() {
    let h = harness();

    let booking = h
        .service
        .create(&anonymous(), request(50, dec!(75000), Decimal::ZERO))
        .await
        .unwrap();
    h.service
        .create(&anonymous(), request(60, dec!(30000), Decimal::ZERO))
        .await
        .unwrap();

    for target in [
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
    ] {
        h.service
            .transition_status(
                &admin(),
                booking.id,
                StatusTransitionRequest {
                    target_status: target,
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    let stats = h.service.stats(&admin()).await.unwrap();
    assert_eq!(stats.total_bookings, 2);
    assert_eq!(stats.pending_bookings, 1);
    assert_eq!(stats.completed_events, 1);
    assert_eq!(stats.total_revenue, dec!(75000));

    let err = h.service.stats(&owner("x@example.com")).await.unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}
