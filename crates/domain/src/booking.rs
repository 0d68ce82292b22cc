//! The booking ledger.
//!
//! A [`Booking`] is the central business entity: a client's reserved
//! fireworks / stage-FX engagement with pricing, payment tracking, and a
//! directed status lifecycle. All derived-field math (balance, payment
//! status, cancellation fee) lives here so every layer above observes the
//! same invariants.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{BookingError, UnknownVariant};
use crate::identifiers::BookingId;

/// Venue type for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueType {
    Indoor,
    Outdoor,
    Mixed,
}

impl VenueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indoor => "indoor",
            Self::Outdoor => "outdoor",
            Self::Mixed => "mixed",
        }
    }
}

impl FromStr for VenueType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "indoor" => Ok(Self::Indoor),
            "outdoor" => Ok(Self::Outdoor),
            "mixed" => Ok(Self::Mixed),
            other => Err(UnknownVariant::new("venue_type", other)),
        }
    }
}

/// Kind of pyrotechnic display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    Ground,
    Aerial,
    Mixed,
}

impl DisplayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Aerial => "aerial",
            Self::Mixed => "mixed",
        }
    }
}

impl FromStr for DisplayType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ground" => Ok(Self::Ground),
            "aerial" => Ok(Self::Aerial),
            "mixed" => Ok(Self::Mixed),
            other => Err(UnknownVariant::new("display_type", other)),
        }
    }
}

/// Booking lifecycle status.
///
/// Transitions form a directed acyclic graph; `completed` and `cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Whether the state machine permits moving from `self` to `target`.
    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::InProgress)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }

    /// Terminal statuses have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn all() -> &'static [BookingStatus] {
        &[
            Self::Pending,
            Self::Confirmed,
            Self::InProgress,
            Self::Completed,
            Self::Cancelled,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownVariant::new("booking_status", other)),
        }
    }
}

/// Payment status, derived from the deposit running total.
///
/// `Refunded` is only ever set by an explicit external action; the ledger
/// never derives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Refunded,
}

impl PaymentStatus {
    /// Pure derivation from `(deposit_paid, effective_total)`.
    ///
    /// Paid when the balance has reached zero, partial when something but
    /// not everything has been collected, pending otherwise.
    pub fn derive(deposit_paid: Decimal, effective_total: Decimal) -> Self {
        if deposit_paid >= effective_total {
            Self::Paid
        } else if deposit_paid > Decimal::ZERO {
            Self::Partial
        } else {
            Self::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownVariant::new("payment_status", other)),
        }
    }
}

/// Cancellation fee schedule, stepped by days remaining until the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationPolicy {
    /// Inside this window the late fee rate applies
    pub late_window_days: i64,
    /// Inside this window (but outside the late window) the standard rate applies
    pub standard_window_days: i64,
    /// Fee rate for late cancellations
    pub late_fee_rate: Decimal,
    /// Fee rate for standard-window cancellations
    pub standard_fee_rate: Decimal,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self {
            late_window_days: 7,
            standard_window_days: 30,
            late_fee_rate: dec!(0.50),
            standard_fee_rate: dec!(0.20),
        }
    }
}

impl CancellationPolicy {
    /// Fee owed for cancelling `days_until_event` days before the event.
    pub fn fee(&self, total_price: Decimal, days_until_event: i64) -> Decimal {
        let rate = if days_until_event < self.late_window_days {
            self.late_fee_rate
        } else if days_until_event < self.standard_window_days {
            self.standard_fee_rate
        } else {
            Decimal::ZERO
        };
        (total_price * rate).round_dp(2)
    }
}

/// Booking business-rule constants, injected rather than read from globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Minimum gap in days between booking creation and the event date
    pub min_lead_days: i64,
    /// Cancellation fee schedule
    pub cancellation: CancellationPolicy,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            min_lead_days: 7,
            cancellation: CancellationPolicy::default(),
        }
    }
}

impl BookingPolicy {
    /// Enforce the minimum advance-booking window.
    pub fn validate_lead_time(
        &self,
        event_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), BookingError> {
        let days = (event_date - today).num_days();
        if days < self.min_lead_days {
            return Err(BookingError::EventDateTooSoon {
                event_date,
                min_lead_days: self.min_lead_days,
            });
        }
        Ok(())
    }
}

/// Caller-supplied intake data for a new booking.
///
/// Derived fields (statuses, balance, timestamps) are computed by
/// [`Booking::create`], never supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDraft {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_address: Option<String>,
    pub event_type: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_location: String,
    pub venue_type: VenueType,
    pub expected_guests: Option<u32>,
    pub service_type: String,
    pub service_package: String,
    pub additional_services: Vec<String>,
    pub display_duration: String,
    pub display_type: DisplayType,
    pub colors_requested: Option<String>,
    pub music_sync: bool,
    pub special_effects: Option<String>,
    pub base_price: Decimal,
    pub additional_charges: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
    pub special_instructions: Option<String>,
    pub emergency_contact: Option<String>,
    pub insurance_required: bool,
    pub team_size: Option<u32>,
    pub created_by: Option<String>,
}

/// A client's reserved event engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,

    // Client information
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_address: Option<String>,

    // Event details
    pub event_type: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_location: String,
    pub venue_type: VenueType,
    pub expected_guests: Option<u32>,

    // Service details
    pub service_type: String,
    pub service_package: String,
    pub additional_services: Vec<String>,

    // Display details
    pub display_duration: String,
    pub display_type: DisplayType,
    pub colors_requested: Option<String>,
    pub music_sync: bool,
    pub special_effects: Option<String>,

    // Pricing
    pub base_price: Decimal,
    pub additional_charges: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
    pub deposit_paid: Decimal,
    pub balance_due: Decimal,

    // Status
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,

    // Lifecycle timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    // Operational
    pub special_instructions: Option<String>,
    pub emergency_contact: Option<String>,
    pub insurance_required: bool,
    pub permit_required: bool,
    pub permit_obtained: bool,
    pub assigned_team_leader: Option<String>,
    pub team_size: u32,

    // Cancellation record (informational, for manual reconciliation)
    pub cancellation_reason: Option<String>,
    pub cancellation_fee: Option<Decimal>,

    // Audit
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// Default crew size when intake does not override it.
const DEFAULT_TEAM_SIZE: u32 = 3;

impl Booking {
    /// Build a new booking from validated intake data.
    ///
    /// Discount nets against the outstanding balance:
    /// `balance_due = max(0, total_price - discount)` at creation, and the
    /// same effective total drives all later payment math. `total_price`
    /// stays gross as supplied.
    pub fn create(id: BookingId, draft: BookingDraft, now: DateTime<Utc>) -> Self {
        let effective_total = (draft.total_price - draft.discount).max(Decimal::ZERO);

        Self {
            id,
            client_name: draft.client_name,
            client_email: draft.client_email.to_lowercase(),
            client_phone: draft.client_phone,
            client_address: draft.client_address,
            event_type: draft.event_type,
            event_name: draft.event_name,
            event_date: draft.event_date,
            event_time: draft.event_time,
            event_location: draft.event_location,
            venue_type: draft.venue_type,
            expected_guests: draft.expected_guests,
            service_type: draft.service_type,
            service_package: draft.service_package,
            additional_services: draft.additional_services,
            display_duration: draft.display_duration,
            display_type: draft.display_type,
            colors_requested: draft.colors_requested,
            music_sync: draft.music_sync,
            special_effects: draft.special_effects,
            base_price: draft.base_price,
            additional_charges: draft.additional_charges,
            discount: draft.discount,
            total_price: draft.total_price,
            deposit_paid: Decimal::ZERO,
            balance_due: effective_total,
            booking_status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
            confirmed_at: None,
            completed_at: None,
            special_instructions: draft.special_instructions,
            emergency_contact: draft.emergency_contact,
            insurance_required: draft.insurance_required,
            // Fireworks displays always require a permit
            permit_required: true,
            permit_obtained: false,
            assigned_team_leader: None,
            team_size: draft.team_size.unwrap_or(DEFAULT_TEAM_SIZE),
            cancellation_reason: None,
            cancellation_fee: None,
            created_by: draft.created_by,
            updated_by: None,
        }
    }

    /// The collectible total after discount, floored at zero.
    pub fn effective_total(&self) -> Decimal {
        (self.total_price - self.discount).max(Decimal::ZERO)
    }

    /// Whole days between `today` and the event date (negative if past).
    pub fn days_until_event(&self, today: NaiveDate) -> i64 {
        (self.event_date - today).num_days()
    }

    /// Apply a payment to the deposit running total.
    ///
    /// Rejects non-positive amounts. Cumulative overpayment is permitted;
    /// the balance floors at zero and the caller is expected to flag it.
    pub fn record_payment(
        &mut self,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        if amount <= Decimal::ZERO {
            return Err(BookingError::NonPositivePayment { amount });
        }

        self.deposit_paid += amount;
        let effective_total = self.effective_total();
        self.balance_due = (effective_total - self.deposit_paid).max(Decimal::ZERO);
        self.payment_status = PaymentStatus::derive(self.deposit_paid, effective_total);
        self.updated_at = now;
        Ok(())
    }

    /// Move the booking to `target` if the state machine permits it.
    ///
    /// Entering `confirmed` stamps `confirmed_at`, entering `completed`
    /// stamps `completed_at`; both are set at most once and never cleared.
    pub fn transition_to(
        &mut self,
        target: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        if !self.booking_status.can_transition_to(target) {
            return Err(BookingError::InvalidStatusTransition {
                from: self.booking_status,
                to: target,
            });
        }

        self.booking_status = target;
        match target {
            BookingStatus::Confirmed if self.confirmed_at.is_none() => {
                self.confirmed_at = Some(now);
            }
            BookingStatus::Completed if self.completed_at.is_none() => {
                self.completed_at = Some(now);
            }
            _ => {}
        }
        self.updated_at = now;
        Ok(())
    }

    /// Cancel the booking and record the fee owed under `policy`.
    ///
    /// The fee is informational: it is stored and returned but never
    /// deducted from the deposit automatically.
    pub fn cancel(
        &mut self,
        reason: Option<String>,
        today: NaiveDate,
        policy: &CancellationPolicy,
        now: DateTime<Utc>,
    ) -> Result<Decimal, BookingError> {
        if self.booking_status.is_terminal() {
            return Err(BookingError::InvalidStatusTransition {
                from: self.booking_status,
                to: BookingStatus::Cancelled,
            });
        }

        let fee = policy.fee(self.total_price, self.days_until_event(today));
        self.booking_status = BookingStatus::Cancelled;
        self.cancellation_reason = reason;
        self.cancellation_fee = Some(fee);
        self.updated_at = now;
        Ok(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn draft(total_price: Decimal, discount: Decimal) -> BookingDraft {
        BookingDraft {
            client_name: "Amina Odhiambo".into(),
            client_email: "Amina@Example.com".into(),
            client_phone: "+254700111222".into(),
            client_address: None,
            event_type: "wedding".into(),
            event_name: "Odhiambo Wedding".into(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            event_time: "20:00".into(),
            event_location: "Karen Country Club".into(),
            venue_type: VenueType::Outdoor,
            expected_guests: Some(250),
            service_type: "fireworks".into(),
            service_package: "gold".into(),
            additional_services: vec![],
            display_duration: "15 minutes".into(),
            display_type: DisplayType::Aerial,
            colors_requested: Some("gold, white".into()),
            music_sync: true,
            special_effects: None,
            base_price: total_price,
            additional_charges: Decimal::ZERO,
            discount,
            total_price,
            special_instructions: None,
            emergency_contact: None,
            insurance_required: true,
            team_size: None,
            created_by: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn booking(total_price: Decimal, discount: Decimal) -> Booking {
        Booking::create(BookingId::new(), draft(total_price, discount), now())
    }

    #[test]
    fn create_nets_discount_into_initial_balance() {
        let b = booking(dec!(75000), dec!(5000));
        assert_eq!(b.balance_due, dec!(70000));
        assert_eq!(b.deposit_paid, Decimal::ZERO);
        assert_eq!(b.booking_status, BookingStatus::Pending);
        assert_eq!(b.payment_status, PaymentStatus::Pending);
        assert!(b.permit_required);
        assert!(!b.permit_obtained);
        assert_eq!(b.team_size, 3);
        assert_eq!(b.client_email, "amina@example.com");
    }

    #[test]
    fn partial_payment_updates_balance_and_status() {
        let mut b = booking(dec!(75000), Decimal::ZERO);
        b.record_payment(dec!(25000), now()).unwrap();
        assert_eq!(b.deposit_paid, dec!(25000));
        assert_eq!(b.balance_due, dec!(50000));
        assert_eq!(b.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn full_payment_reaches_paid() {
        let mut b = booking(dec!(75000), Decimal::ZERO);
        b.record_payment(dec!(25000), now()).unwrap();
        b.record_payment(dec!(50000), now()).unwrap();
        assert_eq!(b.deposit_paid, dec!(75000));
        assert_eq!(b.balance_due, Decimal::ZERO);
        assert_eq!(b.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn overpayment_floors_balance_at_zero() {
        let mut b = booking(dec!(10000), Decimal::ZERO);
        b.record_payment(dec!(15000), now()).unwrap();
        assert_eq!(b.balance_due, Decimal::ZERO);
        assert_eq!(b.deposit_paid, dec!(15000));
        assert_eq!(b.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn non_positive_payment_rejected() {
        let mut b = booking(dec!(10000), Decimal::ZERO);
        assert!(matches!(
            b.record_payment(Decimal::ZERO, now()),
            Err(BookingError::NonPositivePayment { .. })
        ));
        assert!(matches!(
            b.record_payment(dec!(-5), now()),
            Err(BookingError::NonPositivePayment { .. })
        ));
        // Booking unchanged after rejection
        assert_eq!(b.deposit_paid, Decimal::ZERO);
        assert_eq!(b.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn payment_with_discount_reaches_paid_at_effective_total() {
        let mut b = booking(dec!(75000), dec!(5000));
        b.record_payment(dec!(70000), now()).unwrap();
        assert_eq!(b.balance_due, Decimal::ZERO);
        assert_eq!(b.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn confirmed_at_set_once_on_confirm() {
        let mut b = booking(dec!(10000), Decimal::ZERO);
        let t1 = now();
        b.transition_to(BookingStatus::Confirmed, t1).unwrap();
        assert_eq!(b.confirmed_at, Some(t1));

        let t2 = t1 + chrono::Duration::hours(1);
        b.transition_to(BookingStatus::InProgress, t2).unwrap();
        b.transition_to(BookingStatus::Completed, t2).unwrap();
        assert_eq!(b.confirmed_at, Some(t1));
        assert_eq!(b.completed_at, Some(t2));
    }

    #[test]
    fn skipping_states_is_rejected() {
        let mut b = booking(dec!(10000), Decimal::ZERO);
        let err = b
            .transition_to(BookingStatus::Completed, now())
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::InvalidStatusTransition {
                from: BookingStatus::Pending,
                to: BookingStatus::Completed,
            }
        ));
        assert_eq!(b.booking_status, BookingStatus::Pending);
    }

    #[test]
    fn cancellation_fee_tiers() {
        let policy = CancellationPolicy::default();
        assert_eq!(policy.fee(dec!(100000), 3), dec!(50000.00));
        assert_eq!(policy.fee(dec!(100000), 6), dec!(50000.00));
        assert_eq!(policy.fee(dec!(100000), 7), dec!(20000.00));
        assert_eq!(policy.fee(dec!(100000), 29), dec!(20000.00));
        assert_eq!(policy.fee(dec!(100000), 30), Decimal::ZERO);
        assert_eq!(policy.fee(dec!(100000), 40), Decimal::ZERO);
    }

    #[test]
    fn cancel_records_fee_and_reason() {
        let mut b = booking(dec!(100000), Decimal::ZERO);
        // Event 3 days away
        let today = b.event_date - chrono::Duration::days(3);
        let fee = b
            .cancel(Some("venue flooded".into()), today, &CancellationPolicy::default(), now())
            .unwrap();
        assert_eq!(fee, dec!(50000.00));
        assert_eq!(b.booking_status, BookingStatus::Cancelled);
        assert_eq!(b.cancellation_fee, Some(dec!(50000.00)));
        assert_eq!(b.cancellation_reason.as_deref(), Some("venue flooded"));
        // Fee is informational: the deposit is untouched
        assert_eq!(b.deposit_paid, Decimal::ZERO);
    }

    #[test]
    fn cancel_terminal_booking_rejected() {
        let mut b = booking(dec!(10000), Decimal::ZERO);
        let today = b.event_date - chrono::Duration::days(40);
        b.cancel(None, today, &CancellationPolicy::default(), now())
            .unwrap();
        let err = b
            .cancel(None, today, &CancellationPolicy::default(), now())
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidStatusTransition { .. }));
    }

    #[test]
    fn lead_time_enforced() {
        let policy = BookingPolicy::default();
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert!(policy
            .validate_lead_time(today + chrono::Duration::days(7), today)
            .is_ok());
        assert!(policy
            .validate_lead_time(today + chrono::Duration::days(6), today)
            .is_err());
    }

    proptest! {
        /// payment_status is a pure function of (deposit_paid, effective total)
        /// and the balance invariant holds after any sequence length 1 of payments.
        #[test]
        fn balance_invariant_holds(total in 1u64..10_000_000, paid in 1u64..10_000_000) {
            let total = Decimal::from(total);
            let paid = Decimal::from(paid);
            let mut b = booking(total, Decimal::ZERO);
            b.record_payment(paid, now()).unwrap();

            prop_assert_eq!(b.balance_due, (total - paid).max(Decimal::ZERO));
            let expected = if b.balance_due == Decimal::ZERO {
                PaymentStatus::Paid
            } else if b.deposit_paid > Decimal::ZERO {
                PaymentStatus::Partial
            } else {
                PaymentStatus::Pending
            };
            prop_assert_eq!(b.payment_status, expected);
        }
    }
}
