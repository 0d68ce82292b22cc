//! Tests for booking status transitions.
//!
//! Exercises the full transition table: every permitted edge, the closure
//! over every non-permitted pair, and terminality of completed/cancelled.

use pyrostage_domain::booking::BookingStatus;

#[test]
fn test_pending_transitions() {
    let pending = BookingStatus::Pending;

    assert!(pending.can_transition_to(BookingStatus::Confirmed));
    assert!(pending.can_transition_to(BookingStatus::Cancelled));

    assert!(!pending.can_transition_to(BookingStatus::InProgress));
    assert!(!pending.can_transition_to(BookingStatus::Completed));
    assert!(!pending.can_transition_to(BookingStatus::Pending)); // no self-loop
}

#[test]
fn test_confirmed_transitions() {
    let confirmed = BookingStatus::Confirmed;

    assert!(confirmed.can_transition_to(BookingStatus::InProgress));
    assert!(confirmed.can_transition_to(BookingStatus::Cancelled));

    assert!(!confirmed.can_transition_to(BookingStatus::Pending));
    assert!(!confirmed.can_transition_to(BookingStatus::Completed));
    assert!(!confirmed.can_transition_to(BookingStatus::Confirmed));
}

#[test]
fn test_in_progress_transitions() {
    let in_progress = BookingStatus::InProgress;

    assert!(in_progress.can_transition_to(BookingStatus::Completed));
    assert!(in_progress.can_transition_to(BookingStatus::Cancelled));

    assert!(!in_progress.can_transition_to(BookingStatus::Pending));
    assert!(!in_progress.can_transition_to(BookingStatus::Confirmed));
    assert!(!in_progress.can_transition_to(BookingStatus::InProgress));
}

#[test]
fn test_completed_is_terminal() {
    let completed = BookingStatus::Completed;

    for target in BookingStatus::all() {
        assert!(
            !completed.can_transition_to(*target),
            "completed must not transition to {:?}",
            target
        );
    }
    assert!(completed.is_terminal());
}

#[test]
fn test_cancelled_is_terminal() {
    let cancelled = BookingStatus::Cancelled;

    for target in BookingStatus::all() {
        assert!(
            !cancelled.can_transition_to(*target),
            "cancelled must not transition to {:?}",
            target
        );
    }
    assert!(cancelled.is_terminal());
}

#[test]
fn test_transition_closure() {
    // The only permitted edges; everything else must be rejected.
    let allowed = [
        (BookingStatus::Pending, BookingStatus::Confirmed),
        (BookingStatus::Pending, BookingStatus::Cancelled),
        (BookingStatus::Confirmed, BookingStatus::InProgress),
        (BookingStatus::Confirmed, BookingStatus::Cancelled),
        (BookingStatus::InProgress, BookingStatus::Completed),
        (BookingStatus::InProgress, BookingStatus::Cancelled),
    ];

    for from in BookingStatus::all() {
        for to in BookingStatus::all() {
            let expected = allowed.contains(&(*from, *to));
            assert_eq!(
                from.can_transition_to(*to),
                expected,
                "transition {:?} -> {:?}",
                from,
                to
            );
        }
    }
}

#[test]
fn test_full_valid_workflow() {
    let mut status = BookingStatus::Pending;

    assert!(status.can_transition_to(BookingStatus::Confirmed));
    status = BookingStatus::Confirmed;

    assert!(status.can_transition_to(BookingStatus::InProgress));
    status = BookingStatus::InProgress;

    assert!(status.can_transition_to(BookingStatus::Completed));
    status = BookingStatus::Completed;

    assert!(status.is_terminal());
}

#[test]
fn test_status_serialization() {
    let status = BookingStatus::InProgress;
    let json = serde_json::to_string(&status).unwrap();
    assert_eq!(json, "\"in_progress\"");

    let deserialized: BookingStatus = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, BookingStatus::InProgress);
}

#[test]
fn test_status_round_trip_via_str() {
    for status in BookingStatus::all() {
        let parsed: BookingStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, *status);
    }
    assert!("unknown".parse::<BookingStatus>().is_err());
}
