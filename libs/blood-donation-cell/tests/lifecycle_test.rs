// libs/blood-donation-cell/tests/lifecycle_test.rs

use assert_matches::assert_matches;

use blood_donation_cell::models::{BloodGroup, DonationError, DonationRequestStatus};
use blood_donation_cell::services::lifecycle::DonationLifecycleService;

use DonationRequestStatus::*;

#[test]
fn test_pending_transitions() {
    let lifecycle = DonationLifecycleService::new();

    assert_eq!(lifecycle.valid_transitions(Pending), vec![Accepted, Rejected, Cancelled]);
    assert!(lifecycle.validate_transition(Pending, Accepted).is_ok());
    assert!(lifecycle.validate_transition(Pending, Rejected).is_ok());
    assert!(lifecycle.validate_transition(Pending, Cancelled).is_ok());
    assert_matches!(
        lifecycle.validate_transition(Pending, Completed),
        Err(DonationError::InvalidStatusTransition { from: Pending, to: Completed })
    );
}

#[test]
fn test_accepted_transitions() {
    let lifecycle = DonationLifecycleService::new();

    assert_eq!(lifecycle.valid_transitions(Accepted), vec![Completed, Cancelled]);
    assert!(lifecycle.validate_transition(Accepted, Completed).is_ok());
    assert_matches!(
        lifecycle.validate_transition(Accepted, Rejected),
        Err(DonationError::InvalidStatusTransition { .. })
    );
    assert_matches!(
        lifecycle.validate_transition(Accepted, Pending),
        Err(DonationError::InvalidStatusTransition { .. })
    );
}

#[test]
fn test_terminal_statuses_have_no_exits() {
    let lifecycle = DonationLifecycleService::new();

    for status in [Rejected, Completed, Cancelled] {
        assert!(lifecycle.is_terminal(status));
        assert!(!lifecycle.is_active(status));
        assert!(lifecycle.valid_transitions(status).is_empty());
        assert!(lifecycle.validate_transition(status, Pending).is_err());
    }
    assert!(lifecycle.is_active(Pending));
    assert!(lifecycle.is_active(Accepted));
}

#[test]
fn test_availability_is_derived_from_latest_status() {
    let lifecycle = DonationLifecycleService::new();

    assert!(lifecycle.is_available_for_request(None));
    assert!(lifecycle.is_available_for_request(Some(Completed)));
    assert!(lifecycle.is_available_for_request(Some(Rejected)));
    assert!(!lifecycle.is_available_for_request(Some(Pending)));
    assert!(!lifecycle.is_available_for_request(Some(Accepted)));
}

#[test]
fn test_status_parse_loose() {
    assert_eq!(DonationRequestStatus::parse_loose("Accepted"), Some(Accepted));
    assert_eq!(DonationRequestStatus::parse_loose("  approved "), Some(Accepted));
    assert_eq!(DonationRequestStatus::parse_loose("DECLINED"), Some(Rejected));
    assert_eq!(DonationRequestStatus::parse_loose("canceled"), Some(Cancelled));
    assert_eq!(DonationRequestStatus::parse_loose("Cancelled"), Some(Cancelled));
    assert_eq!(DonationRequestStatus::parse_loose("fulfilled"), Some(Completed));
    assert_eq!(DonationRequestStatus::parse_loose("maybe"), None);

    assert_matches!(
        "maybe".parse::<DonationRequestStatus>(),
        Err(DonationError::UnknownStatus(ref s)) if s == "maybe"
    );
}

#[test]
fn test_status_serializes_with_capitalized_names() {
    assert_eq!(serde_json::to_string(&Accepted).unwrap(), "\"Accepted\"");
    assert_eq!(Pending.to_string(), "Pending");

    let parsed: DonationRequestStatus = serde_json::from_str("\"canceled\"").unwrap();
    assert_eq!(parsed, Cancelled);
}

#[test]
fn test_blood_group_parse_loose() {
    assert_eq!(BloodGroup::parse_loose("A+"), Some(BloodGroup::APositive));
    assert_eq!(BloodGroup::parse_loose("ab -"), Some(BloodGroup::AbNegative));
    assert_eq!(BloodGroup::parse_loose("o positive"), Some(BloodGroup::OPositive));
    assert_eq!(BloodGroup::parse_loose("0-ve"), Some(BloodGroup::ONegative));
    assert_eq!(BloodGroup::parse_loose("B neg"), Some(BloodGroup::BNegative));
    assert_eq!(BloodGroup::parse_loose("B"), None);
    assert_eq!(BloodGroup::parse_loose("C+"), None);

    for group in BloodGroup::ALL {
        assert_eq!(BloodGroup::parse_loose(group.as_str()), Some(group));
        assert_eq!(
            serde_json::to_string(&group).unwrap(),
            format!("\"{}\"", group)
        );
    }
}
