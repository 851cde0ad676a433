//! Property tests for intake transitions.

use proptest::prelude::*;

use super::error::IntakeError;
use super::types::IntakeStatus;
use super::workflow::IntakeWorkflow;

fn arb_status() -> impl Strategy<Value = IntakeStatus> {
    prop_oneof![
        Just(IntakeStatus::Draft),
        Just(IntakeStatus::Submitted),
        Just(IntakeStatus::Approved),
        Just(IntakeStatus::Rejected),
        Just(IntakeStatus::SentToAccounting),
        Just(IntakeStatus::Posted),
        Just(IntakeStatus::ReadyToBill),
        Just(IntakeStatus::Billed),
        Just(IntakeStatus::Archived),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Each operator transition succeeds from exactly one status.
    #[test]
    fn prop_single_source_status(status in arb_status()) {
        prop_assert_eq!(IntakeWorkflow::submit(status).is_ok(), status == IntakeStatus::Draft);
        prop_assert_eq!(IntakeWorkflow::approve(status).is_ok(), status == IntakeStatus::Submitted);
        prop_assert_eq!(
            IntakeWorkflow::send_to_accounting(status).is_ok(),
            status == IntakeStatus::Approved
        );
        prop_assert_eq!(
            IntakeWorkflow::post(status).is_ok(),
            status == IntakeStatus::SentToAccounting
        );
    }

    /// Failed transitions report the current status.
    #[test]
    fn prop_invalid_transition_reports_from(status in arb_status()) {
        prop_assume!(status != IntakeStatus::Draft);
        match IntakeWorkflow::submit(status) {
            Err(IntakeError::InvalidTransition { from, to }) => {
                prop_assert_eq!(from, status);
                prop_assert_eq!(to, IntakeStatus::Submitted);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    /// Blank reasons are refused whatever the status.
    #[test]
    fn prop_blank_reason_refused(status in arb_status(), blank in "[ \t]{0,5}") {
        prop_assert!(matches!(
            IntakeWorkflow::reject(status, &blank),
            Err(IntakeError::RejectionReasonRequired)
        ));
    }

    /// Nothing leaves Rejected.
    #[test]
    fn prop_rejected_is_terminal(reason in "[a-z]{1,20}") {
        let s = IntakeStatus::Rejected;
        prop_assert!(IntakeWorkflow::submit(s).is_err());
        prop_assert!(IntakeWorkflow::approve(s).is_err());
        prop_assert!(IntakeWorkflow::reject(s, &reason).is_err());
        prop_assert!(IntakeWorkflow::send_to_accounting(s).is_err());
        prop_assert!(IntakeWorkflow::post(s).is_err());
    }
}
