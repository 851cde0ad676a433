//! Property tests for invoice transitions.

use proptest::prelude::*;

use super::error::InvoiceError;
use super::lifecycle::InvoiceLifecycle;
use super::types::InvoiceStatus;

fn arb_status() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::InvoiceDraft),
        Just(InvoiceStatus::PendingPartnerApproval),
        Just(InvoiceStatus::ReadyForSap),
        Just(InvoiceStatus::Issued),
        Just(InvoiceStatus::Delivered),
        Just(InvoiceStatus::PlatformRequired),
        Just(InvoiceStatus::PlatformCompleted),
    ]
}

type Transition = fn(InvoiceStatus) -> Result<InvoiceStatus, InvoiceError>;

const TRANSITIONS: [Transition; 6] = [
    InvoiceLifecycle::request_partner_approval,
    InvoiceLifecycle::approve_as_partner,
    InvoiceLifecycle::issue,
    InvoiceLifecycle::deliver,
    InvoiceLifecycle::require_platform,
    InvoiceLifecycle::complete_platform,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Successful transitions always move strictly forward.
    #[test]
    fn prop_transitions_only_move_forward(status in arb_status()) {
        for transition in TRANSITIONS {
            if let Ok(next) = transition(status) {
                prop_assert!(next > status);
            }
        }
    }

    /// Exactly one transition applies to every non-terminal status.
    #[test]
    fn prop_one_transition_per_status(status in arb_status()) {
        let applicable = TRANSITIONS.iter().filter(|t| t(status).is_ok()).count();
        let expected = usize::from(status != InvoiceStatus::PlatformCompleted);
        prop_assert_eq!(applicable, expected);
    }

    /// Issuing is only possible once the partner approved.
    #[test]
    fn prop_issue_requires_ready_for_sap(status in arb_status()) {
        prop_assert_eq!(
            InvoiceLifecycle::issue(status).is_ok(),
            status == InvoiceStatus::ReadyForSap
        );
    }
}
