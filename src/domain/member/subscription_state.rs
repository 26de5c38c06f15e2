//! Subscription lifecycle state machine.
//!
//! ```text
//! inactive ──► trial ──► active ◄──► past_due
//!                │          │           │
//!                └──────────┴─────┬─────┘
//!                                 ▼
//!                          cancel_pending ──► cancelled ──► trial / active
//! ```
//!
//! `cancel_pending` is the processor-side state (cancel at period end). The
//! member record itself jumps straight to `cancelled` so access is revoked
//! immediately.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

use super::{MemberStatus, PaymentStatus};

/// Position of a member in the subscription lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    /// No live subscription (new record, drop-in visitor, lapsed).
    Inactive,

    /// Subscription exists inside its trial window.
    Trial,

    /// Subscription paid up.
    Active,

    /// Latest charge failed; processor retrying.
    PastDue,

    /// Processor will end the subscription at period end.
    CancelPending,

    /// Subscription ended or cancelled by the member.
    Cancelled,
}

impl SubscriptionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionState::Inactive => "inactive",
            SubscriptionState::Trial => "trial",
            SubscriptionState::Active => "active",
            SubscriptionState::PastDue => "past_due",
            SubscriptionState::CancelPending => "cancel_pending",
            SubscriptionState::Cancelled => "cancelled",
        }
    }

    /// Derives the lifecycle position from the two stored status columns.
    pub fn of(status: MemberStatus, payment_status: PaymentStatus) -> Self {
        match (status, payment_status) {
            (MemberStatus::Trial, _) => SubscriptionState::Trial,
            (MemberStatus::Active, PaymentStatus::PastDue) => SubscriptionState::PastDue,
            (MemberStatus::Active, _) => SubscriptionState::Active,
            (MemberStatus::Cancelled, _) => SubscriptionState::Cancelled,
            (MemberStatus::Inactive | MemberStatus::Pending, _) => SubscriptionState::Inactive,
        }
    }

    /// Returns true while a billing subscription is live on the processor.
    pub fn has_live_subscription(&self) -> bool {
        matches!(
            self,
            SubscriptionState::Trial | SubscriptionState::Active | SubscriptionState::PastDue
        )
    }

    /// Returns true if a new subscription may be started from here.
    pub fn can_resubscribe(&self) -> bool {
        matches!(self, SubscriptionState::Inactive | SubscriptionState::Cancelled)
    }
}

impl StateMachine for SubscriptionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionState::*;
        matches!(
            (self, target),
            // From INACTIVE
            (Inactive, Trial)
                | (Inactive, Active)
            // From TRIAL
                | (Trial, Active)
                | (Trial, PastDue)
                | (Trial, CancelPending)
                | (Trial, Cancelled)
            // From ACTIVE
                | (Active, Active) // Renewal
                | (Active, PastDue)
                | (Active, CancelPending)
                | (Active, Cancelled)
            // From PAST_DUE
                | (PastDue, Active)
                | (PastDue, CancelPending)
                | (PastDue, Cancelled)
            // From CANCEL_PENDING
                | (CancelPending, Cancelled)
            // From CANCELLED (resubscribe creates a new subscription)
                | (Cancelled, Trial)
                | (Cancelled, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionState::*;
        match self {
            Inactive => vec![Trial, Active],
            Trial => vec![Active, PastDue, CancelPending, Cancelled],
            Active => vec![Active, PastDue, CancelPending, Cancelled],
            PastDue => vec![Active, CancelPending, Cancelled],
            CancelPending => vec![Cancelled],
            Cancelled => vec![Trial, Active],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SubscriptionState; 6] = [
        SubscriptionState::Inactive,
        SubscriptionState::Trial,
        SubscriptionState::Active,
        SubscriptionState::PastDue,
        SubscriptionState::CancelPending,
        SubscriptionState::Cancelled,
    ];

    #[test]
    fn derives_past_due_from_active_record_with_failed_payment() {
        assert_eq!(
            SubscriptionState::of(MemberStatus::Active, PaymentStatus::PastDue),
            SubscriptionState::PastDue
        );
    }

    #[test]
    fn pending_record_has_no_subscription() {
        let state = SubscriptionState::of(MemberStatus::Pending, PaymentStatus::None);
        assert_eq!(state, SubscriptionState::Inactive);
        assert!(!state.has_live_subscription());
        assert!(state.can_resubscribe());
    }

    #[test]
    fn past_due_recovers_to_active() {
        assert_eq!(
            SubscriptionState::PastDue.transition_to(SubscriptionState::Active),
            Ok(SubscriptionState::Active)
        );
    }

    #[test]
    fn cancelled_can_resubscribe_into_trial() {
        assert!(SubscriptionState::Cancelled.can_transition_to(&SubscriptionState::Trial));
        assert!(SubscriptionState::Cancelled.can_resubscribe());
    }

    #[test]
    fn cancel_pending_only_moves_to_cancelled() {
        assert_eq!(
            SubscriptionState::CancelPending.valid_transitions(),
            vec![SubscriptionState::Cancelled]
        );
        assert!(SubscriptionState::CancelPending
            .transition_to(SubscriptionState::Active)
            .is_err());
    }

    #[test]
    fn inactive_cannot_be_cancelled() {
        assert!(!SubscriptionState::Inactive.can_transition_to(&SubscriptionState::Cancelled));
    }

    #[test]
    fn no_state_is_terminal() {
        for state in ALL {
            assert!(!state.is_terminal(), "{:?} should not be terminal", state);
        }
    }

    #[test]
    fn valid_transitions_are_consistent_with_can_transition_to() {
        for state in ALL {
            for target in ALL {
                assert_eq!(
                    state.can_transition_to(&target),
                    state.valid_transitions().contains(&target),
                    "{:?} -> {:?}",
                    state,
                    target
                );
            }
        }
    }
}
