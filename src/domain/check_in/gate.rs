//! Check-in eligibility gate.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. member exists
//! 2. membership status is active
//! 3. payment status is active
//! 4. liability waiver on file, inside its window, not outgrown
//! 5. no check-in yet today for the same class type
//!
//! The duplicate check is last so that a member who lost eligibility is told
//! why, rather than being shown yesterday's idempotent success.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::member::{Member, MemberStatus, PaymentStatus};
use crate::domain::waiver::{Waiver, WaiverPolicy, WaiverStatus};

use super::{CheckIn, LocalDay};

/// Why the gate refused a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NotFound,
    InactiveMembership,
    PaymentNotActive,
    WaiverInvalidOrMissing,
}

impl DenialReason {
    pub fn code(&self) -> ErrorCode {
        match self {
            DenialReason::NotFound => ErrorCode::MemberNotFound,
            DenialReason::InactiveMembership => ErrorCode::InactiveMembership,
            DenialReason::PaymentNotActive => ErrorCode::PaymentNotActive,
            DenialReason::WaiverInvalidOrMissing => ErrorCode::WaiverInvalidOrMissing,
        }
    }

    /// Message shown at the kiosk.
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::NotFound => "We couldn't find that member. Please see the front desk.",
            DenialReason::InactiveMembership => {
                "This membership is not active. Please see the front desk."
            }
            DenialReason::PaymentNotActive => {
                "There is a problem with this membership's payment. Please update billing details."
            }
            DenialReason::WaiverInvalidOrMissing => {
                "A current liability waiver is required. Please sign a new waiver."
            }
        }
    }
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Eligible; the caller records a check-in for `local_day`.
    Admit {
        local_day: LocalDay,
        waiver: WaiverStatus,
    },
    /// Eligible but already checked in today; idempotent success.
    AlreadyCheckedIn(CheckIn),
    Deny(DenialReason),
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, GateDecision::Admit { .. })
    }

    pub fn denial(&self) -> Option<DenialReason> {
        match self {
            GateDecision::Deny(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Pure admit/deny decision over record snapshots.
#[derive(Debug, Clone)]
pub struct EligibilityGate {
    policy: WaiverPolicy,
    tz: Tz,
}

impl EligibilityGate {
    pub fn new(policy: WaiverPolicy, tz: Tz) -> Self {
        Self { policy, tz }
    }

    pub fn policy(&self) -> &WaiverPolicy {
        &self.policy
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// The local day `now` falls in.
    pub fn local_day(&self, now: Timestamp) -> LocalDay {
        LocalDay::containing(now, self.tz)
    }

    /// Decides whether `member` may check in at `now`.
    ///
    /// `waiver` should be the member's most recent waiver of the required
    /// type; any other type counts as missing. `todays_check_ins` may contain
    /// rows from other days or members, which are ignored.
    pub fn evaluate(
        &self,
        member: Option<&Member>,
        waiver: Option<&Waiver>,
        todays_check_ins: &[CheckIn],
        class_type: Option<&str>,
        now: Timestamp,
    ) -> GateDecision {
        let Some(member) = member else {
            return GateDecision::Deny(DenialReason::NotFound);
        };

        if member.status != MemberStatus::Active {
            return GateDecision::Deny(DenialReason::InactiveMembership);
        }

        if member.payment_status != PaymentStatus::Active {
            return GateDecision::Deny(DenialReason::PaymentNotActive);
        }

        let waiver = waiver.filter(|w| w.member_id == member.id && w.is_type(&self.policy.required_type));
        let status = self.policy.assess(waiver, member.birth_date, now);
        if !status.is_valid {
            return GateDecision::Deny(DenialReason::WaiverInvalidOrMissing);
        }

        let local_day = self.local_day(now);
        let existing = todays_check_ins.iter().find(|c| {
            c.member_id == member.id && local_day.contains(c.checked_in_at) && c.same_class(class_type)
        });
        if let Some(existing) = existing {
            return GateDecision::AlreadyCheckedIn(existing.clone());
        }

        GateDecision::Admit {
            local_day,
            waiver: status,
        }
    }
}
