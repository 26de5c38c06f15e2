//! Member record status enums.
//!
//! `MemberStatus` and `PaymentStatus` are the two columns stored on a member
//! row. The eligibility gate reads them directly; lifecycle changes go
//! through [`SubscriptionState`](super::SubscriptionState).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership status as stored on the member record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Subscription created, trial window running, first charge not yet confirmed.
    Trial,

    /// Paid-up member allowed to train.
    Active,

    /// Lapsed member with no live subscription.
    Inactive,

    /// Member cancelled; access revoked immediately.
    Cancelled,

    /// Record exists (drop-in visitor, waiver-only signup) but no subscription yet.
    Pending,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Trial => "trial",
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
            MemberStatus::Cancelled => "cancelled",
            MemberStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing-side payment status mirrored onto the member record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No billing relationship.
    #[default]
    None,

    /// Awaiting the first successful charge.
    Pending,

    /// Most recent charge succeeded.
    Active,

    /// Most recent charge failed; processor is retrying.
    PastDue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::None => "none",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Active => "active",
            PaymentStatus::PastDue => "past_due",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_status_serializes_snake_case() {
        let json = serde_json::to_string(&MemberStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn payment_status_deserializes_past_due() {
        let status: PaymentStatus = serde_json::from_str("\"past_due\"").unwrap();
        assert_eq!(status, PaymentStatus::PastDue);
    }

    #[test]
    fn payment_status_defaults_to_none() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::None);
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(MemberStatus::Trial.to_string(), "trial");
        assert_eq!(PaymentStatus::PastDue.to_string(), "past_due");
    }
}
