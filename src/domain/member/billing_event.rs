//! Out-of-band billing confirmations from the payment processor.
//!
//! These arrive via webhook in the request layer; the engine only decides how
//! each one moves the member through the lifecycle.

use serde::{Deserialize, Serialize};

use super::SubscriptionState;

/// A processor notification about one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BillingEvent {
    /// An invoice for the subscription was paid.
    PaymentSucceeded { subscription_id: String },

    /// An invoice charge failed; the processor will retry.
    PaymentFailed { subscription_id: String },

    /// The subscription ended on the processor (period end after cancel, or retries exhausted).
    SubscriptionEnded { subscription_id: String },
}

impl BillingEvent {
    pub fn subscription_id(&self) -> &str {
        match self {
            BillingEvent::PaymentSucceeded { subscription_id }
            | BillingEvent::PaymentFailed { subscription_id }
            | BillingEvent::SubscriptionEnded { subscription_id } => subscription_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BillingEvent::PaymentSucceeded { .. } => "payment_succeeded",
            BillingEvent::PaymentFailed { .. } => "payment_failed",
            BillingEvent::SubscriptionEnded { .. } => "subscription_ended",
        }
    }
}

/// What applying a billing event did to the member record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingEventOutcome {
    /// The record moved between lifecycle states.
    Applied {
        from: SubscriptionState,
        to: SubscriptionState,
    },

    /// The event did not apply to the record as it stands.
    Ignored { reason: &'static str },
}

impl BillingEventOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, BillingEventOutcome::Applied { .. })
    }
}
