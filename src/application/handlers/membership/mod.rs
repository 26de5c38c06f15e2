//! Membership handlers.
//!
//! Command handlers for the subscription lifecycle:
//!
//! ## Commands
//! - Cancelling memberships (record first, processor second)
//! - Resubscribing, with optional promo code
//! - Paying for a drop-in visit
//! - Applying processor billing events

mod apply_billing_event;
mod cancel_membership;
mod drop_in_payment;
mod promo_code_resolver;
mod resubscribe;

pub use apply_billing_event::{
    ApplyBillingEventCommand, ApplyBillingEventHandler, ApplyBillingEventResult,
};
pub use cancel_membership::{
    CancelMembershipCommand, CancelMembershipHandler, CancelMembershipResult,
    ProcessorCancellation,
};
pub use drop_in_payment::{
    DropInPayer, DropInPaymentCommand, DropInPaymentHandler, DropInPaymentResult, Visitor,
};
pub use promo_code_resolver::{PromoCodeResolver, PromoSource, ResolvedPromo};
pub use resubscribe::{ResubscribeCommand, ResubscribeHandler, ResubscribeResult};
