//! Member domain module.
//!
//! The member record, its stored status columns, and the subscription
//! lifecycle state machine that governs changes to them.

mod billing_event;
#[allow(clippy::module_inception)]
mod member;
mod status;
mod subscription_state;

pub use billing_event::{BillingEvent, BillingEventOutcome};
pub use member::{Member, DROP_IN_PROGRAM};
pub use status::{MemberStatus, PaymentStatus};
pub use subscription_state::SubscriptionState;
