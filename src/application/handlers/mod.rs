//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod billing;
pub mod check_in;
pub mod membership;

pub use billing::{
    FamilyBillingHandler, LinkFamilyMemberCommand, LinkFamilyMemberHandler,
    LinkFamilyMemberResult, QuoteFamilyQuery, QuoteFamilyResult, RosterQuote,
};
pub use check_in::{
    CheckInMemberCommand, CheckInMemberHandler, CheckInMemberResult, CheckInOutcome,
    GetWaiverStatusHandler, GetWaiverStatusQuery, GetWaiverStatusResult, MemberRef,
    MemberResolverChain, SignWaiverCommand, SignWaiverHandler, SignWaiverResult,
};
pub use membership::{
    ApplyBillingEventCommand, ApplyBillingEventHandler, ApplyBillingEventResult,
    CancelMembershipCommand, CancelMembershipHandler, CancelMembershipResult, DropInPayer,
    DropInPaymentCommand, DropInPaymentHandler, DropInPaymentResult, ProcessorCancellation,
    PromoCodeResolver, ResubscribeCommand, ResubscribeHandler, ResubscribeResult, Visitor,
};
