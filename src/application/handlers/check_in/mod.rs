//! Check-in handlers.
//!
//! ## Commands
//! - Checking a member in through the eligibility gate
//! - Recording a signed waiver
//!
//! ## Queries
//! - Waiver status for a member

mod check_in_member;
mod get_waiver_status;
mod member_resolver;
mod sign_waiver;

// Commands
pub use check_in_member::{
    CheckInMemberCommand, CheckInMemberHandler, CheckInMemberResult, CheckInOutcome, MemberRef,
};
pub use sign_waiver::{SignWaiverCommand, SignWaiverHandler, SignWaiverResult};

// Queries
pub use get_waiver_status::{GetWaiverStatusHandler, GetWaiverStatusQuery, GetWaiverStatusResult};

// Lookup
pub use member_resolver::{
    EmailResolver, IdResolver, MemberCodeResolver, MemberResolver, MemberResolverChain,
    PhoneSuffixResolver, QrCodeResolver, ShortIdResolver, PHONE_SUFFIX_DIGITS,
};
