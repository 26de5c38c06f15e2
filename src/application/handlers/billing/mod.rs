//! Family billing handlers.
//!
//! Household quotes and family account linking.

mod family_billing;
mod link_family_member;

pub use family_billing::{FamilyBillingHandler, QuoteFamilyQuery, QuoteFamilyResult, RosterQuote};
pub use link_family_member::{
    LinkFamilyMemberCommand, LinkFamilyMemberHandler, LinkFamilyMemberResult,
};
