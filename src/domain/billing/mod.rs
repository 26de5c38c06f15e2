//! Billing module - household rosters, pricing, programs, and family quotes.

mod calculator;
mod family_group;
mod member_type;
mod pricing;
mod program;

pub use calculator::{FamilyQuote, TierBreakdown};
pub use family_group::FamilyGroup;
pub use member_type::{parse_member_types, FamilyRoster, MemberType, RosterEntry};
pub use pricing::{DiscountSchedule, DiscountStep, FamilyPricing, RoundingRule};
pub use program::{ProgramCatalog, ProgramPrice};
