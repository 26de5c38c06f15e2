//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, error codes, state machine)
//! - `errors` - Engine error taxonomy returned by every operation
//! - `member` - Member record and the subscription lifecycle
//! - `waiver` - Waiver records and the validity calculator
//! - `check_in` - Check-in records, local days, and the eligibility gate
//! - `billing` - Family pricing and quotes

pub mod billing;
pub mod check_in;
pub mod errors;
pub mod foundation;
pub mod member;
pub mod waiver;
