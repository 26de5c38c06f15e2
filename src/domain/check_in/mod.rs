//! Check-in module - attendance records and the eligibility gate.

#[allow(clippy::module_inception)]
mod check_in;
mod gate;
mod local_day;

pub use check_in::{class_slot, normalize_class_type, CheckIn, CheckInKey, CheckInMethod};
pub use gate::{DenialReason, EligibilityGate, GateDecision};
pub use local_day::LocalDay;
