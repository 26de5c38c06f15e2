//! Waiver module - signed liability consent and its validity rules.

mod age;
mod policy;
mod validity;
#[allow(clippy::module_inception)]
mod waiver;

pub use age::{age_in_years, is_minor, ADULT_AGE};
pub use policy::{ValidityPeriod, WaiverPolicy};
pub use validity::{Severity, WaiverStatus, WaiverWarning};
pub use waiver::{latest_of_type, CaptureMetadata, SignerRelationship, Waiver, LIABILITY_WAIVER};
