//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the timestamp value object, the lifecycle state
//! machine trait, and the error types shared across the engine.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CheckInId, FamilyAccountId, MemberId, WaiverId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
