//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory member, waiver, and check-in storage
//! - `payment` - Scriptable mock payment processor

pub mod memory;
pub mod payment;

pub use memory::{InMemoryCheckInRepository, InMemoryMemberRepository, InMemoryWaiverRepository};
pub use payment::MockPaymentProvider;
