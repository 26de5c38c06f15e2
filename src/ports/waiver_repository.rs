//! Waiver repository port.
//!
//! Waivers are append-only: renewed consent is saved as a new waiver and the
//! most recent one of a type governs.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::waiver::Waiver;

#[async_trait]
pub trait WaiverRepository: Send + Sync {
    /// Append a signed waiver.
    async fn save(&self, waiver: &Waiver) -> Result<(), DomainError>;

    /// Most recently signed waiver of the given type for a member.
    ///
    /// Type comparison is case-insensitive.
    async fn find_latest_by_type(
        &self,
        member_id: &MemberId,
        waiver_type: &str,
    ) -> Result<Option<Waiver>, DomainError>;

    /// Every waiver a member has signed, oldest first.
    async fn list_for_member(&self, member_id: &MemberId) -> Result<Vec<Waiver>, DomainError>;
}
