//! Check-in repository port.
//!
//! Storage owns the uniqueness guarantee on
//! `(member_id, local_date, class_type)`. The eligibility gate reads the
//! day's rows first, but two concurrent admits can both pass that read, so
//! `insert` must report the collision instead of writing a second row.

use async_trait::async_trait;

use crate::domain::check_in::{CheckIn, LocalDay};
use crate::domain::foundation::{DomainError, MemberId};

/// Result of an insert against the uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with the same key already exists; carries the stored row.
    Duplicate(CheckIn),
}

#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Check-ins for a member within the given local day.
    async fn find_for_day(
        &self,
        member_id: &MemberId,
        day: &LocalDay,
    ) -> Result<Vec<CheckIn>, DomainError>;

    /// Insert unless a row with the same key exists.
    async fn insert(&self, check_in: &CheckIn) -> Result<InsertOutcome, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_in_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CheckInRepository) {}
    }
}
