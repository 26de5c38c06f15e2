//! Member repository port.
//!
//! Defines the contract for persisting and looking up Member records.
//!
//! # Design
//!
//! - **Alternate keys**: `qr_code`, `member_code`, and `short_id` are unique
//!   when present; `save` and `update` reject collisions with
//!   `DuplicateLookupKey`
//! - **No deletes**: members are never hard-deleted
//! - **Phone suffix**: the only lookup that may return several members

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, FamilyAccountId, MemberId};
use crate::domain::member::Member;

/// Repository port for Member persistence.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Save a new member.
    ///
    /// # Errors
    ///
    /// - `DuplicateLookupKey` if an alternate lookup key is already taken
    /// - `DatabaseError` on persistence failure
    async fn save(&self, member: &Member) -> Result<(), DomainError>;

    /// Update an existing member.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the member doesn't exist
    /// - `DuplicateLookupKey` if an alternate lookup key is already taken
    async fn update(&self, member: &Member) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError>;

    /// Case-insensitive email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, DomainError>;

    async fn find_by_qr_code(&self, qr_code: &str) -> Result<Option<Member>, DomainError>;

    async fn find_by_member_code(&self, member_code: &str) -> Result<Option<Member>, DomainError>;

    async fn find_by_short_id(&self, short_id: u32) -> Result<Option<Member>, DomainError>;

    /// Members whose phone number ends with the given digits.
    async fn find_by_phone_suffix(&self, digits: &str) -> Result<Vec<Member>, DomainError>;

    /// Member that owns the given processor subscription.
    async fn find_by_billing_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Member>, DomainError>;

    /// All members of a household.
    async fn find_by_family(
        &self,
        family_account_id: &FamilyAccountId,
    ) -> Result<Vec<Member>, DomainError>;
}
