//! In-memory member repository.
//!
//! Enforces the alternate-key uniqueness that a database would enforce with
//! unique indexes, so handlers see the same errors in tests as in production.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, FamilyAccountId, MemberId};
use crate::domain::member::Member;
use crate::ports::MemberRepository;

/// In-memory storage for member records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberRepository {
    members: Arc<RwLock<HashMap<MemberId, Member>>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored members.
    pub async fn count(&self) -> usize {
        self.members.read().await.len()
    }

    /// All stored members, in no particular order.
    pub async fn all(&self) -> Vec<Member> {
        self.members.read().await.values().cloned().collect()
    }

    async fn find_one<F>(&self, predicate: F) -> Option<Member>
    where
        F: Fn(&Member) -> bool,
    {
        self.members
            .read()
            .await
            .values()
            .find(|m| predicate(m))
            .cloned()
    }
}

/// Returns an error if `member` reuses another member's lookup key.
fn check_lookup_keys(
    members: &HashMap<MemberId, Member>,
    member: &Member,
) -> Result<(), DomainError> {
    for other in members.values().filter(|m| m.id != member.id) {
        let collision = if member.qr_code.is_some() && member.qr_code == other.qr_code {
            Some("qr_code")
        } else if member.member_code.is_some() && member.member_code == other.member_code {
            Some("member_code")
        } else if member.short_id.is_some() && member.short_id == other.short_id {
            Some("short_id")
        } else {
            None
        };

        if let Some(key) = collision {
            return Err(DomainError::new(
                ErrorCode::DuplicateLookupKey,
                format!("{} already belongs to member {}", key, other.id),
            )
            .with_detail("key", key));
        }
    }
    Ok(())
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn save(&self, member: &Member) -> Result<(), DomainError> {
        let mut members = self.members.write().await;
        if members.contains_key(&member.id) {
            return Err(DomainError::validation(
                "id",
                format!("member {} already exists", member.id),
            ));
        }
        check_lookup_keys(&members, member)?;
        members.insert(member.id, member.clone());
        Ok(())
    }

    async fn update(&self, member: &Member) -> Result<(), DomainError> {
        let mut members = self.members.write().await;
        if !members.contains_key(&member.id) {
            return Err(DomainError::new(
                ErrorCode::MemberNotFound,
                member.id.to_string(),
            ));
        }
        check_lookup_keys(&members, member)?;
        members.insert(member.id, member.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        Ok(self.members.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, DomainError> {
        let email = email.trim();
        Ok(self
            .find_one(|m| m.email.eq_ignore_ascii_case(email))
            .await)
    }

    async fn find_by_qr_code(&self, qr_code: &str) -> Result<Option<Member>, DomainError> {
        Ok(self
            .find_one(|m| m.qr_code.as_deref() == Some(qr_code))
            .await)
    }

    async fn find_by_member_code(&self, member_code: &str) -> Result<Option<Member>, DomainError> {
        Ok(self
            .find_one(|m| {
                m.member_code
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(member_code))
            })
            .await)
    }

    async fn find_by_short_id(&self, short_id: u32) -> Result<Option<Member>, DomainError> {
        Ok(self.find_one(|m| m.short_id == Some(short_id)).await)
    }

    async fn find_by_phone_suffix(&self, digits: &str) -> Result<Vec<Member>, DomainError> {
        Ok(self
            .members
            .read()
            .await
            .values()
            .filter(|m| m.phone_ends_with(digits))
            .cloned()
            .collect())
    }

    async fn find_by_billing_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Member>, DomainError> {
        Ok(self
            .find_one(|m| m.billing_subscription_id.as_deref() == Some(subscription_id))
            .await)
    }

    async fn find_by_family(
        &self,
        family_account_id: &FamilyAccountId,
    ) -> Result<Vec<Member>, DomainError> {
        let mut members: Vec<Member> = self
            .members
            .read()
            .await
            .values()
            .filter(|m| m.family_account_id.as_ref() == Some(family_account_id))
            .cloned()
            .collect();
        members.sort_by_key(|m| m.created_at);
        Ok(members)
    }
}
