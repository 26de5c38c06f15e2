//! LinkFamilyMemberHandler - Attaches a member to a household.

use std::sync::Arc;

use crate::domain::errors::EngineError;
use crate::domain::foundation::{FamilyAccountId, MemberId, Timestamp};
use crate::domain::member::Member;
use crate::ports::MemberRepository;

#[derive(Debug, Clone)]
pub struct LinkFamilyMemberCommand {
    pub member_id: MemberId,
    pub family_account_id: FamilyAccountId,
    /// Make this member the household's billing contact.
    pub is_primary: bool,
    pub now: Timestamp,
}

#[derive(Debug, Clone)]
pub struct LinkFamilyMemberResult {
    pub member: Member,
    /// Household size after the link.
    pub family_size: usize,
}

/// Handler for linking members into a family account.
///
/// A member already in a different household is a conflict. A household
/// keeps exactly one primary holder, so a second primary is rejected.
pub struct LinkFamilyMemberHandler {
    members: Arc<dyn MemberRepository>,
}

impl LinkFamilyMemberHandler {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    pub async fn handle(
        &self,
        cmd: LinkFamilyMemberCommand,
    ) -> Result<LinkFamilyMemberResult, EngineError> {
        let mut member = self
            .members
            .find_by_id(&cmd.member_id)
            .await?
            .ok_or_else(|| EngineError::member_not_found(cmd.member_id.to_string()))?;

        let household = self.members.find_by_family(&cmd.family_account_id).await?;
        if cmd.is_primary {
            if let Some(primary) = household
                .iter()
                .find(|m| m.is_primary_account_holder && m.id != member.id)
            {
                return Err(EngineError::validation(
                    "is_primary_account_holder",
                    format!(
                        "family {} already has primary account holder {}",
                        cmd.family_account_id, primary.id
                    ),
                ));
            }
        }

        member.link_to_family(cmd.family_account_id, cmd.is_primary, cmd.now)?;
        self.members.update(&member).await?;

        let family_size = household.iter().filter(|m| m.id != member.id).count() + 1;
        tracing::info!(
            member_id = %member.id,
            family_account_id = %cmd.family_account_id,
            primary = cmd.is_primary,
            family_size,
            "member linked to family"
        );

        Ok(LinkFamilyMemberResult {
            member,
            family_size,
        })
    }
}
