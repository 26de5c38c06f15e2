//! GetWaiverStatusHandler - Query handler for a member's waiver validity.

use std::sync::Arc;

use crate::domain::errors::EngineError;
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::waiver::{Waiver, WaiverPolicy, WaiverStatus};
use crate::ports::{MemberRepository, WaiverRepository};

/// Query for a member's waiver status at an instant.
#[derive(Debug, Clone)]
pub struct GetWaiverStatusQuery {
    pub member_id: MemberId,
    pub now: Timestamp,
}

#[derive(Debug, Clone)]
pub struct GetWaiverStatusResult {
    pub member_id: MemberId,
    pub waiver: Option<Waiver>,
    pub status: WaiverStatus,
    /// Whether the member is currently a minor; minors need a parent or
    /// guardian signature.
    pub is_minor: bool,
}

pub struct GetWaiverStatusHandler {
    members: Arc<dyn MemberRepository>,
    waivers: Arc<dyn WaiverRepository>,
    policy: WaiverPolicy,
}

impl GetWaiverStatusHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        waivers: Arc<dyn WaiverRepository>,
        policy: WaiverPolicy,
    ) -> Self {
        Self {
            members,
            waivers,
            policy,
        }
    }

    pub async fn handle(
        &self,
        query: GetWaiverStatusQuery,
    ) -> Result<GetWaiverStatusResult, EngineError> {
        let member = self
            .members
            .find_by_id(&query.member_id)
            .await?
            .ok_or_else(|| EngineError::member_not_found(query.member_id.to_string()))?;

        let waiver = self
            .waivers
            .find_latest_by_type(&member.id, &self.policy.required_type)
            .await?;

        let status = self.policy.assess(waiver.as_ref(), member.birth_date, query.now);
        let is_minor = self
            .policy
            .is_minor(member.birth_date, query.now.utc_date());

        Ok(GetWaiverStatusResult {
            member_id: member.id,
            waiver,
            status,
            is_minor,
        })
    }
}
