//! SignWaiverHandler - Command handler for recording a signed waiver.

use std::sync::Arc;

use crate::domain::errors::EngineError;
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::waiver::{CaptureMetadata, SignerRelationship, Waiver, WaiverPolicy, WaiverStatus};
use crate::ports::{MemberRepository, WaiverRepository};

/// Command to record a waiver signature.
#[derive(Debug, Clone)]
pub struct SignWaiverCommand {
    pub member_id: MemberId,
    /// Defaults to the policy's required type.
    pub waiver_type: Option<String>,
    pub signer_name: String,
    pub signer_relationship: SignerRelationship,
    pub signature_data: String,
    pub capture: CaptureMetadata,
    pub now: Timestamp,
}

#[derive(Debug, Clone)]
pub struct SignWaiverResult {
    pub waiver: Waiver,
    pub status: WaiverStatus,
}

/// Handler for signing waivers.
///
/// Each signature is a new waiver; earlier ones stay on file.
pub struct SignWaiverHandler {
    members: Arc<dyn MemberRepository>,
    waivers: Arc<dyn WaiverRepository>,
    policy: WaiverPolicy,
}

impl SignWaiverHandler {
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

    pub async fn handle(&self, cmd: SignWaiverCommand) -> Result<SignWaiverResult, EngineError> {
        if cmd.signer_name.trim().is_empty() {
            return Err(EngineError::validation("signer_name", "signer name is required"));
        }
        if cmd.signature_data.trim().is_empty() {
            return Err(EngineError::validation("signature_data", "signature is required"));
        }

        let member = self
            .members
            .find_by_id(&cmd.member_id)
            .await?
            .ok_or_else(|| EngineError::member_not_found(cmd.member_id.to_string()))?;

        if cmd.signer_relationship == SignerRelationship::SelfSigned
            && self.policy.is_minor(member.birth_date, cmd.now.utc_date())
        {
            return Err(EngineError::validation(
                "signer_relationship",
                "a parent or guardian must sign for a minor",
            ));
        }

        let waiver_type = cmd
            .waiver_type
            .unwrap_or_else(|| self.policy.required_type.clone());
        let waiver = Waiver::new(
            member.id,
            waiver_type,
            cmd.signer_name.trim(),
            cmd.signer_relationship,
            cmd.signature_data,
            cmd.now,
        )
        .with_capture(cmd.capture);

        self.waivers.save(&waiver).await?;
        tracing::info!(
            member_id = %member.id,
            waiver_id = %waiver.id,
            relationship = ?waiver.signer_relationship,
            "waiver signed"
        );

        let status = self.policy.assess(Some(&waiver), member.birth_date, cmd.now);
        Ok(SignWaiverResult { waiver, status })
    }
}
