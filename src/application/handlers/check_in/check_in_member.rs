//! CheckInMemberHandler - Command handler for kiosk and staff check-ins.

use std::sync::Arc;

use crate::domain::check_in::{CheckIn, CheckInMethod, DenialReason, EligibilityGate, GateDecision};
use crate::domain::errors::EngineError;
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::member::Member;
use crate::domain::waiver::WaiverStatus;
use crate::ports::{CheckInRepository, InsertOutcome, WaiverRepository};

use super::MemberResolverChain;

/// Who is checking in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    Id(MemberId),
    /// Any key the resolver chain understands.
    Lookup(String),
}

/// Command to check a member in.
#[derive(Debug, Clone)]
pub struct CheckInMemberCommand {
    pub member: MemberRef,
    pub method: CheckInMethod,
    pub class_id: Option<String>,
    pub class_type: Option<String>,
    pub notes: Option<String>,
    pub now: Timestamp,
}

/// Whether a new row was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    Admitted(CheckIn),
    /// Idempotent success carrying the row already stored for today.
    AlreadyCheckedIn(CheckIn),
}

impl CheckInOutcome {
    pub fn check_in(&self) -> &CheckIn {
        match self {
            CheckInOutcome::Admitted(c) | CheckInOutcome::AlreadyCheckedIn(c) => c,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, CheckInOutcome::Admitted(_))
    }
}

/// Result of a successful check-in.
#[derive(Debug, Clone)]
pub struct CheckInMemberResult {
    pub member: Member,
    pub outcome: CheckInOutcome,
    /// Waiver assessment at admit time, for expiry advisories.
    pub waiver: Option<WaiverStatus>,
}

/// Handler for checking members in.
///
/// Denials come back as `EngineError::PolicyDenied` with the gate's reason.
pub struct CheckInMemberHandler {
    resolver: Arc<MemberResolverChain>,
    waivers: Arc<dyn WaiverRepository>,
    check_ins: Arc<dyn CheckInRepository>,
    gate: EligibilityGate,
}

impl CheckInMemberHandler {
    pub fn new(
        resolver: Arc<MemberResolverChain>,
        waivers: Arc<dyn WaiverRepository>,
        check_ins: Arc<dyn CheckInRepository>,
        gate: EligibilityGate,
    ) -> Self {
        Self {
            resolver,
            waivers,
            check_ins,
            gate,
        }
    }

    pub async fn handle(
        &self,
        cmd: CheckInMemberCommand,
    ) -> Result<CheckInMemberResult, EngineError> {
        // 1. Resolve the member
        let member = match &cmd.member {
            MemberRef::Id(id) => self.resolver.repository().find_by_id(id).await?,
            MemberRef::Lookup(key) => self.resolver.resolve(key).await?,
        };
        let Some(member) = member else {
            tracing::info!(method = cmd.method.as_str(), "check-in denied: member not found");
            return Err(EngineError::denied(DenialReason::NotFound));
        };

        // 2. Load the governing waiver and today's rows
        let waiver = self
            .waivers
            .find_latest_by_type(&member.id, &self.gate.policy().required_type)
            .await?;
        let local_day = self.gate.local_day(cmd.now);
        let todays = self.check_ins.find_for_day(&member.id, &local_day).await?;

        // 3. Decide
        let decision = self.gate.evaluate(
            Some(&member),
            waiver.as_ref(),
            &todays,
            cmd.class_type.as_deref(),
            cmd.now,
        );

        let waiver_status = match decision {
            GateDecision::Deny(reason) => {
                tracing::info!(
                    member_id = %member.id,
                    reason = %reason.code(),
                    "check-in denied"
                );
                return Err(EngineError::denied(reason));
            }
            GateDecision::AlreadyCheckedIn(existing) => {
                tracing::debug!(member_id = %member.id, check_in_id = %existing.id, "already checked in today");
                return Ok(CheckInMemberResult {
                    member,
                    outcome: CheckInOutcome::AlreadyCheckedIn(existing),
                    waiver: None,
                });
            }
            GateDecision::Admit { waiver, .. } => waiver,
        };

        // 4. Record; a concurrent admit may have won the insert
        let mut check_in = CheckIn::new(member.id, cmd.now, local_day.date, cmd.method)
            .with_class(cmd.class_id, cmd.class_type);
        if let Some(notes) = cmd.notes {
            check_in = check_in.with_notes(notes);
        }

        let outcome = match self.check_ins.insert(&check_in).await? {
            InsertOutcome::Inserted => {
                tracing::info!(
                    member_id = %member.id,
                    check_in_id = %check_in.id,
                    local_date = %local_day.date,
                    "member checked in"
                );
                CheckInOutcome::Admitted(check_in)
            }
            InsertOutcome::Duplicate(existing) => CheckInOutcome::AlreadyCheckedIn(existing),
        };

        Ok(CheckInMemberResult {
            member,
            outcome,
            waiver: Some(waiver_status),
        })
    }
}
