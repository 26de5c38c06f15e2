//! ApplyBillingEventHandler - Applies processor confirmations to member records.

use std::sync::Arc;

use crate::domain::errors::EngineError;
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::member::{BillingEvent, BillingEventOutcome};
use crate::ports::MemberRepository;

#[derive(Debug, Clone)]
pub struct ApplyBillingEventCommand {
    pub event: BillingEvent,
    pub now: Timestamp,
}

#[derive(Debug, Clone)]
pub struct ApplyBillingEventResult {
    /// Member the event's subscription belongs to, if any.
    pub member_id: Option<MemberId>,
    pub outcome: BillingEventOutcome,
}

/// Handler for out-of-band billing events.
///
/// Events for subscriptions no member holds are acknowledged and ignored so
/// the processor stops redelivering them.
pub struct ApplyBillingEventHandler {
    members: Arc<dyn MemberRepository>,
}

impl ApplyBillingEventHandler {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    pub async fn handle(
        &self,
        cmd: ApplyBillingEventCommand,
    ) -> Result<ApplyBillingEventResult, EngineError> {
        let subscription_id = cmd.event.subscription_id();
        let Some(mut member) = self
            .members
            .find_by_billing_subscription_id(subscription_id)
            .await?
        else {
            tracing::debug!(
                subscription_id,
                event = cmd.event.name(),
                "billing event for unknown subscription"
            );
            return Ok(ApplyBillingEventResult {
                member_id: None,
                outcome: BillingEventOutcome::Ignored {
                    reason: "no member holds this subscription",
                },
            });
        };

        let before = member.clone();
        let outcome = member.apply_billing_event(&cmd.event, cmd.now)?;
        if member != before {
            self.members.update(&member).await?;
        }

        match outcome {
            BillingEventOutcome::Applied { from, to } => tracing::info!(
                member_id = %member.id,
                event = cmd.event.name(),
                from = from.as_str(),
                to = to.as_str(),
                "billing event applied"
            ),
            BillingEventOutcome::Ignored { reason } => tracing::debug!(
                member_id = %member.id,
                event = cmd.event.name(),
                reason,
                "billing event ignored"
            ),
        }

        Ok(ApplyBillingEventResult {
            member_id: Some(member.id),
            outcome,
        })
    }
}
