//! CancelMembershipHandler - Command handler for cancelling memberships.

use std::sync::Arc;

use crate::domain::errors::EngineError;
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::member::{Member, SubscriptionState};
use crate::ports::{MemberRepository, PaymentProvider, Subscription};

/// Command to cancel a membership.
#[derive(Debug, Clone)]
pub struct CancelMembershipCommand {
    pub member_id: MemberId,
    pub now: Timestamp,
}

/// What happened on the processor side.
#[derive(Debug, Clone)]
pub enum ProcessorCancellation {
    /// Subscription set to end with the current period.
    Scheduled(Subscription),
    /// The member had no processor subscription.
    NoSubscription,
    /// The processor call failed; the local cancellation still stands.
    Failed(EngineError),
}

/// Result of a cancellation.
#[derive(Debug, Clone)]
pub struct CancelMembershipResult {
    pub member: Member,
    pub previous_state: SubscriptionState,
    pub processor: ProcessorCancellation,
}

impl CancelMembershipResult {
    /// Processor-side lifecycle state after the call.
    pub fn processor_state(&self) -> SubscriptionState {
        match self.processor {
            ProcessorCancellation::Scheduled(_) => SubscriptionState::CancelPending,
            _ => SubscriptionState::Cancelled,
        }
    }
}

/// Handler for cancelling memberships.
///
/// Two independent steps. The member record is cancelled and saved first,
/// so access ends immediately. The processor subscription is then set to
/// cancel at period end; a failure there is logged and reported in the
/// result but never rolls the record back.
pub struct CancelMembershipHandler {
    members: Arc<dyn MemberRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CancelMembershipHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            members,
            payment_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelMembershipCommand,
    ) -> Result<CancelMembershipResult, EngineError> {
        // 1. Find the member
        let mut member = self
            .members
            .find_by_id(&cmd.member_id)
            .await?
            .ok_or_else(|| EngineError::member_not_found(cmd.member_id.to_string()))?;

        // 2. Cancel the record (domain logic)
        let previous_state = member.cancel(cmd.now)?;

        // 3. Persist before touching the processor
        self.members.update(&member).await?;
        tracing::info!(
            member_id = %member.id,
            from = previous_state.as_str(),
            "membership cancelled"
        );

        // 4. Cancel at the processor
        let processor = match member.billing_subscription_id.as_deref() {
            None => ProcessorCancellation::NoSubscription,
            Some(subscription_id) => match self
                .payment_provider
                .cancel_subscription(subscription_id, true)
                .await
            {
                Ok(subscription) => ProcessorCancellation::Scheduled(subscription),
                Err(e) => {
                    tracing::warn!(
                        member_id = %member.id,
                        subscription_id,
                        "Processor cancellation failed, local cancellation kept: {}",
                        e
                    );
                    ProcessorCancellation::Failed(e.into())
                }
            },
        };

        Ok(CancelMembershipResult {
            member,
            previous_state,
            processor,
        })
    }
}
