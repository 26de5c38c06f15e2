//! ResubscribeHandler - Command handler for starting a new subscription.

use std::sync::Arc;

use crate::domain::billing::ProgramCatalog;
use crate::domain::errors::{ConflictReason, EngineError};
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::member::{Member, SubscriptionState};
use crate::ports::{
    idempotency_key, CreateCustomerRequest, CreateSubscriptionRequest, MemberRepository,
    PaymentProvider, Subscription,
};

use super::{PromoCodeResolver, ResolvedPromo};

/// Command to (re)subscribe a member to their program.
#[derive(Debug, Clone)]
pub struct ResubscribeCommand {
    pub member_id: MemberId,
    pub promo_code: Option<String>,
    pub now: Timestamp,
}

#[derive(Debug, Clone)]
pub struct ResubscribeResult {
    pub member: Member,
    pub previous_state: SubscriptionState,
    pub subscription: Subscription,
    pub promo: Option<ResolvedPromo>,
    /// Whether a processor customer was created for this call.
    pub created_customer: bool,
}

/// Handler for resubscribing.
///
/// Every processor call must succeed before the member record changes; any
/// processor failure aborts with the record untouched. The member lands in
/// `trial` with payment pending, and moves to `active` when the processor
/// confirms the first charge.
pub struct ResubscribeHandler {
    members: Arc<dyn MemberRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    promo_codes: Arc<PromoCodeResolver>,
    programs: ProgramCatalog,
    trial_days: u32,
}

impl ResubscribeHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        promo_codes: Arc<PromoCodeResolver>,
        programs: ProgramCatalog,
        trial_days: u32,
    ) -> Self {
        Self {
            members,
            payment_provider,
            promo_codes,
            programs,
            trial_days,
        }
    }

    pub async fn handle(&self, cmd: ResubscribeCommand) -> Result<ResubscribeResult, EngineError> {
        // 1. Find the member and check the lifecycle allows it
        let mut member = self
            .members
            .find_by_id(&cmd.member_id)
            .await?
            .ok_or_else(|| EngineError::member_not_found(cmd.member_id.to_string()))?;

        let previous_state = member.subscription_state();
        if !previous_state.can_resubscribe() {
            return Err(EngineError::conflict(ConflictReason::AlreadySubscribed {
                member_id: member.id,
            }));
        }

        // 2. Price and promo
        let price_id = self.programs.price_for(&member.program)?.price_id.clone();
        let promo = match cmd.promo_code.as_deref() {
            Some(code) => self.promo_codes.resolve(code).await?,
            None => None,
        };

        // 3. Processor customer, created on first subscription
        let (customer_id, created_customer) = match member.billing_customer_id.clone() {
            Some(id) => (id, false),
            None => {
                let customer = self
                    .payment_provider
                    .create_customer(CreateCustomerRequest {
                        member_id: member.id,
                        email: member.email.clone(),
                        name: Some(member.name.clone()),
                        idempotency_key: Some(idempotency_key(
                            "create_customer",
                            &member.id,
                            "customer",
                        )),
                    })
                    .await
                    .map_err(|e| {
                        tracing::error!(member_id = %member.id, "Customer creation failed: {}", e);
                        EngineError::from(e)
                    })?;
                (customer.id, true)
            }
        };

        // 4. New subscription; keyed by the one it replaces so retries dedupe
        let replaces = member.billing_subscription_id.as_deref().unwrap_or("none");
        let subscription = self
            .payment_provider
            .create_subscription(CreateSubscriptionRequest {
                customer_id: customer_id.clone(),
                price_id,
                trial_days: self.trial_days,
                coupon_id: promo.as_ref().map(|p| p.coupon_id.clone()),
                idempotency_key: Some(idempotency_key("resubscribe", &member.id, replaces)),
            })
            .await
            .map_err(|e| {
                tracing::error!(member_id = %member.id, "Subscription creation failed: {}", e);
                EngineError::from(e)
            })?;

        // 5. Record it
        member.begin_subscription(customer_id, subscription.id.clone(), cmd.now)?;
        self.members.update(&member).await?;
        tracing::info!(
            member_id = %member.id,
            subscription_id = %subscription.id,
            from = previous_state.as_str(),
            "member resubscribed"
        );

        Ok(ResubscribeResult {
            member,
            previous_state,
            subscription,
            promo,
            created_customer,
        })
    }
}
