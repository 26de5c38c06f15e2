//! Member aggregate.
//!
//! A member row is the access-control source of truth: the eligibility gate
//! reads `status` and `payment_status` from here, and lifecycle operations
//! write them back. Members are never hard-deleted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{ConflictReason, EngineError};
use crate::domain::foundation::{FamilyAccountId, MemberId, StateMachine, Timestamp};

use super::{BillingEvent, BillingEventOutcome, MemberStatus, PaymentStatus, SubscriptionState};

/// Program assigned to visitors created by a drop-in payment.
pub const DROP_IN_PROGRAM: &str = "drop-in";

/// Gym member snapshot.
///
/// # Invariants
///
/// - `qr_code`, `member_code`, and `short_id` are unique across members when present
/// - At most one member per `family_account_id` has `is_primary_account_holder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: MemberStatus,
    pub payment_status: PaymentStatus,
    pub birth_date: Option<NaiveDate>,
    pub program: String,
    pub membership_type: String,
    pub family_account_id: Option<FamilyAccountId>,
    pub is_primary_account_holder: bool,
    pub individual_monthly_cost: Option<Decimal>,
    pub billing_customer_id: Option<String>,
    pub billing_subscription_id: Option<String>,
    pub qr_code: Option<String>,
    pub member_code: Option<String>,
    pub short_id: Option<u32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub cancelled_at: Option<Timestamp>,
}

impl Member {
    /// Creates a member record with no subscription yet.
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        email: impl Into<String>,
        program: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: None,
            status: MemberStatus::Pending,
            payment_status: PaymentStatus::None,
            birth_date: None,
            program: program.into(),
            membership_type: "individual".to_string(),
            family_account_id: None,
            is_primary_account_holder: false,
            individual_monthly_cost: None,
            billing_customer_id: None,
            billing_subscription_id: None,
            qr_code: None,
            member_code: None,
            short_id: None,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        }
    }

    /// Creates the minimal record for a first-time drop-in visitor.
    pub fn drop_in_visitor(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        now: Timestamp,
    ) -> Self {
        let mut member = Self::new(MemberId::new(), name, email, DROP_IN_PROGRAM, now);
        member.phone = phone;
        member.membership_type = "drop_in".to_string();
        member
    }

    /// Current position in the subscription lifecycle.
    pub fn subscription_state(&self) -> SubscriptionState {
        SubscriptionState::of(self.status, self.payment_status)
    }

    /// Returns true if the stored phone number ends with the given digits.
    ///
    /// Formatting characters on the stored number are ignored.
    pub fn phone_ends_with(&self, digits: &str) -> bool {
        match &self.phone {
            Some(phone) if !digits.is_empty() => {
                let stored: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
                stored.ends_with(digits)
            }
            _ => false,
        }
    }

    /// Cancels the membership on the record side.
    ///
    /// The record moves to `cancelled` immediately, whatever the processor
    /// later reports. Returns the state the member was in before.
    pub fn cancel(&mut self, now: Timestamp) -> Result<SubscriptionState, EngineError> {
        let from = self.subscription_state();
        if !from.has_live_subscription() {
            return Err(EngineError::conflict(ConflictReason::AlreadyCancelled {
                member_id: self.id,
            }));
        }
        self.apply_state(from, SubscriptionState::Cancelled)?;
        self.cancelled_at = Some(now);
        self.updated_at = now;
        Ok(from)
    }

    /// Records a newly created processor subscription.
    ///
    /// The member enters `trial` with payment pending; the first confirmed
    /// charge moves them to `active`.
    pub fn begin_subscription(
        &mut self,
        billing_customer_id: impl Into<String>,
        billing_subscription_id: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let from = self.subscription_state();
        if !from.can_resubscribe() {
            return Err(EngineError::conflict(ConflictReason::AlreadySubscribed {
                member_id: self.id,
            }));
        }
        self.apply_state(from, SubscriptionState::Trial)?;
        self.billing_customer_id = Some(billing_customer_id.into());
        self.billing_subscription_id = Some(billing_subscription_id.into());
        self.cancelled_at = None;
        self.updated_at = now;
        Ok(())
    }

    /// Applies a processor notification to the record.
    ///
    /// Events for a subscription other than the member's current one are
    /// ignored, as are charges on a record the member already cancelled.
    pub fn apply_billing_event(
        &mut self,
        event: &BillingEvent,
        now: Timestamp,
    ) -> Result<BillingEventOutcome, EngineError> {
        if self.billing_subscription_id.as_deref() != Some(event.subscription_id()) {
            return Ok(BillingEventOutcome::Ignored {
                reason: "event is for a different subscription",
            });
        }

        let from = self.subscription_state();
        let to = match (event, from) {
            (BillingEvent::PaymentSucceeded { .. }, SubscriptionState::Cancelled) => {
                return Ok(BillingEventOutcome::Ignored {
                    reason: "member already cancelled",
                });
            }
            (BillingEvent::PaymentSucceeded { .. }, _) => SubscriptionState::Active,
            (BillingEvent::PaymentFailed { .. }, s) if s.has_live_subscription() => {
                SubscriptionState::PastDue
            }
            (BillingEvent::PaymentFailed { .. }, _) => {
                return Ok(BillingEventOutcome::Ignored {
                    reason: "no live subscription",
                });
            }
            (BillingEvent::SubscriptionEnded { .. }, s) if s.has_live_subscription() => {
                SubscriptionState::Cancelled
            }
            (BillingEvent::SubscriptionEnded { .. }, _) => {
                return Ok(BillingEventOutcome::Ignored {
                    reason: "no live subscription",
                });
            }
        };

        self.apply_state(from, to)?;
        if to == SubscriptionState::Cancelled {
            self.payment_status = PaymentStatus::None;
            self.cancelled_at = Some(now);
        }
        self.updated_at = now;
        Ok(BillingEventOutcome::Applied { from, to })
    }

    /// Attaches this member to a household.
    pub fn link_to_family(
        &mut self,
        family_account_id: FamilyAccountId,
        is_primary: bool,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        match self.family_account_id {
            Some(existing) if existing != family_account_id => {
                Err(EngineError::conflict(ConflictReason::FamilyLinkExists {
                    member_id: self.id,
                    family_account_id: existing,
                }))
            }
            _ => {
                self.family_account_id = Some(family_account_id);
                self.is_primary_account_holder = is_primary;
                self.membership_type = "family".to_string();
                self.updated_at = now;
                Ok(())
            }
        }
    }

    fn apply_state(
        &mut self,
        from: SubscriptionState,
        to: SubscriptionState,
    ) -> Result<(), EngineError> {
        from.transition_to(to).map_err(|_| {
            EngineError::conflict(ConflictReason::InvalidTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        })?;

        match to {
            SubscriptionState::Inactive => {
                self.status = MemberStatus::Inactive;
                self.payment_status = PaymentStatus::None;
            }
            SubscriptionState::Trial => {
                self.status = MemberStatus::Trial;
                self.payment_status = PaymentStatus::Pending;
            }
            SubscriptionState::Active => {
                self.status = MemberStatus::Active;
                self.payment_status = PaymentStatus::Active;
            }
            SubscriptionState::PastDue => {
                self.status = MemberStatus::Active;
                self.payment_status = PaymentStatus::PastDue;
            }
            // Processor-side only; the record goes straight to cancelled.
            SubscriptionState::CancelPending | SubscriptionState::Cancelled => {
                self.status = MemberStatus::Cancelled;
            }
        }
        Ok(())
    }
}
