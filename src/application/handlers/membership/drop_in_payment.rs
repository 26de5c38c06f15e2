//! DropInPaymentHandler - Command handler for one-off paid visits.

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::errors::EngineError;
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::member::Member;
use crate::ports::{
    MemberRepository, OneTimePaymentRequest, Payment, PaymentIntentStatus,
    PaymentProvider,
};

/// Contact details for a first-time visitor.
#[derive(Debug, Clone)]
pub struct Visitor {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Who is paying for the visit.
#[derive(Debug, Clone)]
pub enum DropInPayer {
    /// An existing member record.
    Member(MemberId),
    /// Someone identified only by contact details; matched by email.
    Visitor(Visitor),
}

#[derive(Debug, Clone)]
pub struct DropInPaymentCommand {
    pub payer: DropInPayer,
    pub now: Timestamp,
}

#[derive(Debug, Clone)]
pub struct DropInPaymentResult {
    pub member: Member,
    pub payment: Payment,
    /// True if a visitor record was created by this payment.
    pub created_member: bool,
}

/// Handler for drop-in payments.
///
/// A drop-in never touches subscription state. First-time visitors get a
/// minimal `pending` record, written only once the charge has gone through.
pub struct DropInPaymentHandler {
    members: Arc<dyn MemberRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    price: Decimal,
    currency: String,
}

impl DropInPaymentHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        price: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            members,
            payment_provider,
            price,
            currency: currency.into().to_lowercase(),
        }
    }

    pub async fn handle(
        &self,
        cmd: DropInPaymentCommand,
    ) -> Result<DropInPaymentResult, EngineError> {
        let amount_cents = to_cents(self.price)?;

        // Visitor charges are keyed by email, never by the record id.
        let (member, is_new, key_subject) = match cmd.payer {
            DropInPayer::Member(id) => {
                let member = self
                    .members
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| EngineError::member_not_found(id.to_string()))?;
                let subject = member.id.to_string();
                (member, false, subject)
            }
            DropInPayer::Visitor(visitor) => {
                let visitor = validate_visitor(visitor)?;
                let subject = format!("visitor:{}", visitor.email);
                match self.members.find_by_email(&visitor.email).await? {
                    Some(existing) => (existing, false, subject),
                    None => (
                        Member::drop_in_visitor(visitor.name, visitor.email, visitor.phone, cmd.now),
                        true,
                        subject,
                    ),
                }
            }
        };

        let payment = self
            .payment_provider
            .create_one_time_payment(OneTimePaymentRequest {
                customer_id: member.billing_customer_id.clone(),
                email: member.email.clone(),
                amount_cents,
                currency: self.currency.clone(),
                description: format!("Drop-in visit: {}", member.name),
                idempotency_key: Some(format!(
                    "drop_in:{}:{}",
                    key_subject,
                    cmd.now.as_unix_secs()
                )),
            })
            .await
            .map_err(|e| {
                tracing::error!(member_id = %member.id, "Drop-in charge failed: {}", e);
                EngineError::from(e)
            })?;

        if matches!(
            payment.status,
            PaymentIntentStatus::Failed | PaymentIntentStatus::RequiresAction
        ) {
            tracing::warn!(
                member_id = %member.id,
                payment_id = %payment.id,
                "Drop-in charge not completed"
            );
            return Err(EngineError::upstream(
                "payment_not_completed",
                format!("Drop-in charge {} did not complete", payment.id),
                false,
            ));
        }

        if is_new {
            self.members.save(&member).await?;
        }
        tracing::info!(
            member_id = %member.id,
            payment_id = %payment.id,
            amount_cents,
            new_visitor = is_new,
            "drop-in paid"
        );

        Ok(DropInPaymentResult {
            member,
            payment,
            created_member: is_new,
        })
    }
}

fn to_cents(price: Decimal) -> Result<i64, EngineError> {
    (price * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .filter(|cents| *cents > 0)
        .ok_or_else(|| EngineError::validation("drop_in_price", "Drop-in price must be positive"))
}

fn validate_visitor(visitor: Visitor) -> Result<Visitor, EngineError> {
    let name = visitor.name.trim();
    if name.is_empty() {
        return Err(EngineError::validation("name", "Visitor name is required"));
    }
    let email = visitor.email.trim();
    if !email.contains('@') {
        return Err(EngineError::validation("email", "Visitor email is invalid"));
    }
    Ok(Visitor {
        name: name.to_string(),
        email: email.to_lowercase(),
        phone: visitor.phone.filter(|p| !p.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMemberRepository;
    use crate::adapters::payment::MockPaymentProvider;
    use crate::domain::errors::ErrorKind;
    use crate::domain::member::{MemberStatus, PaymentStatus, DROP_IN_PROGRAM};
    use crate::ports::PaymentError;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 6, 1, 18, 30, 0).unwrap())
    }

    fn setup() -> (DropInPaymentHandler, Arc<InMemoryMemberRepository>, MockPaymentProvider) {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let mock = MockPaymentProvider::new();
        let handler = DropInPaymentHandler::new(
            repo.clone(),
            Arc::new(mock.clone()),
            Decimal::new(2500, 2),
            "USD",
        );
        (handler, repo, mock)
    }

    fn visitor(email: &str) -> DropInPayer {
        DropInPayer::Visitor(Visitor {
            name: " Rae ".to_string(),
            email: email.to_string(),
            phone: Some("555-010-2233".to_string()),
        })
    }

    #[tokio::test]
    async fn first_time_visitor_is_charged_then_created_pending() {
        let (handler, repo, mock) = setup();

        let result = handler
            .handle(DropInPaymentCommand {
                payer: visitor("Rae@Example.com"),
                now: now(),
            })
            .await
            .unwrap();

        assert!(result.created_member);
        assert_eq!(result.payment.amount_cents, 2500);
        assert_eq!(result.payment.currency, "usd");
        assert_eq!(result.member.status, MemberStatus::Pending);
        assert_eq!(result.member.program, DROP_IN_PROGRAM);
        assert_eq!(result.member.name, "Rae");
        assert_eq!(repo.count().await, 1);
        assert_eq!(mock.payments().len(), 1);
    }

    #[tokio::test]
    async fn returning_visitor_reuses_record() {
        let (handler, repo, _) = setup();
        let existing = Member::drop_in_visitor("Rae", "rae@example.com", None, now());
        repo.save(&existing).await.unwrap();

        let result = handler
            .handle(DropInPaymentCommand {
                payer: visitor("rae@example.com"),
                now: now(),
            })
            .await
            .unwrap();

        assert!(!result.created_member);
        assert_eq!(result.member.id, existing.id);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn existing_member_status_is_untouched() {
        let (handler, repo, mock) = setup();
        let mut member = Member::new(MemberId::new(), "Sam", "sam@example.com", "bjj", now());
        member.status = MemberStatus::Cancelled;
        member.billing_customer_id = Some("cus_sam".to_string());
        repo.save(&member).await.unwrap();

        let result = handler
            .handle(DropInPaymentCommand {
                payer: DropInPayer::Member(member.id),
                now: now(),
            })
            .await
            .unwrap();

        assert_eq!(result.member, member);
        let stored = repo.find_by_id(&member.id).await.unwrap().unwrap();
        assert_eq!(stored.status, MemberStatus::Cancelled);
        assert_eq!(stored.payment_status, PaymentStatus::None);
        assert_eq!(
            mock.calls()[0].idempotency_key,
            Some(format!("drop_in:{}:{}", member.id, now().as_unix_secs()))
        );
    }

    #[tokio::test]
    async fn declined_charge_creates_no_record() {
        let (handler, repo, mock) = setup();
        mock.set_error(PaymentError::card_declined("declined"));

        let err = handler
            .handle(DropInPaymentCommand {
                payer: visitor("new@example.com"),
                now: now(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn retried_visitor_charge_reuses_idempotency_key() {
        let (handler, repo, mock) = setup();
        mock.set_error(PaymentError::network("reply lost"));

        let cmd = DropInPaymentCommand {
            payer: visitor("Rae@Example.com"),
            now: now(),
        };
        assert!(handler.handle(cmd.clone()).await.is_err());
        handler.handle(cmd.clone()).await.unwrap();
        // Retry after the record exists still carries the same key
        handler.handle(cmd).await.unwrap();

        let keys: Vec<_> = mock
            .calls()
            .into_iter()
            .filter(|c| c.method == "create_one_time_payment")
            .map(|c| c.idempotency_key)
            .collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|k| k == &keys[0]));
        assert_eq!(
            keys[0],
            Some(format!("drop_in:visitor:rae@example.com:{}", now().as_unix_secs()))
        );
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn failed_intent_is_upstream_failure() {
        let (handler, repo, mock) = setup();
        mock.set_next_payment_status(PaymentIntentStatus::Failed);

        let err = handler
            .handle(DropInPaymentCommand {
                payer: visitor("new@example.com"),
                now: now(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn invalid_visitor_email_is_rejected_before_charge() {
        let (handler, _, mock) = setup();

        let err = handler
            .handle(DropInPaymentCommand {
                payer: visitor("not-an-email"),
                now: now(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert!(!mock.was_called("create_one_time_payment"));
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let (handler, _, _) = setup();
        let err = handler
            .handle(DropInPaymentCommand {
                payer: DropInPayer::Member(MemberId::new()),
                now: now(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn price_converts_to_cents() {
        assert_eq!(to_cents(Decimal::new(1999, 2)).unwrap(), 1999);
        assert_eq!(to_cents(Decimal::new(20, 0)).unwrap(), 2000);
        assert!(to_cents(Decimal::ZERO).is_err());
    }
}
