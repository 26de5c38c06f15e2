//! Payment processor port.
//!
//! Defines the contract for the external billing processor: customers,
//! subscriptions, one-time charges, and coupon lookup. The engine never
//! talks to a processor directly; handlers go through this trait.
//!
//! # Design
//!
//! - **Processor agnostic**: prices and coupons are referenced by opaque ids
//! - **Idempotent**: every mutating request carries an idempotency key
//! - **Minor units**: amounts are integer cents

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::EngineError;
use crate::domain::foundation::MemberId;

/// Port for payment processor integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer in the processor.
    async fn create_customer(&self, request: CreateCustomerRequest)
        -> Result<Customer, PaymentError>;

    /// Create a subscription for an existing customer.
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, PaymentError>;

    /// Get subscription by processor ID.
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, PaymentError>;

    /// Cancel a subscription.
    ///
    /// If `at_period_end` is true, the subscription stays billable until the
    /// current period ends.
    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<Subscription, PaymentError>;

    /// Charge a one-time amount with no subscription.
    async fn create_one_time_payment(
        &self,
        request: OneTimePaymentRequest,
    ) -> Result<Payment, PaymentError>;

    /// Look up a coupon by its customer-facing promo code.
    ///
    /// Returns `None` if the processor has no such code.
    async fn find_coupon(&self, promo_code: &str) -> Result<Option<Coupon>, PaymentError>;
}

/// Builds the idempotency key for one processor operation on one member.
///
/// `scope` distinguishes repeated operations of the same kind, e.g. the
/// subscription being replaced.
pub fn idempotency_key(operation: &str, member_id: &MemberId, scope: &str) -> String {
    format!("{}:{}:{}", operation, member_id, scope)
}

/// Request to create a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Internal member ID (stored as metadata).
    pub member_id: MemberId,

    pub email: String,

    pub name: Option<String>,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Customer in the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Processor's customer ID.
    pub id: String,

    pub email: String,

    pub name: Option<String>,

    /// Processor creation time (Unix seconds).
    pub created_at: i64,
}

/// Request to create a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub customer_id: String,

    /// Processor price for the member's program.
    pub price_id: String,

    /// Free days before the first charge.
    pub trial_days: u32,

    /// Coupon resolved from a promo code.
    pub coupon_id: Option<String>,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Subscription in the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Processor's subscription ID.
    pub id: String,

    pub customer_id: String,

    pub status: SubscriptionStatus,

    /// Current billing period start (Unix seconds).
    pub current_period_start: i64,

    /// Current billing period end (Unix seconds).
    pub current_period_end: i64,

    /// Whether the subscription cancels at period end.
    pub cancel_at_period_end: bool,

    /// When cancellation was requested (Unix seconds).
    pub canceled_at: Option<i64>,

    /// End of the trial, if one was granted (Unix seconds).
    pub trial_end: Option<i64>,
}

/// Subscription status reported by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,

    /// Payment is past due, retries pending.
    PastDue,

    /// Canceled (may still be billable until period end).
    Canceled,

    Ended,

    Trialing,

    /// Initial payment incomplete.
    Incomplete,

    /// Initial payment failed after retries.
    IncompleteExpired,

    Paused,

    Unknown,
}

impl SubscriptionStatus {
    /// Check if the processor still considers the subscription live.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing | SubscriptionStatus::PastDue
        )
    }
}

/// Request for a one-time charge such as a drop-in visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimePaymentRequest {
    /// Existing processor customer, if the payer has one.
    pub customer_id: Option<String>,

    /// Receipt email.
    pub email: String,

    /// Amount in minor units.
    pub amount_cents: i64,

    /// ISO 4217 currency code, lowercase.
    pub currency: String,

    pub description: String,

    pub idempotency_key: Option<String>,
}

/// Outcome of a one-time charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Processor's payment ID.
    pub id: String,

    pub amount_cents: i64,

    pub currency: String,

    pub status: PaymentIntentStatus,
}

/// Status of a one-time charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    Succeeded,
    Processing,
    RequiresAction,
    Failed,
}

/// Processor coupon behind a promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Processor's coupon ID.
    pub id: String,

    /// Customer-facing code.
    pub code: String,

    pub percent_off: Option<Decimal>,

    /// Fixed discount in minor units.
    pub amount_off_cents: Option<i64>,
}

/// Errors from payment processor operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Processor's own error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for EngineError {
    fn from(err: PaymentError) -> Self {
        EngineError::upstream(err.code.to_string(), err.message, err.retryable)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    CardDeclined,

    InsufficientFunds,

    CardExpired,

    InvalidCard,

    /// Resource not found.
    NotFound,

    RateLimitExceeded,

    /// Processor API error.
    ProviderError,

    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::CardExpired => "card_expired",
            PaymentErrorCode::InvalidCard => "invalid_card",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    // Trait object safety test
    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn live_statuses() {
        assert!(SubscriptionStatus::Active.is_live());
        assert!(SubscriptionStatus::Trialing.is_live());
        assert!(SubscriptionStatus::PastDue.is_live());

        assert!(!SubscriptionStatus::Canceled.is_live());
        assert!(!SubscriptionStatus::Ended.is_live());
        assert!(!SubscriptionStatus::Incomplete.is_live());
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());

        assert!(!PaymentErrorCode::CardDeclined.is_retryable());
        assert!(!PaymentErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::card_declined("Your card was declined");
        assert!(err.to_string().contains("card_declined"));
        assert!(err.to_string().contains("Your card was declined"));
    }

    #[test]
    fn payment_error_becomes_upstream_failure() {
        let err: EngineError = PaymentError::network("connection reset").into();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert!(err.is_retryable());
        assert!(err.message().contains("connection reset"));
    }

    #[test]
    fn idempotency_key_is_stable_per_scope() {
        let member = MemberId::new();
        assert_eq!(
            idempotency_key("resubscribe", &member, "sub_1"),
            idempotency_key("resubscribe", &member, "sub_1")
        );
        assert_ne!(
            idempotency_key("resubscribe", &member, "sub_1"),
            idempotency_key("resubscribe", &member, "sub_2")
        );
    }
}
