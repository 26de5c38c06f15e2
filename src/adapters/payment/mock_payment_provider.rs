//! Mock payment processor.
//!
//! Scriptable implementation of `PaymentProvider` for tests and local runs.
//! Supports:
//! - Pre-configured customers, subscriptions, and coupons
//! - Error injection, globally or per method
//! - Call tracking
//!
//! Processor timestamps come from a settable clock rather than the system
//! clock, so results are reproducible.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    Coupon, CreateCustomerRequest, CreateSubscriptionRequest, Customer, OneTimePaymentRequest,
    Payment, PaymentError, PaymentIntentStatus, PaymentProvider, Subscription,
    SubscriptionStatus,
};

const SECS_PER_DAY: i64 = 86_400;
const BILLING_PERIOD_DAYS: i64 = 30;

/// Mock payment processor.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Inject errors
/// mock.set_method_error("cancel_subscription", PaymentError::network("timeout"));
///
/// // Use in tests
/// let result = mock.cancel_subscription("sub_1", true).await;
/// assert_eq!(mock.call_count("cancel_subscription"), 1);
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    customers: HashMap<String, Customer>,

    subscriptions: HashMap<String, Subscription>,

    /// Coupons keyed by upper-cased promo code.
    coupons: HashMap<String, Coupon>,

    payments: Vec<Payment>,

    /// Status the next one-time payment reports.
    next_payment_status: Option<PaymentIntentStatus>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    call_log: Vec<MethodCall>,

    /// Processor clock (Unix seconds).
    clock: i64,

    /// Sequence for generated ids.
    sequence: u64,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.sequence += 1;
        format!("{}_mock_{}", prefix, self.sequence)
    }
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
    pub idempotency_key: Option<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Sets the processor clock used for period and trial timestamps.
    pub fn set_clock(&self, now: Timestamp) {
        self.state().clock = now.as_unix_secs();
    }

    /// Add a customer to the "database".
    pub fn add_customer(&self, customer: Customer) {
        let id = customer.id.clone();
        self.state().customers.insert(id, customer);
    }

    /// Add a subscription to the "database".
    pub fn add_subscription(&self, subscription: Subscription) {
        let id = subscription.id.clone();
        self.state().subscriptions.insert(id, subscription);
    }

    /// Add a coupon redeemable by its promo code.
    pub fn add_coupon(&self, coupon: Coupon) {
        let code = coupon.code.to_uppercase();
        self.state().coupons.insert(code, coupon);
    }

    /// Status reported by the next one-time payment.
    pub fn set_next_payment_status(&self, status: PaymentIntentStatus) {
        self.state().next_payment_status = Some(status);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method, returned until cleared.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    pub fn subscription(&self, subscription_id: &str) -> Option<Subscription> {
        self.state().subscriptions.get(subscription_id).cloned()
    }

    pub fn customer_count(&self) -> usize {
        self.state().customers.len()
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.state().payments.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state().call_log.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>, idempotency_key: Option<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
            idempotency_key,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        // Method-specific errors persist
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        self.record_call(
            "create_customer",
            vec![request.member_id.to_string(), request.email.clone()],
            request.idempotency_key.clone(),
        );
        self.check_error("create_customer")?;

        let mut state = self.state();
        let customer = Customer {
            id: state.next_id("cus"),
            email: request.email,
            name: request.name,
            created_at: state.clock,
        };
        state.customers.insert(customer.id.clone(), customer.clone());

        Ok(customer)
    }

    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, PaymentError> {
        self.record_call(
            "create_subscription",
            vec![
                request.customer_id.clone(),
                request.price_id.clone(),
                request.trial_days.to_string(),
            ],
            request.idempotency_key.clone(),
        );
        self.check_error("create_subscription")?;

        let mut state = self.state();
        if !state.customers.contains_key(&request.customer_id) {
            return Err(PaymentError::not_found("Customer"));
        }

        let now = state.clock;
        let trial_end = (request.trial_days > 0)
            .then(|| now + i64::from(request.trial_days) * SECS_PER_DAY);
        let subscription = Subscription {
            id: state.next_id("sub"),
            customer_id: request.customer_id,
            status: if trial_end.is_some() {
                SubscriptionStatus::Trialing
            } else {
                SubscriptionStatus::Incomplete
            },
            current_period_start: now,
            current_period_end: trial_end.unwrap_or(now + BILLING_PERIOD_DAYS * SECS_PER_DAY),
            cancel_at_period_end: false,
            canceled_at: None,
            trial_end,
        };
        state
            .subscriptions
            .insert(subscription.id.clone(), subscription.clone());

        Ok(subscription)
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, PaymentError> {
        self.record_call("get_subscription", vec![subscription_id.to_string()], None);
        self.check_error("get_subscription")?;

        Ok(self.state().subscriptions.get(subscription_id).cloned())
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<Subscription, PaymentError> {
        self.record_call(
            "cancel_subscription",
            vec![subscription_id.to_string(), at_period_end.to_string()],
            None,
        );
        self.check_error("cancel_subscription")?;

        let mut state = self.state();
        let now = state.clock;
        let subscription = state
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| PaymentError::not_found("Subscription"))?;

        subscription.cancel_at_period_end = at_period_end;
        subscription.canceled_at = Some(now);
        if !at_period_end {
            subscription.status = SubscriptionStatus::Canceled;
        }

        Ok(subscription.clone())
    }

    async fn create_one_time_payment(
        &self,
        request: OneTimePaymentRequest,
    ) -> Result<Payment, PaymentError> {
        self.record_call(
            "create_one_time_payment",
            vec![request.email.clone(), request.amount_cents.to_string()],
            request.idempotency_key.clone(),
        );
        self.check_error("create_one_time_payment")?;

        let mut state = self.state();
        let status = state
            .next_payment_status
            .take()
            .unwrap_or(PaymentIntentStatus::Succeeded);
        let payment = Payment {
            id: state.next_id("pi"),
            amount_cents: request.amount_cents,
            currency: request.currency,
            status,
        };
        state.payments.push(payment.clone());

        Ok(payment)
    }

    async fn find_coupon(&self, promo_code: &str) -> Result<Option<Coupon>, PaymentError> {
        self.record_call("find_coupon", vec![promo_code.to_string()], None);
        self.check_error("find_coupon")?;

        Ok(self.state().coupons.get(&promo_code.to_uppercase()).cloned())
    }
}
