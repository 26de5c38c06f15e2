//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `MemberRepository` - Member records and alternate-key lookups
//! - `WaiverRepository` - Append-only signed waivers
//! - `CheckInRepository` - Attendance rows with a per-day uniqueness key
//!
//! ## Processor Ports
//!
//! - `PaymentProvider` - Customers, subscriptions, one-time charges, coupons

mod check_in_repository;
mod member_repository;
mod payment_provider;
mod waiver_repository;

pub use check_in_repository::{CheckInRepository, InsertOutcome};
pub use member_repository::MemberRepository;
pub use payment_provider::{
    idempotency_key, Coupon, CreateCustomerRequest, CreateSubscriptionRequest, Customer,
    OneTimePaymentRequest, Payment, PaymentError, PaymentErrorCode, PaymentIntentStatus,
    PaymentProvider, Subscription, SubscriptionStatus,
};
pub use waiver_repository::WaiverRepository;
