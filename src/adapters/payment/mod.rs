//! Payment processor adapters.

mod mock_payment_provider;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
