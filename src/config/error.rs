//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Unknown IANA time zone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Drop-in price must be positive whole cents")]
    InvalidDropInPrice,

    #[error("Program '{0}' has an invalid price")]
    InvalidProgramPrice(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Payment API key and webhook secret must be configured together")]
    IncompletePaymentConfig,

    #[error(transparent)]
    Policy(#[from] crate::domain::foundation::ValidationError),
}
