//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment processor credentials
///
/// Both values are optional so the engine can run against the in-process
/// mock; when one is set the other is required.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentConfig {
    /// Processor API key
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Webhook signing secret for billing events
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,
}

impl PaymentConfig {
    /// Check if processor credentials are present
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check if the key is a processor test-mode key
    pub fn is_test_mode(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| key.expose_secret().starts_with("sk_test_"))
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let blank = |s: &Option<SecretString>| {
            s.as_ref()
                .map_or(true, |v| v.expose_secret().trim().is_empty())
        };
        match (blank(&self.api_key), blank(&self.webhook_secret)) {
            (true, true) => Ok(()),
            (false, false) => Ok(()),
            _ => Err(ValidationError::IncompletePaymentConfig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> Option<SecretString> {
        Some(SecretString::new(s.to_string()))
    }

    #[test]
    fn unconfigured_is_valid() {
        let config = PaymentConfig::default();
        assert!(!config.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn key_without_webhook_secret_is_invalid() {
        let config = PaymentConfig {
            api_key: secret("sk_test_xxx"),
            webhook_secret: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::IncompletePaymentConfig)
        ));
    }

    #[test]
    fn full_config_is_valid() {
        let config = PaymentConfig {
            api_key: secret("sk_test_abcd1234"),
            webhook_secret: secret("whsec_xyz789"),
        };
        assert!(config.validate().is_ok());
        assert!(config.is_test_mode());
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = PaymentConfig {
            api_key: secret("sk_live_supersecret"),
            webhook_secret: secret("whsec_supersecret"),
        };
        assert!(!format!("{:?}", config).contains("supersecret"));
    }
}
