//! Application configuration module
//!
//! This module provides type-safe configuration loading from an optional TOML
//! file and environment variables using the `config` and `dotenvy` crates.
//! Environment variables use the `GYM_OPS` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use gym_ops::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Local day follows {}", config.facility.timezone);
//! ```

mod billing;
mod error;
mod facility;
mod logging;
mod payment;
mod waiver;

pub use billing::{BillingConfig, DiscountKind, ProgramConfig};
pub use error::{ConfigError, ValidationError};
pub use facility::FacilityConfig;
pub use logging::LoggingConfig;
pub use payment::PaymentConfig;
pub use waiver::{ValidityUnit, WaiverConfig};

use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::domain::billing::{FamilyPricing, ProgramCatalog};
use crate::domain::waiver::WaiverPolicy;

/// Environment variable naming an optional TOML config file
pub const CONFIG_FILE_ENV: &str = "GYM_OPS_CONFIG";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration running in UTC against no real processor.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Facility (time zone for the local check-in day)
    #[serde(default)]
    pub facility: FacilityConfig,

    /// Waiver validity rules
    #[serde(default)]
    pub waiver: WaiverConfig,

    /// Rates, discounts, programs and promo codes
    #[serde(default)]
    pub billing: BillingConfig,

    /// Payment processor credentials
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the environment
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads the TOML file named by `GYM_OPS_CONFIG`, if set
    /// 3. Reads environment variables with `GYM_OPS` prefix, overriding the file
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GYM_OPS__FACILITY__TIMEZONE=America/Denver` -> `facility.timezone`
    /// - `GYM_OPS__BILLING__TRIAL_DAYS=14` -> `billing.trial_days`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or values cannot be
    /// parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            builder = builder.add_source(config::File::new(&path, config::FileFormat::Toml));
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("GYM_OPS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from one TOML file, ignoring the environment
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_string_lossy();
        let config = config::Config::builder()
            .add_source(config::File::new(&path, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.facility.validate()?;
        self.waiver.validate()?;
        self.billing.validate()?;
        self.payment.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn time_zone(&self) -> Result<Tz, ValidationError> {
        self.facility.time_zone()
    }

    pub fn waiver_policy(&self) -> WaiverPolicy {
        self.waiver.policy()
    }

    pub fn family_pricing(&self) -> FamilyPricing {
        self.billing.family_pricing()
    }

    pub fn program_catalog(&self) -> ProgramCatalog {
        self.billing.program_catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::waiver::ValidityPeriod;
    use rust_decimal::Decimal;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 5] = [
        "GYM_OPS__FACILITY__TIMEZONE",
        "GYM_OPS__BILLING__TRIAL_DAYS",
        "GYM_OPS__BILLING__DROP_IN_PRICE",
        "GYM_OPS__LOGGING__JSON",
        CONFIG_FILE_ENV,
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            env::remove_var(key);
        }
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const SAMPLE: &str = r#"
[facility]
name = "Northside"
timezone = "America/Denver"

[waiver]
validity_unit = "days"
validity_length = 365
warning_threshold_days = 45

[billing]
adult_rate = "120.00"
kid_rate = "80.00"
trial_days = 14
rounding = "half_even"

[billing.programs.bjj]
monthly_rate = "150.00"
price_id = "price_bjj"

[billing.promo_codes]
SPRING = "co_spring"
"#;

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.facility.timezone, "UTC");
        assert_eq!(config.billing.trial_days, 7);
        assert_eq!(config.waiver_policy(), WaiverPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("GYM_OPS__FACILITY__TIMEZONE", "America/Denver");
        env::set_var("GYM_OPS__BILLING__TRIAL_DAYS", "14");
        env::set_var("GYM_OPS__BILLING__DROP_IN_PRICE", "30.00");
        env::set_var("GYM_OPS__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.time_zone().unwrap(), chrono_tz::America::Denver);
        assert_eq!(config.billing.trial_days, 14);
        assert_eq!(config.billing.drop_in_price, Decimal::new(30, 0));
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let file = toml_file(SAMPLE);
        let config = AppConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.facility.name, "Northside");
        assert_eq!(config.waiver_policy().validity, ValidityPeriod::Days(365));
        assert_eq!(config.waiver_policy().warning_threshold_days, 45);
        assert_eq!(config.billing.adult_rate, Decimal::new(120, 0));
        assert_eq!(
            config.program_catalog().get("BJJ").map(|p| p.price_id.as_str()),
            Some("price_bjj")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let file = toml_file(SAMPLE);
        env::set_var(CONFIG_FILE_ENV, file.path());
        env::set_var("GYM_OPS__BILLING__TRIAL_DAYS", "3");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.facility.timezone, "America/Denver");
        assert_eq!(config.billing.trial_days, 3);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = AppConfig::load_from_file("/nonexistent/gym-ops.toml").unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn test_invalid_timezone_fails_validation() {
        let file = toml_file("[facility]\ntimezone = \"Nowhere/Special\"\n");
        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTimezone(_))
        ));
    }
}
