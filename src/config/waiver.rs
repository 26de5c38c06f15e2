//! Waiver configuration

use serde::Deserialize;

use crate::domain::waiver::{ValidityPeriod, WaiverPolicy, ADULT_AGE, LIABILITY_WAIVER};

use super::error::ValidationError;

/// Unit of the waiver validity window
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidityUnit {
    #[default]
    Years,
    Days,
}

/// Waiver validity configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WaiverConfig {
    #[serde(default)]
    pub validity_unit: ValidityUnit,

    /// Window length in `validity_unit`s
    #[serde(default = "default_validity_length")]
    pub validity_length: u32,

    /// Days before expiry that an info warning starts
    #[serde(default = "default_warning_days")]
    pub warning_threshold_days: i64,

    /// Days before expiry that the warning escalates
    #[serde(default = "default_urgent_days")]
    pub urgent_threshold_days: i64,

    #[serde(default = "default_adult_age")]
    pub adult_age: i32,

    /// Waiver type required at check-in
    #[serde(default = "default_required_type")]
    pub required_type: String,
}

impl WaiverConfig {
    pub fn policy(&self) -> WaiverPolicy {
        let validity = match self.validity_unit {
            ValidityUnit::Years => ValidityPeriod::Years(self.validity_length),
            ValidityUnit::Days => ValidityPeriod::Days(self.validity_length),
        };
        WaiverPolicy {
            validity,
            warning_threshold_days: self.warning_threshold_days,
            urgent_threshold_days: self.urgent_threshold_days,
            adult_age: self.adult_age,
            required_type: self.required_type.trim().to_lowercase(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.policy().validate()?;
        Ok(())
    }
}

impl Default for WaiverConfig {
    fn default() -> Self {
        Self {
            validity_unit: ValidityUnit::default(),
            validity_length: default_validity_length(),
            warning_threshold_days: default_warning_days(),
            urgent_threshold_days: default_urgent_days(),
            adult_age: default_adult_age(),
            required_type: default_required_type(),
        }
    }
}

fn default_validity_length() -> u32 {
    1
}

fn default_warning_days() -> i64 {
    30
}

fn default_urgent_days() -> i64 {
    7
}

fn default_adult_age() -> i32 {
    ADULT_AGE
}

fn default_required_type() -> String {
    LIABILITY_WAIVER.to_string()
}
