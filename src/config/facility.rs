//! Facility configuration

use chrono_tz::Tz;
use serde::Deserialize;

use super::error::ValidationError;

/// The gym location the engine serves.
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityConfig {
    /// Display name
    #[serde(default = "default_name")]
    pub name: String,

    /// IANA time zone that defines the local check-in day
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl FacilityConfig {
    /// Parse the configured time zone
    pub fn time_zone(&self) -> Result<Tz, ValidationError> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| ValidationError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.time_zone().map(|_| ())
    }
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            timezone: default_timezone(),
        }
    }
}

fn default_name() -> String {
    "gym".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_utc() {
        assert_eq!(FacilityConfig::default().time_zone().unwrap(), Tz::UTC);
    }

    #[test]
    fn parses_iana_name() {
        let config = FacilityConfig {
            timezone: "America/Denver".to_string(),
            ..Default::default()
        };
        assert_eq!(config.time_zone().unwrap(), chrono_tz::America::Denver);
    }

    #[test]
    fn rejects_unknown_zone() {
        let config = FacilityConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTimezone(_))
        ));
    }
}
