//! Waiver policy configuration.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

use super::age::ADULT_AGE;
use super::LIABILITY_WAIVER;

/// Length of the waiver validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "length", rename_all = "snake_case")]
pub enum ValidityPeriod {
    /// Same calendar day and time, N years later.
    Years(u32),
    /// A fixed number of 24-hour days.
    Days(u32),
}

impl ValidityPeriod {
    /// End of the window that starts at `start`.
    pub fn end_from(&self, start: Timestamp) -> Timestamp {
        match *self {
            ValidityPeriod::Years(years) => start.add_calendar_years(years),
            ValidityPeriod::Days(days) => start.add_days(i64::from(days)),
        }
    }
}

impl Default for ValidityPeriod {
    fn default() -> Self {
        ValidityPeriod::Years(1)
    }
}

/// Rules used by the waiver validity calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaiverPolicy {
    pub validity: ValidityPeriod,
    /// Days before expiry at which an informational warning starts.
    pub warning_threshold_days: i64,
    /// Days before expiry at which the warning escalates.
    pub urgent_threshold_days: i64,
    pub adult_age: i32,
    /// Waiver type that must be valid for check-in.
    pub required_type: String,
}

impl WaiverPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let length = match self.validity {
            ValidityPeriod::Years(n) | ValidityPeriod::Days(n) => n,
        };
        if length == 0 {
            return Err(ValidationError::out_of_range(
                "waiver.validity",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        if self.warning_threshold_days < 0 {
            return Err(ValidationError::out_of_range(
                "waiver.warning_threshold_days",
                0,
                i64::MAX,
                self.warning_threshold_days,
            ));
        }
        if self.urgent_threshold_days < 0
            || self.urgent_threshold_days > self.warning_threshold_days
        {
            return Err(ValidationError::out_of_range(
                "waiver.urgent_threshold_days",
                0,
                self.warning_threshold_days,
                self.urgent_threshold_days,
            ));
        }
        if self.adult_age <= 0 {
            return Err(ValidationError::out_of_range(
                "waiver.adult_age",
                1,
                i64::from(i32::MAX),
                i64::from(self.adult_age),
            ));
        }
        if self.required_type.trim().is_empty() {
            return Err(ValidationError::empty_field("waiver.required_type"));
        }
        Ok(())
    }
}

impl Default for WaiverPolicy {
    fn default() -> Self {
        Self {
            validity: ValidityPeriod::default(),
            warning_threshold_days: 30,
            urgent_threshold_days: 7,
            adult_age: ADULT_AGE,
            required_type: LIABILITY_WAIVER.to_string(),
        }
    }
}
