//! Waiver validity calculator.
//!
//! Pure functions over a waiver, the subject's birth date, and a
//! caller-supplied `now`. A waiver is usable for check-in only while its
//! window is open **and** the subject has not become an adult since a parent
//! or guardian signed for them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::age::age_in_years;
use super::{SignerRelationship, Waiver, WaiverPolicy};

const SECS_PER_DAY: i64 = 86_400;

/// Severity of a waiver advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Info,
    Warning,
    Critical,
}

/// Human-readable advisory for staff and kiosk screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaiverWarning {
    pub severity: Severity,
    pub message: Option<String>,
}

impl WaiverWarning {
    fn none() -> Self {
        Self {
            severity: Severity::None,
            message: None,
        }
    }

    fn new(severity: Severity, message: String) -> Self {
        Self {
            severity,
            message: Some(message),
        }
    }
}

/// Full validity assessment for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaiverStatus {
    pub has_waiver: bool,
    /// Window open and no minor-to-adult transition.
    pub is_valid: bool,
    /// Window open, ignoring the adult transition.
    pub window_valid: bool,
    pub turned_adult: bool,
    pub expires_at: Option<Timestamp>,
    pub days_remaining: Option<i64>,
    pub warning: WaiverWarning,
}

impl WaiverPolicy {
    /// End of the validity window for a waiver signed at `signed_at`.
    pub fn expiration(&self, signed_at: Timestamp) -> Timestamp {
        self.validity.end_from(signed_at)
    }

    /// Effective expiry of a waiver; an earlier explicit `expires_at` wins.
    pub fn waiver_expiration(&self, waiver: &Waiver) -> Timestamp {
        let computed = self.expiration(waiver.signed_at());
        match waiver.expires_at {
            Some(explicit) if explicit < computed => explicit,
            _ => computed,
        }
    }

    /// Window check: valid while `now` is strictly before the expiry instant.
    pub fn is_valid(&self, signed_at: Timestamp, now: Timestamp) -> bool {
        now < self.expiration(signed_at)
    }

    /// Whole days from `now` until `expires_at`.
    ///
    /// Zero on the last day of validity; at most -1 once expired.
    pub fn days_until(expires_at: Timestamp, now: Timestamp) -> i64 {
        let secs = expires_at.duration_since(&now).num_seconds();
        if secs > 0 {
            secs / SECS_PER_DAY
        } else {
            (secs / SECS_PER_DAY).min(-1)
        }
    }

    /// Whole days until the window for `signed_at` closes.
    pub fn days_until_expiration(&self, signed_at: Timestamp, now: Timestamp) -> i64 {
        Self::days_until(self.expiration(signed_at), now)
    }

    /// True iff a parent or guardian signed and the subject is now an adult.
    ///
    /// Unknown birth date means no transition can be detected.
    pub fn turned_adult(
        &self,
        birth_date: Option<NaiveDate>,
        relationship: SignerRelationship,
        now: Timestamp,
    ) -> bool {
        relationship.signed_for_minor()
            && birth_date.is_some_and(|birth| age_in_years(birth, now.utc_date()) >= self.adult_age)
    }

    /// Returns true if the subject is under the adult age on `on`.
    pub fn is_minor(&self, birth_date: Option<NaiveDate>, on: NaiveDate) -> bool {
        super::age::is_minor(birth_date, on, self.adult_age)
    }

    /// Tiered advisory for a member's governing waiver.
    pub fn warning(
        &self,
        waiver: Option<&Waiver>,
        birth_date: Option<NaiveDate>,
        now: Timestamp,
    ) -> WaiverWarning {
        self.assess(waiver, birth_date, now).warning
    }

    /// Computes every validity fact for a member in one pass.
    pub fn assess(
        &self,
        waiver: Option<&Waiver>,
        birth_date: Option<NaiveDate>,
        now: Timestamp,
    ) -> WaiverStatus {
        let Some(waiver) = waiver else {
            return WaiverStatus {
                has_waiver: false,
                is_valid: false,
                window_valid: false,
                turned_adult: false,
                expires_at: None,
                days_remaining: None,
                warning: WaiverWarning::new(
                    Severity::Critical,
                    "No waiver on file. A signed liability waiver is required before training."
                        .to_string(),
                ),
            };
        };

        let expires_at = self.waiver_expiration(waiver);
        let window_valid = now < expires_at;
        let turned_adult = self.turned_adult(birth_date, waiver.signer_relationship, now);
        let days_remaining = Self::days_until(expires_at, now);
        let expiry_date = expires_at.utc_date();

        let warning = if turned_adult {
            WaiverWarning::new(
                Severity::Critical,
                format!(
                    "Member has turned {} since a {} signed their waiver. A new self-signed waiver is required.",
                    self.adult_age,
                    relationship_label(waiver.signer_relationship)
                ),
            )
        } else if !window_valid {
            WaiverWarning::new(
                Severity::Critical,
                format!("Waiver expired on {}. Please sign a new waiver.", expiry_date),
            )
        } else if days_remaining <= self.urgent_threshold_days {
            WaiverWarning::new(Severity::Warning, expiring_message(days_remaining, expiry_date))
        } else if days_remaining <= self.warning_threshold_days {
            WaiverWarning::new(Severity::Info, expiring_message(days_remaining, expiry_date))
        } else {
            WaiverWarning::none()
        };

        WaiverStatus {
            has_waiver: true,
            is_valid: window_valid && !turned_adult,
            window_valid,
            turned_adult,
            expires_at: Some(expires_at),
            days_remaining: Some(days_remaining),
            warning,
        }
    }
}

fn relationship_label(relationship: SignerRelationship) -> &'static str {
    match relationship {
        SignerRelationship::Parent => "parent",
        SignerRelationship::Guardian => "guardian",
        SignerRelationship::SelfSigned => "member",
    }
}

fn expiring_message(days: i64, on: NaiveDate) -> String {
    match days {
        0 => format!("Waiver expires today ({}).", on),
        1 => format!("Waiver expires in 1 day on {}.", on),
        n => format!("Waiver expires in {} days on {}.", n, on),
    }
}
