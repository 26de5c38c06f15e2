//! Timestamp value object for immutable points in time.
//!
//! The engine never reads an ambient clock; every timestamp arrives from the
//! caller, so all window arithmetic here is deterministic.

use chrono::{DateTime, Duration, Months, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days. Saturates at the representable range.
    pub fn add_days(&self, days: i64) -> Self {
        self.saturating_add(Duration::try_days(days), days >= 0)
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    ///
    /// Negative values subtract seconds. Saturates at the representable range.
    pub fn add_secs(&self, secs: i64) -> Self {
        self.saturating_add(Duration::try_seconds(secs), secs >= 0)
    }

    fn saturating_add(&self, delta: Option<Duration>, forward: bool) -> Self {
        match delta.and_then(|d| self.0.checked_add_signed(d)) {
            Some(dt) => Self(dt),
            None if forward => Self(DateTime::<Utc>::MAX_UTC),
            None => Self(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Adds whole calendar years, keeping month, day, and time of day.
    ///
    /// A Feb 29 start clamps to Feb 28 in non-leap target years. Saturates at
    /// the maximum representable instant instead of overflowing.
    pub fn add_calendar_years(&self, years: u32) -> Self {
        self.0
            .checked_add_months(Months::new(years.saturating_mul(12)))
            .map(Self)
            .unwrap_or(Self(DateTime::<Utc>::MAX_UTC))
    }

    /// Returns the calendar date of this instant in the given zone.
    pub fn local_date(&self, tz: Tz) -> NaiveDate {
        self.0.with_timezone(&tz).date_naive()
    }

    /// Returns the calendar date of this instant in UTC.
    pub fn utc_date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` for values outside chrono's representable range.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
