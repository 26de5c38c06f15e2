//! Facility-local calendar day.
//!
//! All "same day" checks go through [`LocalDay`]; no other code converts
//! between instants and facility dates.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// One calendar day in the facility time zone, as a half-open UTC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDay {
    pub date: NaiveDate,
    /// First instant of the day.
    pub start: Timestamp,
    /// First instant of the next day (exclusive).
    pub end: Timestamp,
}

impl LocalDay {
    /// The local day containing `at`.
    pub fn containing(at: Timestamp, tz: Tz) -> Self {
        Self::of(at.local_date(tz), tz)
    }

    /// Bounds of the given local date.
    pub fn of(date: NaiveDate, tz: Tz) -> Self {
        let next = date.succ_opt().unwrap_or(date);
        Self {
            date,
            start: start_of_day(date, tz),
            end: start_of_day(next, tz),
        }
    }

    /// Returns true if `at` falls within this day.
    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && at < self.end
    }
}

/// Local midnight, or the first valid instant after it when a DST jump skips
/// midnight. Ambiguous midnights resolve to the earlier instant.
fn start_of_day(date: NaiveDate, tz: Tz) -> Timestamp {
    for hour in 0..=3 {
        let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else {
            continue;
        };
        if let Some(dt) = date.and_time(time).and_local_timezone(tz).earliest() {
            return Timestamp::from_datetime(dt.with_timezone(&Utc));
        }
    }
    Timestamp::from_datetime(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}
