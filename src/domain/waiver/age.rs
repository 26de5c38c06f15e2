//! Age arithmetic.
//!
//! Age is the difference of calendar years only; month and day are ignored.
//! Minor detection and kid pricing both rely on this exact rule, so it lives
//! in one place.

use chrono::{Datelike, NaiveDate};

/// Default age at which a member is treated as an adult.
pub const ADULT_AGE: i32 = 18;

/// Age in whole years by calendar-year subtraction.
pub fn age_in_years(birth_date: NaiveDate, on: NaiveDate) -> i32 {
    on.year() - birth_date.year()
}

/// Returns true if the subject is younger than `adult_age` on the given date.
///
/// An unknown birth date is treated as an adult.
pub fn is_minor(birth_date: Option<NaiveDate>, on: NaiveDate, adult_age: i32) -> bool {
    birth_date.is_some_and(|birth| age_in_years(birth, on) < adult_age)
}
