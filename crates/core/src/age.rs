//! Age-from-date-of-birth.

use chrono::{Datelike, NaiveDate};

/// Number of completed birthday anniversaries between `dob` and `today`.
///
/// Subtracts year numbers, then takes one more off when `today` falls before
/// the birth month/day. A 29 February birthday completes on 1 March in
/// non-leap years.
///
/// A `dob` after `today` yields zero or a negative value; callers accept it
/// as-is (dates of birth in the future are not rejected).
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years
}
