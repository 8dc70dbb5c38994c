//! Source of "today" for age computation.
//!
//! The clock itself is `mockable::Clock`: `DefaultClock` reads the system time,
//! `MockClock` pins it in tests.

use chrono::NaiveDate;

pub use mockable::{Clock, DefaultClock};

/// The UTC calendar date according to `clock`.
pub fn today(clock: &dyn Clock) -> NaiveDate {
    clock.utc().date_naive()
}
