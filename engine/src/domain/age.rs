//! Calendar age computation.
//!
//! Works on date-only values so the result can never depend on a
//! time-of-day component; callers holding timestamps strip them first.

use chrono::{Datelike, NaiveDate};
use shared::AgeBreakdown;

/// Compute the age at `at` for someone born on `dob`.
///
/// A missing date on either side yields the zeroed breakdown rather than an
/// error: malformed persisted data must degrade, not fail, since the result
/// only drives display. An `at` before `dob` also clamps to zero.
pub fn age_on(dob: Option<NaiveDate>, at: Option<NaiveDate>) -> AgeBreakdown {
    let (dob, at) = match (dob, at) {
        (Some(dob), Some(at)) => (dob, at),
        _ => return AgeBreakdown::default(),
    };
    if at < dob {
        return AgeBreakdown::default();
    }

    let mut years = at.year() - dob.year();
    let mut months = at.month() as i32 - dob.month() as i32;
    // Borrow a month when the current day-of-month hasn't reached the
    // birthday's day-of-month yet.
    if at.day() < dob.day() {
        months -= 1;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let years = years.max(0) as u32;
    let months = months as u32;
    AgeBreakdown {
        years,
        months,
        total_months: years * 12 + months,
    }
}
