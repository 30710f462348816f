// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar arithmetic over naive wall-clock instants.
//!
//! An [`Instant`] is a point in the proleptic Gregorian calendar with
//! one-second resolution and no timezone, bounded by [`MIN`]/[`MAX`]. The
//! three primitives here — [`floor`], [`delta`], [`add`] — are the only
//! place the crate touches calendar math; everything above this module
//! reasons purely in terms of these three operations.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result};
use crate::unit::Unit;

/// A naive, second-resolution wall-clock point in time.
pub type Instant = NaiveDateTime;

/// The earliest representable instant: `0001-01-01T00:00:00`.
#[allow(clippy::expect_used)]
pub static MIN: LazyLock<Instant> = LazyLock::new(|| {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .expect("1-1-1 is a valid proleptic Gregorian date")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
});

/// The latest representable instant: `9999-12-31T23:59:59`.
#[allow(clippy::expect_used)]
pub static MAX: LazyLock<Instant> = LazyLock::new(|| {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .expect("9999-12-31 is a valid proleptic Gregorian date")
        .and_hms_opt(23, 59, 59)
        .expect("23:59:59 is a valid time")
});

/// Shorthand for `*MIN`.
#[must_use]
pub fn min() -> Instant {
    *MIN
}

/// Shorthand for `*MAX`.
#[must_use]
pub fn max() -> Instant {
    *MAX
}

const DAYS_OF_COMMON_YEAR: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAYS_OF_LEAP_YEAR: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let table = if is_leap_year(year) {
        &DAYS_OF_LEAP_YEAR
    } else {
        &DAYS_OF_COMMON_YEAR
    };
    table[(month - 1) as usize]
}

fn seconds_per(unit: Unit) -> i64 {
    match unit {
        Unit::Second => 1,
        Unit::Minute => 60,
        Unit::Hour => 3_600,
        Unit::Day => 86_400,
        Unit::Week => 604_800,
        Unit::Month | Unit::Year => {
            unreachable!("month/year additions are handled by add_months, not seconds_per")
        }
    }
}

/// Truncates `t` to the start of the `unit` window it falls in.
///
/// Week windows start on Monday, following [`chrono`]'s own weekday
/// numbering convention.
#[must_use]
#[allow(clippy::expect_used)]
pub fn floor(t: Instant, unit: Unit) -> Instant {
    let date = t.date();
    match unit {
        Unit::Second => date
            .and_hms_opt(t.hour(), t.minute(), t.second())
            .expect("components taken from a valid instant are valid"),
        Unit::Minute => date
            .and_hms_opt(t.hour(), t.minute(), 0)
            .expect("components taken from a valid instant are valid"),
        Unit::Hour => date
            .and_hms_opt(t.hour(), 0, 0)
            .expect("components taken from a valid instant are valid"),
        Unit::Day => date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid"),
        Unit::Week => {
            let days_from_monday = i64::from(date.weekday().num_days_from_monday());
            (date - chrono::Duration::days(days_from_monday))
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always valid")
        }
        Unit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .expect("day 1 of any month is valid")
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid"),
        Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)
            .expect("January 1st is always valid")
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid"),
    }
}

/// The count of whole `unit`s between `a` and `b`, always non-negative.
#[must_use]
pub fn delta(a: Instant, b: Instant, unit: Unit) -> i64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    match unit {
        Unit::Second => (hi - lo).num_seconds(),
        Unit::Minute => (hi - lo).num_seconds().div_euclid(60),
        Unit::Hour => (hi - lo).num_seconds().div_euclid(3_600),
        Unit::Day => (hi - lo).num_seconds().div_euclid(86_400),
        Unit::Week => {
            let days = (hi - lo).num_seconds().div_euclid(86_400);
            let weekday = i64::from(lo.date().weekday().num_days_from_monday());
            (days + weekday).div_euclid(7)
        }
        Unit::Month => {
            i64::from(hi.year() - lo.year()) * 12 - i64::from(lo.month()) + i64::from(hi.month())
        }
        Unit::Year => i64::from(hi.year() - lo.year()),
    }
}

#[allow(clippy::expect_used)]
fn add_months(t: Instant, months: i64) -> Option<Instant> {
    let date = t.date();
    let total = i64::from(date.year()) * 12 + i64::from(date.month() - 1) + months;
    let new_year = total.div_euclid(12);
    if !(1..=9_999).contains(&new_year) {
        return None;
    }
    let new_year = i32::try_from(new_year).ok()?;
    let new_month = u32::try_from(total.rem_euclid(12))
        .expect("rem_euclid(12) is non-negative")
        + 1;
    let day = date.day().min(days_in_month(new_year, new_month));
    NaiveDate::from_ymd_opt(new_year, new_month, day)?.and_hms_opt(t.hour(), t.minute(), t.second())
}

/// Adds `n` whole `unit`s to `t`, failing with [`Error::Overflow`] if the
/// result would fall outside `[Instant::MIN, Instant::MAX]`.
///
/// Month/year arithmetic clamps an overflowing day-of-month to the last
/// valid day of the target month (e.g. January 31st plus one month lands on
/// the last day of February) rather than failing.
pub fn add(t: Instant, n: i64, unit: Unit) -> Result<Instant> {
    let overflow = || Error::Overflow { unit, amount: n };

    let result = match unit {
        Unit::Second | Unit::Minute | Unit::Hour | Unit::Day | Unit::Week => {
            let seconds = n.checked_mul(seconds_per(unit)).ok_or_else(overflow)?;
            t.checked_add_signed(chrono::Duration::seconds(seconds))
                .ok_or_else(overflow)?
        }
        Unit::Month => add_months(t, n).ok_or_else(overflow)?,
        Unit::Year => {
            let months = n.checked_mul(12).ok_or_else(overflow)?;
            add_months(t, months).ok_or_else(overflow)?
        }
    };

    if result < min() || result > max() {
        return Err(overflow());
    }

    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> Instant {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn floor_by_week_is_monday() {
        // 2000-01-01 is a Saturday.
        let t = dt(2000, 1, 1, 13, 30, 0);
        assert_eq!(floor(t, Unit::Week), dt(1999, 12, 27, 0, 0, 0));
    }

    #[test]
    fn floor_by_month_and_year() {
        let t = dt(2000, 5, 15, 1, 2, 3);
        assert_eq!(floor(t, Unit::Month), dt(2000, 5, 1, 0, 0, 0));
        assert_eq!(floor(t, Unit::Year), dt(2000, 1, 1, 0, 0, 0));
    }

    #[test]
    fn delta_months_spans_years() {
        let a = dt(1999, 11, 1, 0, 0, 0);
        let b = dt(2000, 2, 1, 0, 0, 0);
        assert_eq!(delta(a, b, Unit::Month), 3);
        assert_eq!(delta(b, a, Unit::Month), 3);
    }

    #[test]
    fn add_month_clamps_day_of_month() {
        let jan31 = dt(2001, 1, 31, 10, 0, 0);
        let result = add(jan31, 1, Unit::Month).unwrap();
        assert_eq!(result, dt(2001, 2, 28, 10, 0, 0));

        let leap_jan31 = dt(2000, 1, 31, 10, 0, 0);
        let result = add(leap_jan31, 1, Unit::Month).unwrap();
        assert_eq!(result, dt(2000, 2, 29, 10, 0, 0));
    }

    #[test]
    fn add_year_beyond_max_overflows() {
        let near_max = dt(9999, 1, 1, 0, 0, 0);
        assert_eq!(
            add(near_max, 1, Unit::Year),
            Err(Error::Overflow {
                unit: Unit::Year,
                amount: 1
            })
        );
    }

    #[test]
    fn add_before_min_overflows() {
        assert!(add(min(), -1, Unit::Second).is_err());
    }

    #[test]
    fn add_is_inverse_of_subtracting() {
        let t = dt(2000, 6, 15, 12, 0, 0);
        let forward = add(t, 10, Unit::Day).unwrap();
        let back = add(forward, -10, Unit::Day).unwrap();
        assert_eq!(back, t);
    }
}
