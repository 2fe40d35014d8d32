//! Placement of an offset inside an interval occurrence and computation of
//! the next scheduled instant.
//!
//! All calendar work happens on naive wall-clock times in the recurrence's
//! zone. Conversion to and from UTC goes through [`crate::timezone`], which
//! settles DST gaps and overlaps.

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::error::CoreError;
use crate::models::Interval;
use crate::offset::Offset;
use crate::timezone::{localize, parse_timezone, to_local};

/// Moves `dt` to the position described by `offset` within the occurrence of
/// `interval` that contains `dt`.
///
/// The offset's days count from 0. For months, quarters and years an offset
/// past the end of the occurrence lands on its last day. The time of day is
/// replaced outright by the offset's `hh:mm:ss`.
///
/// # Examples
///
/// ```
/// use cadence_core::models::Interval;
/// use cadence_core::offset::Offset;
/// use cadence_core::recurrence::replace_with_offset;
/// use chrono::NaiveDate;
///
/// let dt = NaiveDate::from_ymd_opt(2013, 2, 10).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// let offset = Offset::new(30, 23, 3, 3).unwrap();
/// let placed = replace_with_offset(dt, &offset, Interval::Month).unwrap();
/// assert_eq!(placed, NaiveDate::from_ymd_opt(2013, 2, 28).unwrap().and_hms_opt(23, 3, 3).unwrap());
/// ```
pub fn replace_with_offset(
    dt: NaiveDateTime,
    offset: &Offset,
    interval: Interval,
) -> Result<NaiveDateTime, CoreError> {
    let date = dt.date();
    let days = i64::from(offset.days());

    let day = match interval {
        Interval::Day => date,
        Interval::Week => {
            let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
            monday
                .checked_add_signed(Duration::days(days))
                .ok_or_else(|| {
                    CoreError::MalformedOffset(format!(
                        "{} days past {} is outside the calendar",
                        days, monday
                    ))
                })?
        }
        Interval::Month => {
            let length = i64::from(days_in_month(date.year(), date.month()));
            month_start(date) + Duration::days(days.min(length - 1))
        }
        Interval::Quarter => {
            let (start, length) = quarter_bounds(date);
            start + Duration::days(days.min(length - 1))
        }
        Interval::Year => {
            let length = if is_leap_year(date.year()) { 366 } else { 365 };
            year_start(date) + Duration::days(days.min(length - 1))
        }
    };

    Ok(day.and_time(offset.time_of_day()))
}

/// Computes the first instant strictly after `current_time` at which a
/// recurrence with the given interval, offset and timezone fires.
///
/// The candidate in the occurrence containing `current_time` is tried first.
/// If it is not in the future, the candidate is stepped forward by one
/// calendar interval and placed again within that next occurrence.
///
/// # Examples
///
/// ```
/// use cadence_core::models::Interval;
/// use cadence_core::offset::Offset;
/// use cadence_core::recurrence::next_schedule;
/// use chrono::{TimeZone, Utc};
///
/// let noon = Offset::new(0, 12, 0, 0).unwrap();
/// let now = Utc.with_ymd_and_hms(2013, 1, 15, 17, 5, 22).unwrap();
/// let next = next_schedule(now, Interval::Day, &noon, "US/Eastern").unwrap();
/// assert_eq!(next, Utc.with_ymd_and_hms(2013, 1, 16, 17, 0, 0).unwrap());
/// ```
pub fn next_schedule(
    current_time: DateTime<Utc>,
    interval: Interval,
    offset: &Offset,
    timezone: &str,
) -> Result<DateTime<Utc>, CoreError> {
    let tz = parse_timezone(timezone)?;

    let local_now = to_local(current_time, &tz);
    let local_candidate = replace_with_offset(local_now, offset, interval)?;
    let candidate = localize(local_candidate, &tz)?;
    if candidate > current_time {
        debug!(%interval, %offset, timezone, %current_time, next = %candidate, "next schedule in current occurrence");
        return Ok(candidate);
    }

    let stepped = step_forward(local_candidate, interval)?;
    let local_next = replace_with_offset(stepped, offset, interval)?;
    let next = localize(local_next, &tz)?;
    debug!(%interval, %offset, timezone, %current_time, %next, "next schedule in following occurrence");
    Ok(next)
}

/// Lists the next `count` scheduled instants after `current_time`, each one
/// computed from the previous.
pub fn upcoming_schedules(
    current_time: DateTime<Utc>,
    interval: Interval,
    offset: &Offset,
    timezone: &str,
    count: usize,
) -> Result<Vec<DateTime<Utc>>, CoreError> {
    let mut schedules = Vec::with_capacity(count);
    let mut cursor = current_time;
    for _ in 0..count {
        cursor = next_schedule(cursor, interval, offset, timezone)?;
        schedules.push(cursor);
    }
    Ok(schedules)
}

/// One calendar step of `interval`. Month arithmetic clamps to the end of
/// the target month.
fn step_forward(local: NaiveDateTime, interval: Interval) -> Result<NaiveDateTime, CoreError> {
    let stepped = match interval {
        Interval::Day => local.checked_add_days(Days::new(1)),
        Interval::Week => local.checked_add_days(Days::new(7)),
        Interval::Month => local.checked_add_months(Months::new(1)),
        Interval::Quarter => local.checked_add_months(Months::new(3)),
        Interval::Year => local.checked_add_months(Months::new(12)),
    };
    stepped.ok_or_else(|| {
        CoreError::InvalidInput(format!("one {} after {} is out of range", interval, local))
    })
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn year_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

/// First day and length in days of the quarter containing `date`.
fn quarter_bounds(date: NaiveDate) -> (NaiveDate, i64) {
    let year = date.year();
    let first_month = (date.month0() / 3) * 3 + 1;
    let days_before: u32 = (1..first_month).map(|m| days_in_month(year, m)).sum();
    let length: u32 = (first_month..first_month + 3)
        .map(|m| days_in_month(year, m))
        .sum();
    (
        year_start(date) + Duration::days(i64::from(days_before)),
        i64::from(length),
    )
}
