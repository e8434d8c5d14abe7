//! Deadline arithmetic: the single timing primitive behind every temporal
//! rule category.
//!
//! Callers differ only in which reference instant they supply (booking,
//! ticketing, or a segment's matched travel date) and in the direction the
//! period is applied. Unused-date sentinels (open segments without a date)
//! must be short-circuited by the caller before reaching this module.

use time::{Date, Duration, Month, OffsetDateTime};

use tariff_core::datetime::{with_time_of_day, END_OF_DAY_MINUTES};

use crate::error::EvalError;
use crate::period::{PeriodOfStay, PeriodSpec, PeriodUnit};

/// Whether the period reaches backward or forward from the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineDirection {
    Before,
    After,
}

/// A filed 0-hour period has always been read as 59 minutes. Catalogs file
/// `000`/`H` to mean "same hour", and downstream consumers depend on the
/// 59-minute boundary, so it stays.
pub const ZERO_HOUR_PERIOD_MINUTES: i64 = 59;

/// Compute a concrete deadline from a reference instant and a filed period.
///
/// For date-granular periods (days, months, weekday occurrences) the clock
/// time of the result is the explicit `time_of_day` when one is filed,
/// otherwise 23:59 for a latest deadline (`round_for_latest`) or 00:00 for
/// an earliest one. Hour and minute periods are instant-relative: the
/// result keeps exact offset arithmetic and `time_of_day` does not apply.
pub fn compute_deadline(
    reference: OffsetDateTime,
    time_of_day: Option<u16>,
    period: &PeriodOfStay,
    direction: DeadlineDirection,
    round_for_latest: bool,
) -> Result<OffsetDateTime, EvalError> {
    match period.spec() {
        PeriodSpec::Invalid => Err(EvalError::InvalidPeriod {
            period: period.period_text(),
            unit: period.unit_text(),
        }),
        PeriodSpec::DayOfWeek { day, occurrence } => {
            let offset_days = nth_weekday_offset(reference, day, occurrence, direction);
            let date = shift_date(reference.date(), offset_days, direction)?;
            Ok(apply_clock(
                reference.replace_date(date),
                time_of_day,
                round_for_latest,
            ))
        }
        PeriodSpec::Duration { value, unit } => match unit {
            PeriodUnit::Months => {
                let months = match direction {
                    DeadlineDirection::Before => -i32::from(value),
                    DeadlineDirection::After => i32::from(value),
                };
                let date = add_months_clamped(reference.date(), months)?;
                Ok(apply_clock(
                    reference.replace_date(date),
                    time_of_day,
                    round_for_latest,
                ))
            }
            PeriodUnit::Days => {
                let date = shift_date(reference.date(), i64::from(value), direction)?;
                Ok(apply_clock(
                    reference.replace_date(date),
                    time_of_day,
                    round_for_latest,
                ))
            }
            PeriodUnit::Hours => {
                let minutes = if value == 0 {
                    ZERO_HOUR_PERIOD_MINUTES
                } else {
                    i64::from(value) * 60
                };
                shift_instant(reference, minutes, direction)
            }
            PeriodUnit::Minutes => shift_instant(reference, i64::from(value), direction),
        },
    }
}

fn apply_clock(dt: OffsetDateTime, time_of_day: Option<u16>, round_for_latest: bool) -> OffsetDateTime {
    match time_of_day {
        Some(minutes) => with_time_of_day(dt, minutes),
        None if round_for_latest => with_time_of_day(dt, END_OF_DAY_MINUTES),
        None => with_time_of_day(dt, 0),
    }
}

fn shift_instant(
    reference: OffsetDateTime,
    minutes: i64,
    direction: DeadlineDirection,
) -> Result<OffsetDateTime, EvalError> {
    let delta = Duration::minutes(minutes);
    let shifted = match direction {
        DeadlineDirection::Before => reference.checked_sub(delta),
        DeadlineDirection::After => reference.checked_add(delta),
    };
    shifted.ok_or(EvalError::DateOutOfRange)
}

fn shift_date(date: Date, days: i64, direction: DeadlineDirection) -> Result<Date, EvalError> {
    let delta = Duration::days(days);
    let shifted = match direction {
        DeadlineDirection::Before => date.checked_sub(delta),
        DeadlineDirection::After => date.checked_add(delta),
    };
    shifted.ok_or(EvalError::DateOutOfRange)
}

/// Whole-day offset to the Nth occurrence of `target` at or before/after the
/// reference. A reference already on the target weekday counts as the first
/// occurrence.
fn nth_weekday_offset(
    reference: OffsetDateTime,
    target: time::Weekday,
    occurrence: u8,
    direction: DeadlineDirection,
) -> i64 {
    let ref_n = i64::from(reference.date().weekday().number_days_from_sunday());
    let target_n = i64::from(target.number_days_from_sunday());
    let first = match direction {
        DeadlineDirection::Before => (ref_n - target_n).rem_euclid(7),
        DeadlineDirection::After => (target_n - ref_n).rem_euclid(7),
    };
    first + 7 * (i64::from(occurrence) - 1)
}

/// Calendar-month shift with end-of-month clamping: landing in a shorter
/// month yields that month's last day, never an invalid date.
fn add_months_clamped(date: Date, months: i32) -> Result<Date, EvalError> {
    let zero_based = date.year() * 12 + (date.month() as i32 - 1) + months;
    let year = zero_based.div_euclid(12);
    let month_index = zero_based.rem_euclid(12) + 1;
    let month = Month::try_from(month_index as u8).map_err(|_| EvalError::DateOutOfRange)?;
    let last_day = time::util::days_in_year_month(year, month);
    let day = date.day().min(last_day);
    Date::from_calendar_date(year, month, day).map_err(|_| EvalError::DateOutOfRange)
}
