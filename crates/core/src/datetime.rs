//! Date-time helpers shared by the rule categories.
//!
//! Deadlines recorded on a pricing unit are write-once-or-tighten: a merge
//! only replaces the stored value when the candidate is stricter. This keeps
//! the stored deadline identical under any evaluation order of the fare
//! usages that contribute to it.

use time::{Duration, OffsetDateTime, Time};

/// Catalog clock times are minutes since midnight; 1440 marks "end of day".
///
/// A literal 24:00 would roll into the next calendar day, so it is read as
/// 23:59 of the same day everywhere a clock time is applied.
pub const END_OF_DAY_MINUTES: u16 = 1440;

/// Assign `candidate` into `slot` only when it is earlier than the stored
/// value, or when nothing has been stored yet.
pub fn merge_earlier(slot: &mut Option<OffsetDateTime>, candidate: OffsetDateTime) {
    match slot {
        Some(existing) if *existing <= candidate => {}
        _ => *slot = Some(candidate),
    }
}

/// Assign `candidate` into `slot` only when it is later than the stored
/// value, or when nothing has been stored yet.
pub fn merge_later(slot: &mut Option<OffsetDateTime>, candidate: OffsetDateTime) {
    match slot {
        Some(existing) if *existing >= candidate => {}
        _ => *slot = Some(candidate),
    }
}

/// Replace the clock time of `dt` with `minutes` since midnight, keeping the
/// date and UTC offset. Values at or past [`END_OF_DAY_MINUTES`] become 23:59.
pub fn with_time_of_day(dt: OffsetDateTime, minutes: u16) -> OffsetDateTime {
    let clamped = if minutes >= END_OF_DAY_MINUTES {
        END_OF_DAY_MINUTES - 1
    } else {
        minutes
    };
    let tod = Time::MIDNIGHT + Duration::minutes(i64::from(clamped));
    dt.replace_time(tod)
}
