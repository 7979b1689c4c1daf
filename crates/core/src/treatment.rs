//! Treatment scheduling rules.

use chrono::Days;

use crate::types::Date;

/// Longest dressing-change interval accepted, in days.
pub const MAX_CHANGE_FREQUENCY_DAYS: i32 = 90;

/// Default look-ahead window of the schedule endpoint, in days.
pub const DEFAULT_SCHEDULE_DAYS: i64 = 7;

/// Largest look-ahead window of the schedule endpoint, in days.
pub const MAX_SCHEDULE_DAYS: i64 = 90;

/// Date of the next dressing change: `performed_on + frequency_days`.
///
/// Returns `None` for a missing or non-positive frequency.
pub fn next_change_date(performed_on: Date, frequency_days: Option<i32>) -> Option<Date> {
    let days = u64::try_from(frequency_days?).ok().filter(|d| *d > 0)?;
    performed_on.checked_add_days(Days::new(days))
}

/// Resolve the next change date to store: an explicit date wins, otherwise
/// it is derived from the frequency.
pub fn resolve_next_change_date(
    explicit: Option<Date>,
    performed_on: Date,
    frequency_days: Option<i32>,
) -> Option<Date> {
    explicit.or_else(|| next_change_date(performed_on, frequency_days))
}

/// Clamp the schedule look-ahead window into `0..=MAX_SCHEDULE_DAYS`.
pub fn clamp_schedule_days(days: Option<i64>) -> i64 {
    days.unwrap_or(DEFAULT_SCHEDULE_DAYS)
        .clamp(0, MAX_SCHEDULE_DAYS)
}
