//! Rendering of elapsed seconds as an ISO-8601 style duration string.

use std::fmt::Write;

// Fixed divisors, applied highest first. Years use a 365.25-day basis and
// months a 30.44-day basis.
const SECS_PER_YEAR: u64 = 31_557_600;
const SECS_PER_MONTH: u64 = 2_629_800;
const SECS_PER_WEEK: u64 = 604_800;
const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

/// Format an elapsed-seconds count as a calendar-duration string such as
/// `P1Y2M3DT4H5M6S`.
///
/// Each unit consumes the remainder of the previous one and is emitted only
/// when non-zero. The `T` separator and the time tokens are omitted when
/// hours, minutes and seconds are all zero. Zero seconds renders as `P`.
pub fn format_iso8601(total_seconds: u64) -> String {
    let mut left = total_seconds;
    let years = left / SECS_PER_YEAR;
    left %= SECS_PER_YEAR;
    let months = left / SECS_PER_MONTH;
    left %= SECS_PER_MONTH;
    let weeks = left / SECS_PER_WEEK;
    left %= SECS_PER_WEEK;
    let days = left / SECS_PER_DAY;
    left %= SECS_PER_DAY;
    let hours = left / SECS_PER_HOUR;
    left %= SECS_PER_HOUR;
    let minutes = left / SECS_PER_MINUTE;
    let seconds = left % SECS_PER_MINUTE;

    let mut out = String::from("P");
    for (value, unit) in [(years, 'Y'), (months, 'M'), (weeks, 'W'), (days, 'D')] {
        if value != 0 {
            let _ = write!(out, "{value}{unit}");
        }
    }
    if hours != 0 || minutes != 0 || seconds != 0 {
        out.push('T');
        for (value, unit) in [(hours, 'H'), (minutes, 'M'), (seconds, 'S')] {
            if value != 0 {
                let _ = write!(out, "{value}{unit}");
            }
        }
    }
    out
}
