//! Wall-clock parsing and overnight normalization.
//!
//! # Responsibility
//! - Parse and format `"HH:MM"` wall-clock strings at the core boundary.
//! - Convert clock times to a linear hour scale where late-evening and
//!   past-midnight bedtimes order correctly for comparison and charting.
//! - Compute sleep duration across the midnight boundary.
//!
//! # Invariants
//! - Wake times normalize into `[0, 24)`.
//! - Bedtimes strictly before 20:00 are treated as past-midnight
//!   continuations of the previous evening and shifted by +24. Exactly
//!   20:00 is not shifted.

use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("valid clock regex"));

/// Linear-hour threshold below which a bedtime counts as past midnight.
///
/// 19:59 rolls to 43.98 under this rule. The artifact is inherited from
/// the charting contract and pinned by tests; do not "fix" it without
/// changing the chart axis domain to match.
const BEDTIME_ROLLOVER_HOUR: f64 = 20.0;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Rejected wall-clock input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockParseError {
    value: String,
}

impl Display for ClockParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid clock value `{}`; expected HH:MM", self.value)
    }
}

impl Error for ClockParseError {}

/// Parses a strict zero-padded `"HH:MM"` string.
pub fn parse_clock(value: &str) -> Result<NaiveTime, ClockParseError> {
    let captures = CLOCK_RE.captures(value.trim()).ok_or_else(|| ClockParseError {
        value: value.to_string(),
    })?;

    // The regex guarantees both groups are in-range two-digit numbers.
    let hour: u32 = captures[1].parse().expect("regex-validated hour");
    let minute: u32 = captures[2].parse().expect("regex-validated minute");
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| ClockParseError {
        value: value.to_string(),
    })
}

/// Formats a clock time back to zero-padded `"HH:MM"`.
pub fn format_clock(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Converts a clock time to linear hours in `[0, 24)`.
pub fn to_linear_hours(time: NaiveTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0
}

/// Inverse of [`to_linear_hours`], rounding to the nearest minute.
///
/// Values at or beyond 24 wrap onto the next-day clock face, so a
/// rolled bedtime of 26.0 comes back as 02:00.
pub fn from_linear_hours(value: f64) -> NaiveTime {
    let total_minutes = (value * 60.0).round() as i64;
    let wrapped = total_minutes.rem_euclid(MINUTES_PER_DAY) as u32;
    NaiveTime::from_hms_opt(wrapped / 60, wrapped % 60, 0)
        .expect("minute count normalized to the clock range")
}

/// Normalizes a bedtime onto the evening-anchored linear scale.
///
/// Bedtimes live in the 20:00-04:00 band; anything before the rollover
/// hour is read as past midnight and shifted by +24 so that
/// 20:00 -> 24:00 -> 04:00 increases monotonically.
pub fn bedtime_to_linear(time: NaiveTime) -> f64 {
    let linear = to_linear_hours(time);
    if linear < BEDTIME_ROLLOVER_HOUR {
        linear + 24.0
    } else {
        linear
    }
}

/// Hours slept between `bedtime` and `wake`, rounded to one decimal.
///
/// A wake time numerically earlier than the bedtime is read as a
/// next-day wake. No clamping: implausible spans are returned as
/// computed and left to the caller to judge.
pub fn sleep_duration(bedtime: NaiveTime, wake: NaiveTime) -> f64 {
    let bed_minutes = i64::from(bedtime.hour()) * 60 + i64::from(bedtime.minute());
    let mut wake_minutes = i64::from(wake.hour()) * 60 + i64::from(wake.minute());

    if wake_minutes < bed_minutes {
        wake_minutes += MINUTES_PER_DAY;
    }

    let hours = (wake_minutes - bed_minutes) as f64 / 60.0;
    (hours * 10.0).round() / 10.0
}
