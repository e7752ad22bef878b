//! Julian day and time-of-day conversion for chat timestamps
//!
//! Dates are stored as a whole Julian day number without the astronomical
//! half-day offset, so day `2440588` is 1970-01-01. Conversion uses the
//! Duffett-Smith & Zwart algorithm, which switches from the Julian to the
//! Gregorian calendar after day `2299160` (1582-10-04).

use crate::models::CivilDateTime;

/// Last Julian day number on the Julian calendar
pub const GREGORIAN_REFORM_DAY: u32 = 2_299_160;

const MILLIS_PER_SECOND: u32 = 1_000;
const SECONDS_PER_HOUR: u32 = 3_600;
const SECONDS_PER_MINUTE: u32 = 60;

/// Convert a Julian day number to `(year, month, day)`
///
/// Years before 1 AD are astronomical: the year before 1 AD is 0.
pub fn civil_date_from_julian_day(julian_day: u32) -> (i32, u32, u32) {
    let i = f64::from(julian_day);
    // The stored day count has no fractional part
    let f = 0.0;

    let a = ((i - 1_867_216.25) / 36_524.25).trunc();
    let b = if julian_day > GREGORIAN_REFORM_DAY { i + 1.0 + a - (a / 4.0).trunc() } else { i };

    let c = b + 1524.0;
    let d = ((c - 122.1) / 365.25).trunc();
    let e = (365.25 * d).trunc();
    let g = ((c - e) / 30.6001).trunc();

    let day = c - e + f - (30.6001 * g).trunc();
    let month = if g < 13.5 { g - 1.0 } else { g - 13.0 };
    let year = if month > 2.5 { d - 4716.0 } else { d - 4715.0 };

    (year as i32, month as u32, day as u32)
}

/// Split milliseconds since midnight into `(hour, minute, second)`
///
/// Sub-second precision is dropped. Out-of-range input is not wrapped.
pub fn time_of_day_from_millis(millis: u32) -> (u32, u32, u32) {
    let seconds = millis / MILLIS_PER_SECOND;
    let hour = seconds / SECONDS_PER_HOUR;
    let minute = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let second = seconds % SECONDS_PER_MINUTE;
    (hour, minute, second)
}

/// Build a timestamp from its three wire fields
///
/// `timezone_flag` is carried through untouched.
pub fn decode_timestamp(julian_day: u32, millis: u32, timezone_flag: u8) -> CivilDateTime {
    let (year, month, day) = civil_date_from_julian_day(julian_day);
    let (hour, minute, second) = time_of_day_from_millis(millis);
    CivilDateTime { year, month, day, hour, minute, second, timezone_flag }
}
