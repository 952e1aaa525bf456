// ✅ Validators - calendar, date, quarter and region checks
// Pure predicates, no I/O. Everything else in the crate builds on these.

use chrono::NaiveDate;

use crate::error::InputError;
use crate::region::Region;

/// Lowest year accepted for a sales date
pub const MIN_YEAR: i32 = 2000;

/// Highest year accepted for a sales date
pub const MAX_YEAR: i32 = 2999;

// ============================================================================
// CALENDAR
// ============================================================================

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

/// Number of days in `month` of `year`.
///
/// Caller guarantees `month` is in 1..=12.
pub fn max_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Quarter (1-4) a month falls in, 0 for anything outside 1..=12
pub fn quarter_of_month(month: u32) -> u32 {
    match month {
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        10..=12 => 4,
        _ => 0,
    }
}

// ============================================================================
// DATE STRINGS
// ============================================================================

/// Parse a `YYYY-MM-DD` string, reporting why it was rejected.
///
/// # Rules:
/// 1. exactly 10 characters, hyphens at positions 4 and 7
/// 2. year, month and day are all ASCII digits
/// 3. month in 1..=12, day in 1..=max_day_of_month
/// 4. year in MIN_YEAR..=MAX_YEAR
pub fn parse_date_string(entry: &str) -> Result<NaiveDate, InputError> {
    let bytes = entry.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && all_digits(&bytes[..4])
        && all_digits(&bytes[5..7])
        && all_digits(&bytes[8..]);

    if !shape_ok {
        return Err(InputError::InvalidDate(entry.to_string()));
    }

    // Shape check guarantees ASCII digits, slicing on byte offsets is safe
    let year: i32 = entry[..4].parse().map_err(|_| InputError::InvalidDate(entry.to_string()))?;
    let month: u32 = entry[5..7].parse().map_err(|_| InputError::InvalidDate(entry.to_string()))?;
    let day: u32 = entry[8..].parse().map_err(|_| InputError::InvalidDate(entry.to_string()))?;

    if !(1..=12).contains(&month) || !(1..=max_day_of_month(year, month)).contains(&day) {
        return Err(InputError::InvalidDate(entry.to_string()));
    }

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(InputError::YearOutOfRange {
            low: MIN_YEAR,
            high: MAX_YEAR,
        });
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| InputError::InvalidDate(entry.to_string()))
}

/// True iff `entry` is a real calendar date in `YYYY-MM-DD` form within the year range
pub fn is_valid_date_string(entry: &str) -> bool {
    parse_date_string(entry).is_ok()
}

fn all_digits(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_digit)
}

// ============================================================================
// REGIONS
// ============================================================================

/// Case-insensitive membership in the region table
pub fn is_valid_region_code(code: &str) -> bool {
    Region::from_code(code).is_some()
}

// ============================================================================
// TESTS
// ============================================================================
