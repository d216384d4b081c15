use chrono::NaiveDate;

use crate::error::ConversionError;

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validate year/month/day fields as a real calendar date.
///
/// Every field must be present and purely numeric, and the triple must name a
/// day that exists (Feb 30 and Apr 31 are rejected).
pub fn parse_date_input(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let (year, month, day) = (year.trim(), month.trim(), day.trim());
    if !(all_digits(year) && all_digits(month) && all_digits(day)) {
        return None;
    }

    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse one bounded numeric field. Blank input counts as zero.
pub fn parse_time_part(value: &str, max: u32, label: &'static str) -> Result<u32, ConversionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if !all_digits(trimmed) {
        return Err(ConversionError::NonNumeric { field: label });
    }

    // Digit strings too long for u64 are necessarily above any bound
    match trimmed.parse::<u64>() {
        Ok(n) if n <= u64::from(max) => Ok(n as u32),
        _ => Err(ConversionError::OutOfRange { field: label, max }),
    }
}
