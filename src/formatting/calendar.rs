use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike, Utc};

use super::{pad2, pad3};

/// Zero-padded wall-clock fields of an instant in some calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: String,
    pub day: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub millis: String,
}

impl DateParts {
    /// `YYYY-MM-DD HH:MM:SS.mmm`
    pub fn timestamp(&self) -> String {
        format!(
            "{}-{}-{} {}:{}:{}.{}",
            self.year, self.month, self.day, self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

pub fn date_parts<Tz: TimeZone>(dt: &DateTime<Utc>, tz: &Tz) -> DateParts {
    let local = dt.with_timezone(tz);
    DateParts {
        year: local.year(),
        month: pad2(local.month()),
        day: pad2(local.day()),
        hours: pad2(local.hour()),
        minutes: pad2(local.minute()),
        seconds: pad2(local.second()),
        millis: pad3(local.timestamp_subsec_millis().min(999)),
    }
}

pub fn format_gmt_timestamp(dt: &DateTime<Utc>) -> String {
    date_parts(dt, &Utc).timestamp()
}

pub fn format_local_timestamp_in<Tz: TimeZone>(dt: &DateTime<Utc>, tz: &Tz) -> String {
    date_parts(dt, tz).timestamp()
}

/// UTC offset in effect at `dt`, as `+HH:MM` / `-HH:MM`
pub fn format_timezone_offset_in<Tz: TimeZone>(dt: &DateTime<Utc>, tz: &Tz) -> String {
    let offset_minutes = dt.with_timezone(tz).offset().fix().local_minus_utc() / 60;
    let sign = if offset_minutes >= 0 { '+' } else { '-' };
    let abs_minutes = offset_minutes.unsigned_abs();
    format!("{}{}:{}", sign, pad2(abs_minutes / 60), pad2(abs_minutes % 60))
}

/// Local timestamp followed by its parenthesized UTC offset
pub fn format_local_display_in<Tz: TimeZone>(dt: &DateTime<Utc>, tz: &Tz) -> String {
    format!("{} ({})", format_local_timestamp_in(dt, tz), format_timezone_offset_in(dt, tz))
}

/// Remove a trailing ` (+HH:MM)` / ` (-HH:MM)` suffix, if present
pub fn strip_timezone_suffix(value: &str) -> &str {
    const SUFFIX_LEN: usize = " (+00:00)".len();
    let bytes = value.as_bytes();
    if bytes.len() < SUFFIX_LEN {
        return value;
    }

    let start = bytes.len() - SUFFIX_LEN;
    let tail = &bytes[start..];
    let matches = tail[0].is_ascii_whitespace()
        && tail[1] == b'('
        && matches!(tail[2], b'+' | b'-')
        && tail[3].is_ascii_digit()
        && tail[4].is_ascii_digit()
        && tail[5] == b':'
        && tail[6].is_ascii_digit()
        && tail[7].is_ascii_digit()
        && tail[8] == b')';

    if matches { &value[..start] } else { value }
}

/// `HH:MM:SS` of a stored RFC 3339 timestamp, or `--:--:--`
pub fn format_time_only_in<Tz: TimeZone>(timestamp: Option<&str>, tz: &Tz) -> String {
    let parsed = timestamp.filter(|s| !s.is_empty()).and_then(|s| DateTime::parse_from_rfc3339(s).ok());
    match parsed {
        Some(dt) => {
            let local = dt.with_timezone(tz);
            format!("{}:{}:{}", pad2(local.hour()), pad2(local.minute()), pad2(local.second()))
        }
        None => "--:--:--".to_string(),
    }
}
