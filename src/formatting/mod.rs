//! Date/time display formatting.
//!
//! Every function is pure over its arguments: callers pass the instant, the
//! timezone to render in, and (for relative output) the "now" to measure from.
//! The surfaces get `Local` and the clock through `conversion::Converter`.
//!
//! # Example
//!
//! ```
//! use epoch_buddy::formatting::{format_gmt_timestamp, instant_to_datetime};
//!
//! let dt = instant_to_datetime(1_700_000_000_000)?;
//! assert_eq!(format_gmt_timestamp(&dt), "2023-11-14 22:13:20.000");
//! # Ok::<(), epoch_buddy::ConversionError>(())
//! ```

mod calendar;
mod relative;

pub use calendar::{
    DateParts, date_parts, format_gmt_timestamp, format_local_display_in, format_local_timestamp_in,
    format_time_only_in, format_timezone_offset_in, strip_timezone_suffix,
};
use chrono::{DateTime, TimeZone, Utc};
pub use relative::{format_relative_at, format_relative_parts};

use crate::error::ConversionError;
use crate::models::EpochMillis;

pub fn pad2(value: impl std::fmt::Display) -> String {
    format!("{:0>2}", value.to_string())
}

pub fn pad3(value: impl std::fmt::Display) -> String {
    format!("{:0>3}", value.to_string())
}

/// Convert an instant to a UTC datetime, failing outside chrono's supported range
pub fn instant_to_datetime(epoch_ms: EpochMillis) -> Result<DateTime<Utc>, ConversionError> {
    DateTime::from_timestamp_millis(epoch_ms).ok_or(ConversionError::OutOfSupportedRange)
}

/// Display strings computed once per conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionData {
    pub gmt: String,
    pub local: String,
    pub relative: String,
}

pub fn build_conversion_data_in<Tz: TimeZone>(
    dt: &DateTime<Utc>,
    now: EpochMillis,
    tz: &Tz,
) -> ConversionData {
    ConversionData {
        gmt: format_gmt_timestamp(dt),
        local: format_local_display_in(dt, tz),
        relative: format_relative_at(dt.timestamp_millis(), now),
    }
}
