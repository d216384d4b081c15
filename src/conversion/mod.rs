//! Conversion orchestration for the three forms.
//!
//! Each operation validates raw form text, computes the display strings, and
//! produces the [`HistoryEntry`] to record. Nothing here touches storage except
//! [`Converter::record`].
//!
//! # Example
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use epoch_buddy::conversion::Converter;
//!
//! let now = DateTime::from_timestamp_millis(1_700_000_060_000).unwrap();
//! let converter = Converter::with_timezone(Utc).at(now);
//! let conversion = converter.epoch_to_date(" 1700000000 ")?;
//! assert_eq!(conversion.epoch_ms, 1_700_000_000_000);
//! assert_eq!(conversion.data.gmt, "2023-11-14 22:13:20.000");
//! assert_eq!(conversion.data.relative, "1m, 0s ago");
//! # Ok::<(), epoch_buddy::ConversionError>(())
//! ```

mod rows;

use chrono::{DateTime, Datelike, Local, LocalResult, NaiveDateTime, Offset, SecondsFormat, TimeDelta, TimeZone, Utc};
use log::debug;
pub use rows::{ResultRow, history_rows};

use crate::error::ConversionError;
use crate::formatting::{ConversionData, build_conversion_data_in, format_relative_parts, instant_to_datetime, pad2, pad3};
use crate::history::HistoryStore;
use crate::models::{Calendar, Direction, EpochMillis, HistoryEntry, RelativeOffset, Source};
use crate::parsers::{parse_date_input, parse_epoch, parse_time_part};
use crate::storage::Storage;

/// Upper bound for the relative form's day field
pub const MAX_RELATIVE_DAYS: u32 = 365_000;

/// Raw text of the date/time form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateForm {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub millisecond: String,
    pub calendar: Calendar,
}

/// Raw text of the relative-offset form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeForm {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub milliseconds: String,
    pub direction: Direction,
}

impl Default for RelativeForm {
    fn default() -> Self {
        Self {
            days: "0".to_string(),
            hours: "0".to_string(),
            minutes: "0".to_string(),
            seconds: "0".to_string(),
            milliseconds: "0".to_string(),
            direction: Direction::Ago,
        }
    }
}

/// Outcome of one successful form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub epoch_ms: EpochMillis,
    pub data: ConversionData,
    pub rows: Vec<ResultRow>,
    pub entry: HistoryEntry,
}

/// Runs conversions against a timezone and a clock
#[derive(Debug, Clone)]
pub struct Converter<Tz: TimeZone> {
    tz: Tz,
    fixed_now: Option<DateTime<Utc>>,
}

impl Converter<Local> {
    /// Viewer-local timezone and the system clock
    pub fn system() -> Self {
        Self::with_timezone(Local)
    }
}

impl<Tz: TimeZone> Converter<Tz> {
    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz, fixed_now: None }
    }

    /// Pin "now" (tests, reproducible output)
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    fn build(
        &self,
        epoch_ms: EpochMillis,
        now: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, ConversionData), ConversionError> {
        let dt = instant_to_datetime(epoch_ms)?;
        let data = build_conversion_data_in(&dt, now.timestamp_millis(), &self.tz);
        Ok((dt, data))
    }

    fn entry(&self, source: Source, epoch_ms: EpochMillis, data: &ConversionData, now: DateTime<Utc>) -> HistoryEntry {
        HistoryEntry {
            source,
            input: String::new(),
            display: None,
            epoch_ms,
            gmt: data.gmt.clone(),
            local: data.local.clone(),
            relative: Some(data.relative.clone()),
            converted_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Epoch text to GMT/local/relative displays
    pub fn epoch_to_date(&self, input: &str) -> Result<Conversion, ConversionError> {
        let trimmed = input.trim();
        let epoch_ms = parse_epoch(trimmed).ok_or(ConversionError::InvalidEpoch)?;
        let now = self.now();
        let (_, data) = self.build(epoch_ms, now)?;

        let mut entry = self.entry(Source::Epoch, epoch_ms, &data, now);
        entry.input = trimmed.to_string();
        debug!("Converted epoch {} -> {}", trimmed, data.gmt);

        Ok(Conversion { epoch_ms, rows: ResultRow::for_instant(epoch_ms, &data, &data.relative), data, entry })
    }

    /// Calendar fields to an epoch, read in the form's calendar
    pub fn date_to_epoch(&self, form: &DateForm) -> Result<Conversion, ConversionError> {
        let date = parse_date_input(&form.year, &form.month, &form.day).ok_or(ConversionError::InvalidDate)?;
        let hour = parse_time_part(&form.hour, 23, "Hour")?;
        let minute = parse_time_part(&form.minute, 59, "Minute")?;
        let second = parse_time_part(&form.second, 59, "Second")?;
        let millis = parse_time_part(&form.millisecond, 999, "Milliseconds")?;

        let naive = date
            .and_hms_milli_opt(hour, minute, second, millis)
            .ok_or(ConversionError::InvalidDate)?;
        let instant = match form.calendar {
            Calendar::Utc => Some(naive.and_utc()),
            Calendar::Local => resolve_local(&self.tz, naive),
        }
        .ok_or(ConversionError::OutOfSupportedRange)?;

        let epoch_ms = instant.timestamp_millis();
        let now = self.now();
        let (_, data) = self.build(epoch_ms, now)?;

        let label = format!(
            "{}-{}-{} {}:{}:{}.{} {}",
            date.year(),
            pad2(date.month()),
            pad2(date.day()),
            pad2(hour),
            pad2(minute),
            pad2(second),
            pad3(millis),
            form.calendar.label()
        );
        let mut entry = self.entry(Source::Date, epoch_ms, &data, now);
        entry.input = label;

        Ok(Conversion { epoch_ms, rows: ResultRow::for_date(epoch_ms, &data), data, entry })
    }

    /// Offset from now to an epoch
    pub fn relative_to_epoch(&self, form: &RelativeForm) -> Result<Conversion, ConversionError> {
        let offset = RelativeOffset {
            days: parse_time_part(&form.days, MAX_RELATIVE_DAYS, "Days")?,
            hours: parse_time_part(&form.hours, 23, "Hours")?,
            minutes: parse_time_part(&form.minutes, 59, "Minutes")?,
            seconds: parse_time_part(&form.seconds, 59, "Seconds")?,
            milliseconds: parse_time_part(&form.milliseconds, 999, "Milliseconds")?,
            direction: form.direction,
        };

        let now = self.now();
        let epoch_ms = offset.apply(now.timestamp_millis());
        let (_, data) = self.build(epoch_ms, now)?;
        let label = format_relative_parts(&offset);

        let mut entry = self.entry(Source::Relative, epoch_ms, &data, now);
        entry.input = label.clone();
        entry.display = Some(label.clone());

        Ok(Conversion { epoch_ms, rows: ResultRow::for_instant(epoch_ms, &data, &label), data, entry })
    }

    /// Append the conversion's entry to `store`, returning the new list
    pub fn record<S: Storage>(&self, store: &mut HistoryStore<S>, conversion: &Conversion) -> Vec<HistoryEntry> {
        store.append(conversion.entry.clone())
    }
}

/// Interpret wall-clock fields in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap use the offset in effect before the gap, which lands them after it.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => {
            let day_before = naive.checked_sub_signed(TimeDelta::days(1))?;
            let before = tz.offset_from_utc_datetime(&day_before).fix();
            let utc = naive.checked_sub_signed(TimeDelta::seconds(before.local_minus_utc().into()))?;
            Some(utc.and_utc())
        }
    }
}
