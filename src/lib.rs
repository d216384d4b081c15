//! Epoch Buddy - convert between Unix epochs, calendar dates, and relative offsets
//!
//! This library backs a small CLI and an interactive terminal popup. It supports:
//!
//! - Parsing 10 digit (seconds) and 13 digit (milliseconds) epochs, ignoring `,` and `_`
//! - Converting calendar fields, read in GMT or the local timezone, to an epoch
//! - Converting an offset from now ("2d, 3h, 0m, 0s, 0ms ago") to an epoch
//! - Formatting instants as GMT, local with offset, and relative text
//! - A persisted history of the last ten conversions and a theme preference
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use epoch_buddy::models::Calendar;
//! use epoch_buddy::{Converter, DateForm};
//!
//! let form = DateForm {
//!     year: "2024".into(),
//!     month: "02".into(),
//!     day: "29".into(),
//!     calendar: Calendar::Utc,
//!     ..Default::default()
//! };
//! let conversion = Converter::with_timezone(Utc).date_to_epoch(&form)?;
//! assert_eq!(conversion.epoch_ms, 1_709_164_800_000);
//! # Ok::<(), epoch_buddy::ConversionError>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod conversion;
pub mod error;
pub mod formatting;
pub mod history;
pub mod models;
pub mod parsers;
pub mod storage;
pub mod theme;
pub mod tui;

// Re-export commonly used types
pub use conversion::{Conversion, Converter, DateForm, RelativeForm, ResultRow};
pub use error::ConversionError;
pub use formatting::{format_relative_at, strip_timezone_suffix};
pub use history::{HISTORY_LIMIT, HistoryStore};
pub use models::{EpochMillis, HistoryEntry, ThemePreference};
pub use parsers::{parse_epoch, sanitize_epoch_input};
