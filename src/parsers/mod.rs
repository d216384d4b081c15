//! Input parsing and validation.
//!
//! - [`epoch`] - 10/13 digit epoch text to milliseconds
//! - [`fields`] - numeric form fields (calendar date, bounded time parts)

pub mod epoch;
pub mod fields;

pub use epoch::{looks_like_epoch, parse_epoch, sanitize_epoch_input};
pub use fields::{parse_date_input, parse_time_part};
