//! Validation errors surfaced next to the form that produced them.
//!
//! The `Display` text of each variant is the message the user sees.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Enter a 10 or 13 digit epoch value (commas and underscores are allowed).")]
    InvalidEpoch,
    #[error("Enter a valid date (YYYY/MM/DD fields).")]
    InvalidDate,
    #[error("{field} must be between 0 and {max}.")]
    OutOfRange { field: &'static str, max: u32 },
    #[error("{field} must be numeric.")]
    NonNumeric { field: &'static str },
    #[error("Result is outside the supported date range.")]
    OutOfSupportedRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_messages_name_field_and_bound() {
        let err = ConversionError::OutOfRange { field: "Hour", max: 23 };
        assert_eq!(err.to_string(), "Hour must be between 0 and 23.");

        let err = ConversionError::NonNumeric { field: "Minutes" };
        assert_eq!(err.to_string(), "Minutes must be numeric.");
    }
}
