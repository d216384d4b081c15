use crate::models::EpochMillis;

/// Remove thousands separators (`,` and `_`)
pub fn sanitize_epoch_input(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, ',' | '_')).collect()
}

/// Parse epoch text into milliseconds.
///
/// Exactly 10 ASCII digits are read as seconds, exactly 13 as milliseconds.
/// Anything else (signs, exponents, other lengths, empty input) yields `None`.
///
/// # Examples
///
/// ```
/// use epoch_buddy::parse_epoch;
///
/// assert_eq!(parse_epoch("1700000000"), Some(1_700_000_000_000));
/// assert_eq!(parse_epoch("1,700,000,000,000"), Some(1_700_000_000_000));
/// assert_eq!(parse_epoch("-1700000000"), None);
/// ```
pub fn parse_epoch(text: &str) -> Option<EpochMillis> {
    let sanitized = sanitize_epoch_input(text.trim());
    if !sanitized.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match sanitized.len() {
        10 => sanitized.parse::<i64>().ok().map(|secs| secs * 1000),
        13 => sanitized.parse::<i64>().ok(),
        _ => None,
    }
}

pub fn looks_like_epoch(text: &str) -> bool {
    parse_epoch(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_digits_are_seconds() {
        assert_eq!(parse_epoch("1700000000"), Some(1_700_000_000_000));
        assert_eq!(parse_epoch("0000000000"), Some(0));
        assert_eq!(parse_epoch("9999999999"), Some(9_999_999_999_000));
    }

    #[test]
    fn test_thirteen_digits_are_millis() {
        assert_eq!(parse_epoch("1700000000000"), Some(1_700_000_000_000));
        assert_eq!(parse_epoch("1700000000123"), Some(1_700_000_000_123));
    }

    #[test]
    fn test_separators_and_whitespace_stripped() {
        assert_eq!(parse_epoch("  1,700,000,000  "), Some(1_700_000_000_000));
        assert_eq!(parse_epoch("1_700_000_000_000"), Some(1_700_000_000_000));
        assert_eq!(sanitize_epoch_input("1,2_3"), "123");
    }

    #[test]
    fn test_other_lengths_rejected() {
        for input in ["", "1", "170000000", "17000000000", "170000000000", "17000000000000"] {
            assert_eq!(parse_epoch(input), None, "{input:?} should not parse");
        }
    }

    #[test]
    fn test_non_digits_rejected() {
        for input in ["+1700000000", "-1700000000", "1.7e9", "17000000o0", "1700000000s", "１７００００００００"]
        {
            assert_eq!(parse_epoch(input), None, "{input:?} should not parse");
        }
    }

    #[test]
    fn test_interior_whitespace_rejected() {
        assert_eq!(parse_epoch("1700 000000"), None);
        assert!(!looks_like_epoch("hello"));
        assert!(looks_like_epoch("1700000000"));
    }

    #[test]
    fn test_every_ten_digit_string_scales_by_thousand() {
        for seed in [1u64, 12_345, 987_654_321, 4_294_967_295] {
            let text = format!("{:010}", seed);
            assert_eq!(parse_epoch(&text), Some(seed as i64 * 1000));
        }
    }
}
