use crate::models::relative::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use crate::models::{Direction, EpochMillis, RelativeOffset};

/// Coarse units, largest first. Month and year are fixed 30 and 365 days.
const DURATION_UNITS: [(&str, i64); 6] = [
    ("y", 365 * MS_PER_DAY),
    ("mo", 30 * MS_PER_DAY),
    ("d", MS_PER_DAY),
    ("h", MS_PER_HOUR),
    ("m", MS_PER_MINUTE),
    ("s", MS_PER_SECOND),
];

/// Render unit values from the first nonzero one onward, or `0s` when all are zero
fn join_units<I>(units: I, suffix: &str) -> String
where
    I: IntoIterator<Item = (&'static str, u64)>,
{
    let parts: Vec<String> = units
        .into_iter()
        .skip_while(|(_, value)| *value == 0)
        .map(|(label, value)| format!("{}{}", value, label))
        .collect();

    if parts.is_empty() { format!("0s {}", suffix) } else { format!("{} {}", parts.join(", "), suffix) }
}

/// Describe the gap between `epoch_ms` and `now`, e.g. `1y, 2mo, 0d, 3h, 0m, 5s ago`
pub fn format_relative_at(epoch_ms: EpochMillis, now: EpochMillis) -> String {
    let diff = i128::from(epoch_ms) - i128::from(now);
    let suffix = if diff < 0 { Direction::Ago } else { Direction::FromNow }.suffix();
    let mut remaining = diff.unsigned_abs();

    let values = DURATION_UNITS.iter().map(|&(label, unit_ms)| {
        let unit_ms = unit_ms as u128;
        let value = remaining / unit_ms;
        remaining -= value * unit_ms;
        (label, value as u64)
    });

    join_units(values.collect::<Vec<_>>(), suffix)
}

/// Describe an explicit offset, e.g. `1d, 0h, 5m, 0s, 0ms from now`
pub fn format_relative_parts(offset: &RelativeOffset) -> String {
    let units = [
        ("d", u64::from(offset.days)),
        ("h", u64::from(offset.hours)),
        ("m", u64::from(offset.minutes)),
        ("s", u64::from(offset.seconds)),
        ("ms", u64::from(offset.milliseconds)),
    ];
    join_units(units, offset.direction.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_zero_duration() {
        assert_eq!(format_relative_at(NOW, NOW), "0s from now");
        // Sub-second gaps round down to zero in every unit
        assert_eq!(format_relative_at(NOW - 999, NOW), "0s ago");
    }

    #[test]
    fn test_leading_zero_units_omitted() {
        assert_eq!(format_relative_at(NOW - 5_000, NOW), "5s ago");
        assert_eq!(format_relative_at(NOW + 90_000, NOW), "1m, 30s from now");
    }

    #[test]
    fn test_inner_zero_units_kept() {
        let gap = MS_PER_DAY + 5 * MS_PER_MINUTE;
        assert_eq!(format_relative_at(NOW - gap, NOW), "1d, 0h, 5m, 0s ago");
    }

    #[test]
    fn test_coarse_year_and_month() {
        let gap = 365 * MS_PER_DAY + 30 * MS_PER_DAY + 2 * MS_PER_DAY;
        assert_eq!(format_relative_at(NOW + gap, NOW), "1y, 1mo, 2d, 0h, 0m, 0s from now");
    }

    #[test]
    fn test_extreme_gap_does_not_overflow() {
        let text = format_relative_at(i64::MAX, i64::MIN);
        assert!(text.ends_with("from now"));
    }

    #[test]
    fn test_parts_zero() {
        assert_eq!(format_relative_parts(&RelativeOffset::default()), "0s ago");
        let future = RelativeOffset { direction: Direction::FromNow, ..Default::default() };
        assert_eq!(format_relative_parts(&future), "0s from now");
    }

    #[test]
    fn test_parts_keep_non_leading_zeros() {
        let offset = RelativeOffset {
            days: 1,
            minutes: 5,
            direction: Direction::FromNow,
            ..Default::default()
        };
        assert_eq!(format_relative_parts(&offset), "1d, 0h, 5m, 0s, 0ms from now");
    }

    #[test]
    fn test_parts_only_millis() {
        let offset = RelativeOffset { milliseconds: 250, ..Default::default() };
        assert_eq!(format_relative_parts(&offset), "250ms ago");
    }
}
