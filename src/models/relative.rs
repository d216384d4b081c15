use super::EpochMillis;

pub const MS_PER_SECOND: i64 = 1000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Whether an offset points into the past or the future
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ago,
    FromNow,
}

impl Direction {
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::Ago => "ago",
            Direction::FromNow => "from now",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Direction::Ago => Direction::FromNow,
            Direction::FromNow => Direction::Ago,
        }
    }
}

/// User-specified offset from "now", each component non-negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelativeOffset {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
    pub direction: Direction,
}

impl RelativeOffset {
    /// Unsigned magnitude of the offset in milliseconds
    pub fn to_millis(&self) -> i64 {
        i64::from(self.days) * MS_PER_DAY
            + i64::from(self.hours) * MS_PER_HOUR
            + i64::from(self.minutes) * MS_PER_MINUTE
            + i64::from(self.seconds) * MS_PER_SECOND
            + i64::from(self.milliseconds)
    }

    /// Apply the offset to `now`, honoring the direction
    pub fn apply(&self, now: EpochMillis) -> EpochMillis {
        match self.direction {
            Direction::Ago => now - self.to_millis(),
            Direction::FromNow => now + self.to_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_millis_uses_fixed_multipliers() {
        let offset = RelativeOffset {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
            milliseconds: 5,
            direction: Direction::Ago,
        };
        assert_eq!(offset.to_millis(), 86_400_000 + 7_200_000 + 180_000 + 4_000 + 5);
    }

    #[test]
    fn test_apply_direction() {
        let offset = RelativeOffset { hours: 1, ..Default::default() };
        assert_eq!(offset.apply(10_000_000), 10_000_000 - 3_600_000);

        let future = RelativeOffset { direction: Direction::FromNow, ..offset };
        assert_eq!(future.apply(10_000_000), 10_000_000 + 3_600_000);
    }

    #[test]
    fn test_max_days_does_not_overflow() {
        let offset = RelativeOffset { days: 365_000, ..Default::default() };
        assert_eq!(offset.to_millis(), 365_000 * MS_PER_DAY);
    }
}
