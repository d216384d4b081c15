//! Data models shared by every surface.
//!
//! - [`HistoryEntry`] - One completed conversion as it is persisted
//! - [`RelativeOffset`] - An explicit `{days, hours, minutes, seconds, ms}` offset from now
//! - [`Calendar`] - Which calendar a date is read or written in (UTC or viewer-local)
//! - [`ThemePreference`] - Persisted light/dark/system choice
//!
//! Instants are plain `i64` millisecond counts since the Unix epoch ([`EpochMillis`]).

pub mod history;
pub mod relative;
pub mod theme;

pub use history::{HistoryEntry, Source};
pub use relative::{Direction, RelativeOffset};
pub use theme::{ResolvedTheme, ThemePreference};

/// Milliseconds since the Unix epoch. Negative values are before 1970.
pub type EpochMillis = i64;

/// Calendar used to read or render wall-clock fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Calendar {
    Utc,
    #[default]
    Local,
}

impl Calendar {
    /// Name used in history labels
    pub fn label(self) -> &'static str {
        match self {
            Calendar::Utc => "GMT",
            Calendar::Local => "Local",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Calendar::Utc => Calendar::Local,
            Calendar::Local => Calendar::Utc,
        }
    }
}
