//! Form state behind the three conversion tabs.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

use crate::conversion::{DateForm, RelativeForm};
use crate::formatting::{pad2, pad3};
use crate::models::{Calendar, Direction, EpochMillis};

/// A single-line input. Numeric inputs silently drop non-digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub numeric: bool,
    pub max_len: usize,
}

impl FormField {
    pub fn text(label: &'static str, max_len: usize) -> Self {
        Self { label, value: String::new(), numeric: false, max_len }
    }

    pub fn numeric(label: &'static str, max_len: usize, value: &str) -> Self {
        Self { label, value: value.to_string(), numeric: true, max_len }
    }

    /// Returns true when the value changed
    pub fn input(&mut self, c: char) -> bool {
        if (self.numeric && !c.is_ascii_digit()) || c.is_control() || self.value.chars().count() >= self.max_len {
            return false;
        }
        self.value.push(c);
        true
    }

    pub fn delete_char(&mut self) -> bool {
        self.value.pop().is_some()
    }
}

/// Epoch input whose value follows the clock until the user takes over.
///
/// Refresh pauses on focus or edit and resumes when the field is left empty
/// and blurred.
#[derive(Debug, Clone)]
pub struct EpochInput {
    pub field: FormField,
    auto_refresh: bool,
}

impl EpochInput {
    pub fn new(now_ms: EpochMillis) -> Self {
        let mut input = Self { field: FormField::text("Epoch", 32), auto_refresh: true };
        input.refresh(now_ms);
        input
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    fn refresh(&mut self, now_ms: EpochMillis) {
        self.field.value = (now_ms.div_euclid(1000) * 1000).to_string();
    }

    /// Periodic tick; returns true when the value was rewritten
    pub fn tick(&mut self, focused: bool, now_ms: EpochMillis) -> bool {
        if !self.auto_refresh || focused {
            return false;
        }
        self.refresh(now_ms);
        true
    }

    pub fn focus(&mut self) {
        self.auto_refresh = false;
    }

    pub fn input(&mut self, c: char) -> bool {
        self.auto_refresh = false;
        self.field.input(c)
    }

    pub fn delete_char(&mut self) -> bool {
        self.auto_refresh = false;
        self.field.delete_char()
    }

    pub fn blur(&mut self, now_ms: EpochMillis) {
        if self.field.value.trim().is_empty() {
            self.auto_refresh = true;
            self.refresh(now_ms);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePreset {
    StartOfDay,
    EndOfDay,
    Now,
}

/// Index of the calendar toggle in [`DateFormState`]
pub const DATE_CALENDAR_FIELD: usize = 7;

#[derive(Debug, Clone)]
pub struct DateFormState {
    /// year, month, day, hour, minute, second, millisecond
    pub fields: [FormField; 7],
    pub calendar: Calendar,
    pub preset: Option<TimePreset>,
}

impl DateFormState {
    /// Today's date in `tz` with the "now" preset applied
    pub fn new<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        let mut state = Self {
            fields: [
                FormField::numeric("Year", 6, ""),
                FormField::numeric("Month", 2, ""),
                FormField::numeric("Day", 2, ""),
                FormField::numeric("Hour", 2, ""),
                FormField::numeric("Minute", 2, ""),
                FormField::numeric("Second", 2, ""),
                FormField::numeric("Millis", 3, ""),
            ],
            calendar: Calendar::Local,
            preset: None,
        };
        let local = now.with_timezone(tz);
        state.fields[0].value = local.year().to_string();
        state.fields[1].value = pad2(local.month());
        state.fields[2].value = pad2(local.day());
        state.apply_preset(TimePreset::Now, now, tz);
        state
    }

    /// Number of focusable entries (fields plus the calendar toggle)
    pub fn len(&self) -> usize {
        self.fields.len() + 1
    }

    pub fn is_time_field(idx: usize) -> bool {
        (3..7).contains(&idx)
    }

    pub fn apply_preset<Tz: TimeZone>(&mut self, preset: TimePreset, now: DateTime<Utc>, tz: &Tz) {
        let (h, m, s, ms) = match preset {
            TimePreset::StartOfDay => (0, 0, 0, 0),
            TimePreset::EndOfDay => (23, 59, 59, 999),
            TimePreset::Now => match self.calendar {
                Calendar::Utc => (now.hour(), now.minute(), now.second(), now.timestamp_subsec_millis()),
                Calendar::Local => {
                    let local = now.with_timezone(tz);
                    (local.hour(), local.minute(), local.second(), local.timestamp_subsec_millis())
                }
            },
        };
        self.fields[3].value = pad2(h);
        self.fields[4].value = pad2(m);
        self.fields[5].value = pad2(s);
        self.fields[6].value = pad3(ms.min(999));
        self.preset = Some(preset);
    }

    pub fn input(&mut self, idx: usize, c: char) -> bool {
        if idx == DATE_CALENDAR_FIELD {
            if c == ' ' {
                self.calendar = self.calendar.toggle();
                return true;
            }
            return false;
        }
        let changed = self.fields.get_mut(idx).is_some_and(|f| f.input(c));
        if changed && Self::is_time_field(idx) {
            self.preset = None;
        }
        changed
    }

    pub fn delete_char(&mut self, idx: usize) -> bool {
        let changed = self.fields.get_mut(idx).is_some_and(|f| f.delete_char());
        if changed && Self::is_time_field(idx) {
            self.preset = None;
        }
        changed
    }

    pub fn to_form(&self) -> DateForm {
        let [year, month, day, hour, minute, second, millisecond] = self.fields.clone().map(|f| f.value);
        DateForm { year, month, day, hour, minute, second, millisecond, calendar: self.calendar }
    }
}

/// Index of the direction toggle in [`RelativeFormState`]
pub const RELATIVE_DIRECTION_FIELD: usize = 0;

#[derive(Debug, Clone)]
pub struct RelativeFormState {
    pub direction: Direction,
    /// days, hours, minutes, seconds, milliseconds
    pub fields: [FormField; 5],
}

impl Default for RelativeFormState {
    fn default() -> Self {
        Self {
            direction: Direction::Ago,
            fields: [
                FormField::numeric("Days", 6, "0"),
                FormField::numeric("Hours", 2, "0"),
                FormField::numeric("Minutes", 2, "0"),
                FormField::numeric("Seconds", 2, "0"),
                FormField::numeric("Millis", 3, "0"),
            ],
        }
    }
}

impl RelativeFormState {
    pub fn len(&self) -> usize {
        self.fields.len() + 1
    }

    pub fn input(&mut self, idx: usize, c: char) -> bool {
        if idx == RELATIVE_DIRECTION_FIELD {
            if c == ' ' {
                self.direction = self.direction.toggle();
                return true;
            }
            return false;
        }
        self.fields.get_mut(idx - 1).is_some_and(|f| f.input(c))
    }

    pub fn delete_char(&mut self, idx: usize) -> bool {
        idx != RELATIVE_DIRECTION_FIELD && self.fields.get_mut(idx - 1).is_some_and(|f| f.delete_char())
    }

    pub fn to_form(&self) -> RelativeForm {
        let [days, hours, minutes, seconds, milliseconds] = self.fields.clone().map(|f| f.value);
        RelativeForm { days, hours, minutes, seconds, milliseconds, direction: self.direction }
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    fn now() -> DateTime<Utc> {
        // 2023-11-14 22:13:20.123 UTC
        DateTime::from_timestamp_millis(1_700_000_000_123).unwrap()
    }

    #[test]
    fn test_numeric_field_drops_non_digits() {
        let mut field = FormField::numeric("Hour", 2, "");
        assert!(!field.input('a'));
        assert!(field.input('1'));
        assert!(field.input('2'));
        assert!(!field.input('3'));
        assert_eq!(field.value, "12");
    }

    #[test]
    fn test_epoch_input_auto_refresh_lifecycle() {
        let mut input = EpochInput::new(1_700_000_000_456);
        assert_eq!(input.field.value, "1700000000000");

        // Focused: tick leaves the value alone
        assert!(!input.tick(true, 1_700_000_005_000));

        input.focus();
        assert!(!input.tick(false, 1_700_000_005_000));

        // Blur with text keeps refresh paused
        input.blur(1_700_000_006_000);
        assert!(!input.auto_refresh());

        // Cleared and blurred: refresh resumes immediately
        while input.delete_char() {}
        input.blur(1_700_000_007_999);
        assert!(input.auto_refresh());
        assert_eq!(input.field.value, "1700000007000");
        assert!(input.tick(false, 1_700_000_008_000));
        assert_eq!(input.field.value, "1700000008000");
    }

    #[test]
    fn test_epoch_input_typing_pauses_refresh() {
        let mut input = EpochInput::new(0);
        input.input('1');
        assert!(!input.auto_refresh());
        assert!(!input.tick(false, 5_000));
    }

    #[test]
    fn test_date_defaults_use_timezone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let state = DateFormState::new(now(), &tz);
        let form = state.to_form();
        assert_eq!((form.year.as_str(), form.month.as_str(), form.day.as_str()), ("2023", "11", "15"));
        assert_eq!((form.hour.as_str(), form.minute.as_str()), ("00", "13"));
        assert_eq!((form.second.as_str(), form.millisecond.as_str()), ("20", "123"));
        assert_eq!(state.preset, Some(TimePreset::Now));
    }

    #[test]
    fn test_presets_and_manual_edit() {
        let mut state = DateFormState::new(now(), &Utc);
        state.apply_preset(TimePreset::EndOfDay, now(), &Utc);
        let form = state.to_form();
        assert_eq!(
            [form.hour, form.minute, form.second, form.millisecond],
            ["23", "59", "59", "999"].map(String::from)
        );

        state.apply_preset(TimePreset::StartOfDay, now(), &Utc);
        assert_eq!(state.to_form().millisecond, "000");

        state.delete_char(3);
        assert_eq!(state.preset, None);
    }

    #[test]
    fn test_now_preset_in_utc_calendar() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let mut state = DateFormState::new(now(), &tz);
        state.input(DATE_CALENDAR_FIELD, ' ');
        assert_eq!(state.calendar, Calendar::Utc);

        state.apply_preset(TimePreset::Now, now(), &tz);
        assert_eq!(state.to_form().hour, "22");
    }

    #[test]
    fn test_relative_form_toggle_and_fields() {
        let mut state = RelativeFormState::default();
        assert!(state.input(RELATIVE_DIRECTION_FIELD, ' '));
        assert_eq!(state.direction, Direction::FromNow);

        assert!(state.delete_char(1));
        assert!(state.input(1, '7'));
        let form = state.to_form();
        assert_eq!(form.days, "7");
        assert_eq!(form.hours, "0");
        assert_eq!(form.direction, Direction::FromNow);
    }
}
