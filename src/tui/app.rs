//! TUI application state and event handling.
//!
//! `App` owns everything the interactive popup shows:
//!
//! - **Tabs**: Epoch → Date, Date → Epoch, Relative, and Inspect
//! - **Forms**: numeric inputs, time presets, the auto-refreshing epoch field
//! - **Results and history**: conversion rows plus the last ten conversions,
//!   with a copy cursor over every copyable value
//! - **Inspect overlay**: floating conversion panel for epoch-looking text
//!   under the cursor
//! - **Status messages**: transient feedback with expiry
//!
//! Rendering only reads state through [`RenderState`]; all mutation happens in
//! `handle_action` so tests can drive the app without a terminal.

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::TimeZone;
use log::{debug, info};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Position, Rect};

use super::events::{Action, poll_event};
use super::forms::{DATE_CALENDAR_FIELD, DateFormState, EpochInput, RELATIVE_DIRECTION_FIELD, RelativeFormState, TimePreset};
use super::inspect::InspectBuffer;
use super::layout::AppLayout;
use super::overlay::{OverlayController, SelectionOutcome};
use super::rendering::{FieldLine, RenderState, render_ui};
use crate::clipboard::{ClipboardProvider, CopyButton, SystemClipboard};
use crate::conversion::{Conversion, Converter, ResultRow, history_rows};
use crate::error::ConversionError;
use crate::formatting::format_time_only_in;
use crate::history::HistoryStore;
use crate::models::{EpochMillis, HistoryEntry, ThemePreference};
use crate::storage::Storage;
use crate::theme::{Palette, ThemeStore, detect_system_dark};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Epoch field refresh period
const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    EpochToDate,
    DateToEpoch,
    Relative,
    Inspect,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::EpochToDate, Tab::DateToEpoch, Tab::Relative, Tab::Inspect];

    pub fn title(self) -> &'static str {
        match self {
            Tab::EpochToDate => "Epoch → Date",
            Tab::DateToEpoch => "Date → Epoch",
            Tab::Relative => "Relative",
            Tab::Inspect => "Inspect",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::EpochToDate => 0,
            Tab::DateToEpoch => 1,
            Tab::Relative => 2,
            Tab::Inspect => 3,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Result slot for conversion tabs
    fn slot(self) -> Option<usize> {
        (self != Tab::Inspect).then(|| self.index())
    }
}

/// Last outcome of a conversion tab
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultView {
    #[default]
    Empty,
    Rows(Vec<ResultRow>),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPane {
    Result,
    /// History entry index, newest first
    History(usize),
}

/// One value the copy cursor can land on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTarget {
    pub pane: TargetPane,
    pub row: usize,
    pub text: String,
}

pub struct App<S: Storage, Tz: TimeZone> {
    converter: Converter<Tz>,
    history: HistoryStore<S>,
    themes: ThemeStore<S>,
    clipboard: Box<dyn ClipboardProvider>,
    entries: Vec<HistoryEntry>,
    tab: Tab,
    // None while no form field has focus
    field_focus: Option<usize>,
    epoch: EpochInput,
    date: DateFormState,
    relative: RelativeFormState,
    results: [ResultView; 3],
    inspect: InspectBuffer,
    overlay: OverlayController,
    copy_cursor: Option<usize>,
    copy_button: CopyButton,
    theme: ThemePreference,
    system_dark: bool,
    viewport: Rect,
    should_quit: bool,
    status_message: Option<StatusMessage>,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
    last_refresh: Instant,
}

impl<S: Storage, Tz: TimeZone> App<S, Tz> {
    pub fn new(converter: Converter<Tz>, history: HistoryStore<S>, themes: ThemeStore<S>) -> Self {
        let now = converter.now();
        let entries = history.load();
        let theme = themes.load();
        let date = DateFormState::new(now, converter.timezone());
        debug!("Popup opened with {} history entries, theme {}", entries.len(), theme);

        Self {
            epoch: EpochInput::new(now.timestamp_millis()),
            date,
            relative: RelativeFormState::default(),
            converter,
            history,
            themes,
            clipboard: Box::new(SystemClipboard),
            entries,
            tab: Tab::EpochToDate,
            field_focus: None,
            results: Default::default(),
            inspect: InspectBuffer::default(),
            overlay: OverlayController::new(),
            copy_cursor: None,
            copy_button: CopyButton::new(),
            theme,
            system_dark: detect_system_dark(),
            viewport: Rect::default(),
            should_quit: false,
            status_message: None,
            needs_redraw: true,
            last_draw_time: Instant::now(),
            last_refresh: Instant::now(),
        }
    }

    /// Open on the Inspect tab with `text` loaded
    pub fn with_inspect_text(mut self, text: &str) -> Self {
        self.inspect = InspectBuffer::new(text);
        self.tab = Tab::Inspect;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardProvider>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let should_clear = self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at);
        if should_clear {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.tick(Instant::now());

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                terminal.draw(|f| {
                    self.viewport = f.area();
                    render_ui(f, &self.render_state());
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100))?;
            self.handle_action(action);
        }

        Ok(())
    }

    /// Periodic work: epoch refresh, copy feedback, status expiry
    fn tick(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_refresh) >= REFRESH_INTERVAL {
            self.last_refresh = now;
            let focused = self.epoch_focused();
            let now_ms = self.now_ms();
            if self.epoch.tick(focused, now_ms) && self.tab == Tab::EpochToDate {
                self.needs_redraw = true;
            }
        }
        if self.copy_button.tick(now) {
            self.needs_redraw = true;
        }
        if let Some(popup) = self.overlay.popup_mut()
            && popup.copy.tick(now)
        {
            self.needs_redraw = true;
        }
        self.check_and_clear_expired_status();
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Escape => self.escape(),
            Action::NextTab => self.switch_tab(self.tab.next()),
            Action::PrevTab => self.switch_tab(self.tab.prev()),
            Action::NextField => self.move_vertical(1),
            Action::PrevField => self.move_vertical(-1),
            Action::CursorLeft => self.move_horizontal(false),
            Action::CursorRight => self.move_horizontal(true),
            Action::Submit => self.submit(),
            Action::Input(c) => self.input(c),
            Action::DeleteChar => self.delete_char(),
            Action::CopySelected => self.copy_selected(),
            Action::NextCopyTarget => self.move_copy_target(1),
            Action::PrevCopyTarget => self.move_copy_target(-1),
            Action::ClearHistory => {
                self.entries = self.history.clear();
                self.copy_cursor = None;
                self.set_status("✓ History cleared", MessageType::Success, STATUS_SUCCESS_DURATION_MS);
            }
            Action::CycleTheme => {
                self.theme = self.theme.next();
                self.themes.save(self.theme);
                info!("Theme set to {}", self.theme);
                self.set_status(format!("Theme: {}", self.theme), MessageType::Success, STATUS_SUCCESS_DURATION_MS);
            }
            Action::Preset(preset) => self.apply_preset(preset),
            Action::Click { column, row } => self.click(Position::new(column, row)),
            Action::Scroll(delta) => {
                self.overlay.dismiss();
                if self.tab == Tab::Inspect {
                    self.inspect.scroll_by(delta);
                }
                self.needs_redraw = true;
            }
            Action::Resize(width, height) => {
                self.viewport = Rect::new(0, 0, width, height);
                self.overlay.dismiss();
                self.needs_redraw = true;
            }
            Action::None => {}
        }
    }

    fn now_ms(&self) -> EpochMillis {
        self.converter.now().timestamp_millis()
    }

    fn form_len(&self) -> usize {
        match self.tab {
            Tab::EpochToDate => 1,
            Tab::DateToEpoch => self.date.len(),
            Tab::Relative => self.relative.len(),
            Tab::Inspect => 0,
        }
    }

    fn layout(&self) -> AppLayout {
        // One extra row for the hint line under the fields
        let rows = u16::try_from(self.form_len() + 1).unwrap_or(u16::MAX);
        AppLayout::new(self.viewport, rows)
    }

    fn epoch_focused(&self) -> bool {
        self.tab == Tab::EpochToDate && self.field_focus == Some(0)
    }

    fn set_focus(&mut self, focus: Option<usize>) {
        let was_epoch = self.epoch_focused();
        self.field_focus = focus;
        let is_epoch = self.epoch_focused();
        if is_epoch && !was_epoch {
            self.epoch.focus();
        } else if was_epoch && !is_epoch {
            let now_ms = self.now_ms();
            self.epoch.blur(now_ms);
        }
        self.needs_redraw = true;
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.set_focus(None);
        self.overlay.dismiss();
        self.tab = tab;
        self.copy_cursor = None;
        self.needs_redraw = true;
    }

    fn escape(&mut self) {
        if self.overlay.is_visible() {
            self.overlay.dismiss();
            self.needs_redraw = true;
        } else if self.field_focus.is_some() {
            self.set_focus(None);
        } else {
            self.should_quit = true;
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        if self.tab == Tab::Inspect {
            if delta < 0 {
                self.inspect.move_up();
            } else {
                self.inspect.move_down();
            }
            self.after_inspect_edit();
            return;
        }

        let len = self.form_len();
        let next = match self.field_focus {
            None if delta > 0 => Some(0),
            None => None,
            // Up from the first field leaves the form
            Some(0) if delta < 0 => None,
            Some(idx) => Some((idx as isize + delta).clamp(0, len as isize - 1) as usize),
        };
        self.set_focus(next);
    }

    fn move_horizontal(&mut self, right: bool) {
        match (self.tab, self.field_focus) {
            (Tab::Inspect, _) => {
                if right {
                    self.inspect.move_right();
                } else {
                    self.inspect.move_left();
                }
                self.after_inspect_edit();
            }
            (Tab::DateToEpoch, Some(DATE_CALENDAR_FIELD)) => {
                self.date.calendar = self.date.calendar.toggle();
                self.needs_redraw = true;
            }
            (Tab::Relative, Some(RELATIVE_DIRECTION_FIELD)) => {
                self.relative.direction = self.relative.direction.toggle();
                self.needs_redraw = true;
            }
            _ => {}
        }
    }

    /// Focused field index, focusing the first field when none is
    fn focus_for_edit(&mut self) -> usize {
        match self.field_focus {
            Some(idx) => idx,
            None => {
                self.set_focus(Some(0));
                0
            }
        }
    }

    fn input(&mut self, c: char) {
        if self.tab == Tab::Inspect {
            self.inspect.insert_char(c);
            self.after_inspect_edit();
            return;
        }
        let idx = self.focus_for_edit();
        let changed = match self.tab {
            Tab::EpochToDate => self.epoch.input(c),
            Tab::DateToEpoch => self.date.input(idx, c),
            Tab::Relative => self.relative.input(idx, c),
            Tab::Inspect => false,
        };
        if changed {
            self.needs_redraw = true;
        }
    }

    fn delete_char(&mut self) {
        if self.tab == Tab::Inspect {
            self.inspect.backspace();
            self.after_inspect_edit();
            return;
        }
        let idx = self.focus_for_edit();
        let changed = match self.tab {
            Tab::EpochToDate => self.epoch.delete_char(),
            Tab::DateToEpoch => self.date.delete_char(idx),
            Tab::Relative => self.relative.delete_char(idx),
            Tab::Inspect => false,
        };
        if changed {
            self.needs_redraw = true;
        }
    }

    fn apply_preset(&mut self, preset: TimePreset) {
        if self.tab != Tab::DateToEpoch {
            return;
        }
        self.date.apply_preset(preset, self.converter.now(), self.converter.timezone());
        self.needs_redraw = true;
    }

    fn submit(&mut self) {
        let outcome = match self.tab {
            Tab::EpochToDate => self.converter.epoch_to_date(&self.epoch.field.value),
            Tab::DateToEpoch => self.converter.date_to_epoch(&self.date.to_form()),
            Tab::Relative => self.converter.relative_to_epoch(&self.relative.to_form()),
            Tab::Inspect => {
                self.inspect.newline();
                self.after_inspect_edit();
                return;
            }
        };
        self.show_outcome(outcome);
    }

    fn show_outcome(&mut self, outcome: Result<Conversion, ConversionError>) {
        let Some(slot) = self.tab.slot() else {
            return;
        };
        self.results[slot] = match outcome {
            Ok(conversion) => {
                info!("Converted {} -> {}", conversion.entry.headline(), conversion.epoch_ms);
                self.entries = self.converter.record(&mut self.history, &conversion);
                ResultView::Rows(conversion.rows)
            }
            Err(e) => {
                debug!("Conversion rejected: {}", e);
                ResultView::Error(e.to_string())
            }
        };
        self.copy_cursor = None;
        self.copy_button = CopyButton::new();
        self.needs_redraw = true;
    }

    fn current_result(&self) -> Option<&ResultView> {
        self.tab.slot().and_then(|slot| self.results.get(slot))
    }

    /// Copyable values in display order: result rows, then history rows
    pub fn copy_targets(&self) -> Vec<CopyTarget> {
        let mut targets = Vec::new();
        if let Some(ResultView::Rows(rows)) = self.current_result() {
            for (row, result) in rows.iter().enumerate() {
                if let Some(text) = &result.copy {
                    targets.push(CopyTarget { pane: TargetPane::Result, row, text: text.clone() });
                }
            }
        }
        for (idx, entry) in self.entries.iter().enumerate() {
            for (row, result) in history_rows(entry).into_iter().enumerate() {
                if let Some(text) = result.copy {
                    targets.push(CopyTarget { pane: TargetPane::History(idx), row, text });
                }
            }
        }
        targets
    }

    fn move_copy_target(&mut self, delta: isize) {
        if self.tab == Tab::Inspect {
            if let Some(popup) = self.overlay.popup_mut() {
                popup.move_selection(delta);
                self.needs_redraw = true;
            }
            return;
        }

        let count = self.copy_targets().len();
        self.copy_cursor = match (count, self.copy_cursor) {
            (0, _) => None,
            (_, None) if delta < 0 => Some(count - 1),
            (_, None) => Some(0),
            (_, Some(idx)) => Some((idx as isize + delta).clamp(0, count as isize - 1) as usize),
        };
        self.copy_button = CopyButton::new();
        self.needs_redraw = true;
    }

    fn copy_selected(&mut self) {
        let now = Instant::now();
        if self.tab == Tab::Inspect {
            match self.overlay.popup_mut() {
                Some(popup) => {
                    if let Some(text) = popup.selected_copy_text().map(str::to_string) {
                        popup.copy.press(&text, self.clipboard.as_mut(), now);
                        self.needs_redraw = true;
                    }
                }
                None => self.set_status("✗ Move the cursor onto an epoch first", MessageType::Error, STATUS_ERROR_DURATION_MS),
            }
            return;
        }

        let targets = self.copy_targets();
        let idx = self.copy_cursor.unwrap_or(0);
        match targets.get(idx) {
            Some(target) => {
                self.copy_cursor = Some(idx);
                self.copy_button.press(&target.text, self.clipboard.as_mut(), now);
                self.needs_redraw = true;
            }
            None => self.set_status("✗ Nothing to copy", MessageType::Error, STATUS_ERROR_DURATION_MS),
        }
    }

    fn click(&mut self, pos: Position) {
        if self.overlay.is_visible() {
            if self.overlay.handle_click(pos).is_some() {
                self.copy_selected();
                return;
            }
            self.needs_redraw = true;
            // Border hit: keep the panel and swallow the click
            if self.overlay.is_visible() {
                return;
            }
        }

        if self.tab != Tab::Inspect {
            return;
        }
        let inner = self.layout().body_inner();
        if inner.contains(pos) {
            self.inspect.click(usize::from(pos.y - inner.y), usize::from(pos.x - inner.x));
            self.update_selection();
            self.needs_redraw = true;
        }
    }

    fn after_inspect_edit(&mut self) {
        let height = usize::from(self.layout().body_inner().height);
        self.inspect.ensure_visible(height);
        self.update_selection();
        self.needs_redraw = true;
    }

    /// Feed the epoch run under the cursor to the overlay
    fn update_selection(&mut self) {
        let inner = self.layout().body_inner();
        let selection = self.inspect.selection();
        let scroll = self.inspect.scroll();
        let anchored = selection.as_ref().and_then(|sel| {
            let visible_row = u16::try_from(sel.row.checked_sub(scroll)?).ok()?;
            let x = inner.x.checked_add(u16::try_from(sel.start_col).ok()?)?;
            let y = inner.y.checked_add(visible_row)?;
            let width = u16::try_from(sel.len).unwrap_or(u16::MAX);
            Some((sel.text.as_str(), Rect::new(x, y, width, 1)))
        });

        let outcome = self.overlay.handle_selection(anchored, self.viewport, &self.converter, &mut self.history);
        if outcome == SelectionOutcome::Shown {
            self.entries = self.history.load();
        }
    }

    fn form_lines(&self) -> (Vec<FieldLine>, String) {
        let focused = |idx: usize| self.field_focus == Some(idx);
        match self.tab {
            Tab::EpochToDate => {
                let hint = if self.epoch.auto_refresh() { "Following the clock · type to convert your own" } else { "Enter: convert · clear and leave the field to follow the clock" };
                (vec![FieldLine::input(self.epoch.field.label, &self.epoch.field.value, focused(0))], hint.to_string())
            }
            Tab::DateToEpoch => {
                let mut lines: Vec<FieldLine> = self
                    .date
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(idx, field)| FieldLine::input(field.label, &field.value, focused(idx)))
                    .collect();
                lines.push(FieldLine::toggle("Calendar", self.date.calendar.label(), focused(DATE_CALENDAR_FIELD)));
                let preset = match self.date.preset {
                    Some(TimePreset::StartOfDay) => "start of day",
                    Some(TimePreset::EndOfDay) => "end of day",
                    Some(TimePreset::Now) => "now",
                    None => "custom",
                };
                (lines, format!("Time: {} · Ctrl+B start · Ctrl+E end · Ctrl+N now", preset))
            }
            Tab::Relative => {
                let mut lines = vec![FieldLine::toggle("Direction", self.relative.direction.suffix(), focused(RELATIVE_DIRECTION_FIELD))];
                lines.extend(
                    self.relative
                        .fields
                        .iter()
                        .enumerate()
                        .map(|(idx, field)| FieldLine::input(field.label, &field.value, focused(idx + 1))),
                );
                (lines, "Enter: convert · ←/→ flips direction".to_string())
            }
            Tab::Inspect => (Vec::new(), String::new()),
        }
    }

    fn render_state(&self) -> RenderState<'_> {
        let (form, form_hint) = self.form_lines();
        let targets = self.copy_targets();
        let selected_target = self.copy_cursor.and_then(|idx| targets.get(idx)).map(|t| (t.pane, t.row));
        let history_times =
            self.entries.iter().map(|e| format_time_only_in(Some(e.converted_at.as_str()), self.converter.timezone())).collect();

        RenderState {
            tab: self.tab,
            palette: Palette::for_theme(self.theme.resolve(self.system_dark)),
            theme: self.theme,
            form,
            form_hint,
            form_rows: u16::try_from(self.form_len() + 1).unwrap_or(u16::MAX),
            result: self.current_result(),
            history: &self.entries,
            history_times,
            selected_target,
            copy_label: self.copy_button.label(),
            inspect: &self.inspect,
            overlay: self.overlay.popup(),
            status_message: self.status_message.as_ref(),
        }
    }
}
