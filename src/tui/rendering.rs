use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};

use super::app::{MessageType, ResultView, StatusMessage, Tab, TargetPane};
use super::inspect::InspectBuffer;
use super::layout::AppLayout;
use super::overlay::OverlayPopup;
use crate::conversion::{ResultRow, history_rows};
use crate::models::{HistoryEntry, ThemePreference};
use crate::theme::Palette;

/// Width of the label column in forms
const LABEL_WIDTH: usize = 10;

/// One form row as displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    pub label: &'static str,
    pub value: String,
    pub focused: bool,
    pub toggle: bool,
}

impl FieldLine {
    pub fn input(label: &'static str, value: &str, focused: bool) -> Self {
        Self { label, value: value.to_string(), focused, toggle: false }
    }

    pub fn toggle(label: &'static str, value: &str, focused: bool) -> Self {
        Self { label, value: value.to_string(), focused, toggle: true }
    }
}

/// Everything a frame needs, borrowed from the app
pub struct RenderState<'a> {
    pub tab: Tab,
    pub palette: Palette,
    pub theme: ThemePreference,
    pub form: Vec<FieldLine>,
    pub form_hint: String,
    pub form_rows: u16,
    pub result: Option<&'a ResultView>,
    pub history: &'a [HistoryEntry],
    /// `HH:MM:SS` per history entry
    pub history_times: Vec<String>,
    pub selected_target: Option<(TargetPane, usize)>,
    pub copy_label: &'static str,
    pub inspect: &'a InspectBuffer,
    pub overlay: Option<&'a OverlayPopup>,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area(), state.form_rows);
    let base = Style::default().fg(state.palette.text).bg(state.palette.background);
    frame.render_widget(Block::default().style(base), frame.area());

    render_tabs(frame, layout.tabs_area, state);
    if state.tab == Tab::Inspect {
        render_inspect(frame, layout.body_area, state);
    } else {
        render_form(frame, layout.form_area, state);
        render_results(frame, layout.results_area, state);
    }
    render_history(frame, layout.history_area, state);
    render_status_bar(frame, layout.status_area, state);

    if let Some(popup) = state.overlay {
        render_overlay(frame, popup, &state.palette);
    }
}

fn bordered<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default().borders(Borders::ALL).border_style(Style::default().fg(palette.muted)).title(title)
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &RenderState) {
    let palette = &state.palette;
    let titles = Tab::ALL.iter().map(|tab| format!(" {} ", tab.title()));
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .style(Style::default().fg(palette.muted))
        .highlight_style(Style::default().fg(palette.accent_text).bg(palette.accent).add_modifier(Modifier::BOLD))
        .divider("|");
    frame.render_widget(tabs, area);
}

fn render_form(frame: &mut Frame, area: Rect, state: &RenderState) {
    let palette = &state.palette;
    let mut lines: Vec<Line> = state
        .form
        .iter()
        .map(|field| {
            let label_style = if field.focused {
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };
            let value = if field.toggle { format!("‹ {} ›", field.value) } else { field.value.clone() };
            Line::from(vec![
                Span::styled(format!("{:<width$} ", field.label, width = LABEL_WIDTH), label_style),
                Span::styled(value, Style::default().fg(palette.text)),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(state.form_hint.clone(), Style::default().fg(palette.muted))));

    let title = format!(" {} ", state.tab.title());
    frame.render_widget(Paragraph::new(Text::from(lines)).block(bordered(&title, palette)), area);

    // Cursor at the end of the focused text input
    if let Some((idx, field)) = state.form.iter().enumerate().find(|(_, f)| f.focused && !f.toggle) {
        let x = area.x as usize + 1 + LABEL_WIDTH + 1 + field.value.chars().count();
        let y = area.y as usize + 1 + idx;
        if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y))
            && x < area.right()
            && y < area.bottom()
        {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

fn row_line<'a>(row: &ResultRow, selected: bool, copy_label: &str, palette: &Palette, indent: &'a str) -> Line<'a> {
    let value_style = if row.relative {
        Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC)
    } else {
        Style::default().fg(palette.text)
    };
    let mut spans = vec![
        Span::raw(indent),
        Span::styled(format!("{}: ", row.label), Style::default().fg(palette.muted)),
        Span::styled(row.value.clone(), value_style),
    ];
    if selected {
        spans.push(Span::styled(
            format!(" [{}]", copy_label),
            Style::default().fg(palette.accent_text).bg(palette.accent).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn render_results(frame: &mut Frame, area: Rect, state: &RenderState) {
    let palette = &state.palette;
    let content = match state.result {
        Some(ResultView::Rows(rows)) => {
            let lines: Vec<Line> = rows
                .iter()
                .enumerate()
                .map(|(idx, row)| {
                    let selected = state.selected_target == Some((TargetPane::Result, idx));
                    row_line(row, selected, state.copy_label, palette, "")
                })
                .collect();
            Text::from(lines)
        }
        Some(ResultView::Error(message)) => {
            Text::from(Line::from(Span::styled(message.clone(), Style::default().fg(palette.error))))
        }
        _ => Text::from(Line::from(Span::styled("Press Enter to convert", Style::default().fg(palette.muted)))),
    };

    frame.render_widget(Paragraph::new(content).block(bordered(" Result ", palette)), area);
}

fn render_history(frame: &mut Frame, area: Rect, state: &RenderState) {
    let palette = &state.palette;
    let mut lines: Vec<Line> = Vec::new();

    if state.history.is_empty() {
        lines.push(Line::from(Span::styled("No conversions yet.", Style::default().fg(palette.muted))));
    }
    for (idx, entry) in state.history.iter().enumerate() {
        let time = state.history_times.get(idx).map(String::as_str).unwrap_or("--:--:--");
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", time), Style::default().fg(palette.muted)),
            Span::styled(entry.headline(), Style::default().fg(palette.text).add_modifier(Modifier::BOLD)),
        ]));
        for (row_idx, row) in history_rows(entry).iter().enumerate() {
            let selected = state.selected_target == Some((TargetPane::History(idx), row_idx));
            lines.push(row_line(row, selected, state.copy_label, palette, "  "));
        }
    }

    let noun = if state.history.len() == 1 { "item" } else { "items" };
    let title = format!(" History ({} {}) ", state.history.len(), noun);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(bordered(&title, palette)), area);
}

fn render_inspect(frame: &mut Frame, area: Rect, state: &RenderState) {
    let palette = &state.palette;
    let buffer = state.inspect;
    let selection = buffer.selection();
    let height = usize::from(area.height.saturating_sub(2));

    let lines: Vec<Line> = buffer
        .lines()
        .enumerate()
        .skip(buffer.scroll())
        .take(height)
        .map(|(row, text)| match &selection {
            Some(sel) if sel.row == row => {
                let chars: Vec<char> = text.chars().collect();
                let before: String = chars[..sel.start_col].iter().collect();
                let run: String = chars[sel.start_col..sel.start_col + sel.len].iter().collect();
                let after: String = chars[sel.start_col + sel.len..].iter().collect();
                Line::from(vec![
                    Span::raw(before),
                    Span::styled(run, Style::default().fg(palette.accent).add_modifier(Modifier::UNDERLINED)),
                    Span::raw(after),
                ])
            }
            _ => Line::from(text),
        })
        .collect();

    frame.render_widget(Paragraph::new(Text::from(lines)).block(bordered(" Inspect ", palette)), area);

    let (row, col) = buffer.cursor();
    if let Some(visible_row) = row.checked_sub(buffer.scroll())
        && visible_row < height
        && let (Ok(x), Ok(y)) = (u16::try_from(area.x as usize + 1 + col), u16::try_from(area.y as usize + 1 + visible_row))
        && x < area.right()
    {
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn render_overlay(frame: &mut Frame, popup: &OverlayPopup, palette: &Palette) {
    let area = popup.area.intersection(frame.area());
    if area.is_empty() {
        return;
    }
    let lines: Vec<Line> = popup
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| row_line(row, idx == popup.selected_row && row.copy.is_some(), popup.copy.label(), palette, ""))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .title(" Epoch ")
        .style(Style::default().fg(palette.text).bg(palette.background));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let palette = &state.palette;
    let (status_text, style) = if let Some(msg) = state.status_message {
        let color = match msg.message_type {
            MessageType::Success => palette.success,
            MessageType::Error => palette.error,
        };
        (format!(" {} ", msg.text), Style::default().fg(color).bg(palette.background))
    } else {
        let mut parts = vec![format!("[{}]", state.theme)];
        match state.tab {
            Tab::Inspect => parts.push("Type or paste text, move onto an epoch".to_string()),
            _ => parts.push("↑/↓: field | Enter: convert".to_string()),
        }
        parts.push("Ctrl+↑/↓: pick | Ctrl+Y: copy".to_string());
        parts.push("Ctrl+L: clear history | Ctrl+T: theme".to_string());
        parts.push("Esc: back/quit".to_string());
        (format!(" {} ", parts.join(" | ")), Style::default().fg(palette.muted).bg(palette.background))
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::clipboard::CopyButton;
    use crate::models::{ResolvedTheme, Source};

    fn create_test_entry() -> HistoryEntry {
        HistoryEntry {
            source: Source::Epoch,
            input: "1700000000".to_string(),
            display: None,
            epoch_ms: 1_700_000_000_000,
            gmt: "2023-11-14 22:13:20.000".to_string(),
            local: "2023-11-14 23:13:20.000 (+01:00)".to_string(),
            relative: Some("0s from now".to_string()),
            converted_at: "2023-11-14T22:13:20.000Z".to_string(),
        }
    }

    fn create_state<'a>(tab: Tab, history: &'a [HistoryEntry], inspect: &'a InspectBuffer) -> RenderState<'a> {
        RenderState {
            tab,
            palette: Palette::for_theme(ResolvedTheme::Dark),
            theme: ThemePreference::System,
            form: vec![FieldLine::input("Epoch", "1700000000000", true)],
            form_hint: "Enter: convert".to_string(),
            form_rows: 2,
            result: None,
            history,
            history_times: history.iter().map(|_| "23:13:20".to_string()).collect(),
            selected_target: None,
            copy_label: "copy",
            inspect,
            overlay: None,
            status_message: None,
        }
    }

    fn draw(width: u16, height: u16, state: &RenderState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render_ui(f, state)).unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_render_empty_history() {
        let inspect = InspectBuffer::default();
        let screen = draw(100, 30, &create_state(Tab::EpochToDate, &[], &inspect));
        assert!(screen.contains("No conversions yet."));
        assert!(screen.contains("History (0 items)"));
        assert!(screen.contains("Press Enter to convert"));
    }

    #[test]
    fn test_render_history_entry() {
        let history = [create_test_entry()];
        let inspect = InspectBuffer::default();
        let screen = draw(120, 30, &create_state(Tab::EpochToDate, &history, &inspect));
        assert!(screen.contains("History (1 item)"));
        assert!(screen.contains("23:13:20 1700000000"));
        assert!(screen.contains("GMT: 2023-11-14 22:13:20.000"));
    }

    #[test]
    fn test_render_result_rows_with_selection() {
        let rows = vec![ResultRow {
            label: "Epoch (ms)",
            value: "1700000000000".to_string(),
            copy: Some("1700000000000".to_string()),
            relative: false,
        }];
        let result = ResultView::Rows(rows);
        let inspect = InspectBuffer::default();
        let mut state = create_state(Tab::EpochToDate, &[], &inspect);
        state.result = Some(&result);
        state.selected_target = Some((TargetPane::Result, 0));
        state.copy_label = "copied";

        let screen = draw(100, 30, &state);
        assert!(screen.contains("Epoch (ms): 1700000000000 [copied]"));
    }

    #[test]
    fn test_render_error_result() {
        let result = ResultView::Error("Enter a valid date (YYYY/MM/DD fields).".to_string());
        let inspect = InspectBuffer::default();
        let mut state = create_state(Tab::DateToEpoch, &[], &inspect);
        state.result = Some(&result);

        let screen = draw(100, 30, &state);
        assert!(screen.contains("Enter a valid date"));
    }

    #[test]
    fn test_render_inspect_with_overlay() {
        let inspect = InspectBuffer::new("created 1700000000");
        let popup = OverlayPopup {
            area: Rect::new(10, 4, 40, 6),
            rows: vec![ResultRow {
                label: "GMT",
                value: "2023-11-14 22:13:20.000".to_string(),
                copy: Some("2023-11-14 22:13:20.000".to_string()),
                relative: false,
            }],
            selected_row: 0,
            copy: CopyButton::new(),
        };
        let mut state = create_state(Tab::Inspect, &[], &inspect);
        state.overlay = Some(&popup);

        let screen = draw(100, 30, &state);
        assert!(screen.contains("created 1700000000"));
        assert!(screen.contains("GMT: 2023-11-14 22:13:20.000 [copy]"));
    }

    #[test]
    fn test_render_status_message() {
        let inspect = InspectBuffer::default();
        let message = StatusMessage {
            text: "✓ History cleared".to_string(),
            message_type: MessageType::Success,
            expires_at: Instant::now(),
        };
        let mut state = create_state(Tab::Relative, &[], &inspect);
        state.status_message = Some(&message);

        let screen = draw(100, 30, &state);
        assert!(screen.contains("History cleared"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let history = [create_test_entry()];
        let inspect = InspectBuffer::new("1700000000\n\n\n\n\n");
        draw(10, 4, &create_state(Tab::Inspect, &history, &inspect));
        draw(10, 4, &create_state(Tab::EpochToDate, &history, &inspect));
    }
}
