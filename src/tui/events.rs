use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::forms::TimePreset;

/// Rows moved per mouse-wheel notch
const SCROLL_STEP: isize = 3;

/// User actions from keyboard, mouse, and terminal events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    Escape,
    NextTab,
    PrevTab,
    NextField,
    PrevField,
    CursorLeft,
    CursorRight,
    Submit,
    Input(char),
    DeleteChar,
    CopySelected,
    NextCopyTarget,
    PrevCopyTarget,
    ClearHistory,
    CycleTheme,
    Preset(TimePreset),
    Click { column: u16, row: u16 },
    Scroll(isize),
    Resize(u16, u16),
    None,
}

/// Poll for terminal events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if !event::poll(timeout)? {
        return Ok(Action::None);
    }
    let action = match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => key_to_action(key),
        Event::Mouse(mouse) => mouse_to_action(mouse),
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    };
    Ok(action)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Escape,

        // Tabs and fields
        (KeyCode::Tab, _) => Action::NextTab,
        (KeyCode::BackTab, _) => Action::PrevTab,
        (KeyCode::Up, KeyModifiers::CONTROL) => Action::PrevCopyTarget,
        (KeyCode::Down, KeyModifiers::CONTROL) => Action::NextCopyTarget,
        (KeyCode::Up, _) => Action::PrevField,
        (KeyCode::Down, _) => Action::NextField,
        (KeyCode::Left, _) => Action::CursorLeft,
        (KeyCode::Right, _) => Action::CursorRight,

        // Commands
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopySelected,
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => Action::ClearHistory,
        (KeyCode::Char('t'), KeyModifiers::CONTROL) => Action::CycleTheme,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::Preset(TimePreset::StartOfDay),
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => Action::Preset(TimePreset::EndOfDay),
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::Preset(TimePreset::Now),

        // Text input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => Action::Input(c),
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

fn mouse_to_action(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::Click { column: mouse.column, row: mouse.row },
        MouseEventKind::ScrollUp => Action::Scroll(-SCROLL_STEP),
        MouseEventKind::ScrollDown => Action::Scroll(SCROLL_STEP),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent { kind, column: 12, row: 4, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn test_quit_and_escape() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c), Action::Quit);

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(key_to_action(esc), Action::Escape);
    }

    #[test]
    fn test_tab_navigation() {
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(key_to_action(tab), Action::NextTab);

        let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(key_to_action(back_tab), Action::PrevTab);
    }

    #[test]
    fn test_field_and_copy_target_navigation() {
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(key_to_action(up), Action::PrevField);

        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(key_to_action(down), Action::NextField);

        let ctrl_up = KeyEvent::new(KeyCode::Up, KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_up), Action::PrevCopyTarget);

        let ctrl_down = KeyEvent::new(KeyCode::Down, KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_down), Action::NextCopyTarget);
    }

    #[test]
    fn test_command_keys() {
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(key_to_action(enter), Action::Submit);

        let ctrl_y = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_y), Action::CopySelected);

        let ctrl_l = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_l), Action::ClearHistory);

        let ctrl_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_t), Action::CycleTheme);
    }

    #[test]
    fn test_preset_keys() {
        let ctrl_b = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_b), Action::Preset(TimePreset::StartOfDay));

        let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_e), Action::Preset(TimePreset::EndOfDay));

        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_n), Action::Preset(TimePreset::Now));
    }

    #[test]
    fn test_text_input() {
        let digit = KeyEvent::new(KeyCode::Char('7'), KeyModifiers::NONE);
        assert_eq!(key_to_action(digit), Action::Input('7'));

        let upper = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(upper), Action::Input('A'));

        let backspace = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(key_to_action(backspace), Action::DeleteChar);
    }

    #[test]
    fn test_mouse_events() {
        assert_eq!(mouse_to_action(mouse(MouseEventKind::Down(MouseButton::Left))), Action::Click { column: 12, row: 4 });
        assert_eq!(mouse_to_action(mouse(MouseEventKind::ScrollUp)), Action::Scroll(-SCROLL_STEP));
        assert_eq!(mouse_to_action(mouse(MouseEventKind::ScrollDown)), Action::Scroll(SCROLL_STEP));
        assert_eq!(mouse_to_action(mouse(MouseEventKind::Moved)), Action::None);
    }

    #[test]
    fn test_unknown_key() {
        let unknown = KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(key_to_action(unknown), Action::None);
    }
}
