//! Theme preference persistence and terminal palettes.
//!
//! `system` follows the terminal's background signal (`COLORFGBG`); explicit
//! `light`/`dark` override it.

use std::env;

use log::warn;
use ratatui::style::Color;
use serde_json::Value;

use crate::models::{ResolvedTheme, ThemePreference};
use crate::storage::{Storage, THEME_KEY};

pub struct ThemeStore<S: Storage> {
    storage: S,
}

impl<S: Storage> ThemeStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored preference, `system` when absent, unreadable, or unknown
    pub fn load(&self) -> ThemePreference {
        match self.storage.get(THEME_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Ignoring unknown theme preference: {}", e);
                ThemePreference::System
            }),
            Ok(None) => ThemePreference::System,
            Err(e) => {
                warn!("Theme preference unavailable: {:#}", e);
                ThemePreference::System
            }
        }
    }

    pub fn save(&mut self, preference: ThemePreference) {
        if let Err(e) = self.storage.set(THEME_KEY, Value::String(preference.as_str().to_string()))
        {
            warn!("Failed to save theme preference: {:#}", e);
        }
    }
}

/// Interpret a `COLORFGBG` value (`"fg;bg"` or `"fg;default;bg"`)
fn colorfgbg_is_dark(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    // ANSI 0-6 and 8 are dark backgrounds; 7 and 9-15 are light
    Some(matches!(bg, 0..=6 | 8))
}

/// Whether the terminal reports a dark background; unknown counts as dark
pub fn detect_system_dark() -> bool {
    env::var("COLORFGBG").ok().and_then(|v| colorfgbg_is_dark(&v)).unwrap_or(true)
}

/// TUI colors for one resolved theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub accent_text: Color,
    pub error: Color,
    pub success: Color,
}

impl Palette {
    pub fn for_theme(theme: ResolvedTheme) -> Self {
        match theme {
            ResolvedTheme::Dark => Self {
                background: Color::Rgb(24, 24, 27),
                text: Color::Rgb(250, 250, 250),
                muted: Color::Rgb(113, 113, 122),
                accent: Color::Rgb(16, 185, 129),
                accent_text: Color::Rgb(250, 250, 250),
                error: Color::Rgb(239, 68, 68),
                success: Color::Rgb(52, 211, 153),
            },
            ResolvedTheme::Light => Self {
                background: Color::Rgb(250, 250, 250),
                text: Color::Rgb(24, 24, 27),
                muted: Color::Rgb(113, 113, 122),
                accent: Color::Rgb(5, 150, 105),
                accent_text: Color::Rgb(255, 255, 255),
                error: Color::Rgb(220, 38, 38),
                success: Color::Rgb(4, 120, 87),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_default_is_system() {
        let store = ThemeStore::new(MemoryStorage::new());
        assert_eq!(store.load(), ThemePreference::System);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = ThemeStore::new(MemoryStorage::new());
        store.save(ThemePreference::Dark);
        assert_eq!(store.load(), ThemePreference::Dark);
    }

    #[test]
    fn test_unknown_stored_value_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set(THEME_KEY, json!("sepia")).unwrap();
        assert_eq!(ThemeStore::new(storage).load(), ThemePreference::System);
    }

    #[test]
    fn test_colorfgbg_parsing() {
        assert_eq!(colorfgbg_is_dark("15;0"), Some(true));
        assert_eq!(colorfgbg_is_dark("0;15"), Some(false));
        assert_eq!(colorfgbg_is_dark("0;default;7"), Some(false));
        assert_eq!(colorfgbg_is_dark("garbage"), None);
    }

    #[test]
    fn test_palettes_differ() {
        let dark = Palette::for_theme(ResolvedTheme::Dark);
        let light = Palette::for_theme(ResolvedTheme::Light);
        assert_ne!(dark.background, light.background);
        assert_ne!(dark.text, light.text);
    }
}
