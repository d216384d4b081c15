//! Interactive popup: conversion tabs, history, and the Inspect overlay.

mod app;
mod events;
mod forms;
mod inspect;
mod layout;
pub mod overlay;
mod rendering;
mod terminal;

use anyhow::Result;
pub use app::{App, Tab};
use log::info;
pub use overlay::{OverlayController, SelectionOutcome, place_popup};
use terminal::TerminalManager;

use crate::conversion::Converter;
use crate::history::HistoryStore;
use crate::storage::Storage;
use crate::theme::ThemeStore;

/// Run the popup until the user quits.
///
/// `inspect_text` opens the Inspect tab with that text loaded.
pub fn run_interactive<S: Storage>(history: HistoryStore<S>, themes: ThemeStore<S>, inspect_text: Option<String>) -> Result<()> {
    let mut app = App::new(Converter::system(), history, themes);
    if let Some(text) = inspect_text {
        app = app.with_inspect_text(&text);
    }

    let mut manager = TerminalManager::new()?;
    info!("Popup started");
    let res = app.run(manager.terminal_mut());
    manager.restore()?;

    res
}
