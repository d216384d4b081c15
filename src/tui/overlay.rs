//! Floating conversion panel for epoch-looking selections in the Inspect tab.
//!
//! The panel sits next to the selection, flipping above it when there is no
//! room below and shifting left when it would run past the right edge. Any
//! click outside it, Esc, scrolling, or a resize dismisses it.

use chrono::TimeZone;
use log::debug;
use ratatui::layout::{Position, Rect};

use crate::clipboard::CopyButton;
use crate::conversion::{Converter, ResultRow};
use crate::history::HistoryStore;
use crate::parsers::looks_like_epoch;
use crate::storage::Storage;

/// Blank cells kept between the selection and the panel
const POPUP_GAP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Nothing selected; cache cleared and panel dismissed
    Cleared,
    /// Same text as last time; nothing changed
    Unchanged,
    /// Selection is not an epoch; panel dismissed
    NotEpoch,
    Shown,
}

#[derive(Debug, Clone)]
pub struct OverlayPopup {
    pub area: Rect,
    pub rows: Vec<ResultRow>,
    pub selected_row: usize,
    pub copy: CopyButton,
}

impl OverlayPopup {
    /// Row under a screen position inside the panel's border
    fn row_at(&self, pos: Position) -> Option<usize> {
        let inner_top = self.area.y + 1;
        if pos.y < inner_top {
            return None;
        }
        let idx = usize::from(pos.y - inner_top);
        (idx < self.rows.len()).then_some(idx)
    }

    pub fn selected_copy_text(&self) -> Option<&str> {
        self.rows.get(self.selected_row).and_then(|row| row.copy.as_deref())
    }

    /// Move the row cursor, skipping rows without a copy value
    pub fn move_selection(&mut self, delta: isize) {
        let copyable: Vec<usize> =
            self.rows.iter().enumerate().filter(|(_, r)| r.copy.is_some()).map(|(i, _)| i).collect();
        let Some(pos) = copyable.iter().position(|&i| i == self.selected_row) else {
            self.selected_row = copyable.first().copied().unwrap_or(0);
            return;
        };
        let next = (pos as isize + delta).clamp(0, copyable.len() as isize - 1) as usize;
        self.selected_row = copyable[next];
    }
}

/// Selection-triggered panel state for one Inspect view
#[derive(Debug, Default)]
pub struct OverlayController {
    popup: Option<OverlayPopup>,
    last_selection: String,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn popup(&self) -> Option<&OverlayPopup> {
        self.popup.as_ref()
    }

    pub fn popup_mut(&mut self) -> Option<&mut OverlayPopup> {
        self.popup.as_mut()
    }

    pub fn is_visible(&self) -> bool {
        self.popup.is_some()
    }

    pub fn dismiss(&mut self) {
        if self.popup.take().is_some() {
            debug!("Overlay dismissed");
        }
    }

    /// React to the current selection text and its on-screen anchor.
    ///
    /// An epoch selection shows the panel and is recorded in history.
    pub fn handle_selection<Tz: TimeZone, S: Storage>(
        &mut self,
        selection: Option<(&str, Rect)>,
        viewport: Rect,
        converter: &Converter<Tz>,
        history: &mut HistoryStore<S>,
    ) -> SelectionOutcome {
        let Some((text, anchor)) = selection.filter(|(text, _)| !text.is_empty()) else {
            self.last_selection.clear();
            self.dismiss();
            return SelectionOutcome::Cleared;
        };

        if text == self.last_selection {
            return SelectionOutcome::Unchanged;
        }
        self.last_selection = text.to_string();

        if !looks_like_epoch(text) {
            self.dismiss();
            return SelectionOutcome::NotEpoch;
        }
        let conversion = match converter.epoch_to_date(text) {
            Ok(conversion) => conversion,
            Err(e) => {
                debug!("Selection {:?} not convertible: {}", text, e);
                self.dismiss();
                return SelectionOutcome::NotEpoch;
            }
        };

        let (width, height) = popup_size(&conversion.rows);
        self.popup = Some(OverlayPopup {
            area: place_popup(anchor, width, height, viewport),
            selected_row: 0,
            rows: conversion.rows.clone(),
            copy: CopyButton::new(),
        });
        converter.record(history, &conversion);
        SelectionOutcome::Shown
    }

    /// Mouse press: dismiss when outside the panel, otherwise report the row hit
    pub fn handle_click(&mut self, pos: Position) -> Option<usize> {
        let popup = self.popup.as_mut()?;
        if !popup.area.contains(pos) {
            self.dismiss();
            return None;
        }
        let row = popup.row_at(pos)?;
        popup.selected_row = row;
        Some(row)
    }
}

/// Panel size for a set of rows: `Label: value [copied]` plus borders
pub fn popup_size(rows: &[ResultRow]) -> (u16, u16) {
    let content = rows
        .iter()
        .map(|row| row.label.len() + 2 + row.value.chars().count() + if row.copy.is_some() { 9 } else { 0 })
        .max()
        .unwrap_or(0);
    let width = u16::try_from(content + 4).unwrap_or(u16::MAX);
    let height = u16::try_from(rows.len() + 2).unwrap_or(u16::MAX);
    (width, height)
}

/// Position a `width` x `height` panel next to `anchor`, staying inside `viewport`
pub fn place_popup(anchor: Rect, width: u16, height: u16, viewport: Rect) -> Rect {
    let (w, h, gap) = (i32::from(width), i32::from(height), i32::from(POPUP_GAP));
    let (vx, vy) = (i32::from(viewport.x), i32::from(viewport.y));
    let (vright, vbottom) = (i32::from(viewport.right()), i32::from(viewport.bottom()));

    let fits_below = i32::from(anchor.bottom()) + gap + h <= vbottom;
    let fits_above = i32::from(anchor.top()) - gap - h >= vy;
    let top = if fits_below {
        i32::from(anchor.bottom()) + gap
    } else if fits_above {
        i32::from(anchor.top()) - gap - h
    } else {
        (vbottom - h - gap).max(vy + gap)
    };

    let fits_right = i32::from(anchor.left()) + w <= vright;
    let left = if fits_right { i32::from(anchor.left()) } else { (vright - w - gap).max(vx + gap) };

    let top = top.max(vy + gap).clamp(0, i32::from(u16::MAX)) as u16;
    let left = left.max(vx + gap).clamp(0, i32::from(u16::MAX)) as u16;
    Rect::new(left, top, width, height).intersection(viewport)
}
