//! Editable text buffer for the Inspect tab.
//!
//! The "selection" is the run of epoch characters (digits, `,` and `_`) under
//! or immediately before the cursor.

/// Characters that can be part of an epoch token
fn is_epoch_char(c: char) -> bool {
    c.is_ascii_digit() || c == ',' || c == '_'
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub text: String,
    pub row: usize,
    pub start_col: usize,
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct InspectBuffer {
    lines: Vec<Vec<char>>,
    row: usize,
    col: usize,
    scroll: usize,
}

impl Default for InspectBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl InspectBuffer {
    pub fn new(text: &str) -> Self {
        let mut lines: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
        if lines.is_empty() {
            lines.push(Vec::new());
        }
        Self { lines, row: 0, col: 0, scroll: 0 }
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().map(|l| l.iter().collect())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn current_len(&self) -> usize {
        self.lines[self.row].len()
    }

    pub fn insert_char(&mut self, c: char) {
        let col = self.col;
        self.lines[self.row].insert(col, c);
        self.col += 1;
    }

    pub fn newline(&mut self) {
        let rest = self.lines[self.row].split_off(self.col);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let col = self.col;
            self.lines[self.row].remove(col);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.current_len();
            self.lines[self.row].extend(line);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.current_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.current_len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.current_len());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.current_len());
        }
    }

    /// Place the cursor at a position relative to the visible text
    pub fn click(&mut self, visible_row: usize, col: usize) {
        self.row = (self.scroll + visible_row).min(self.lines.len() - 1);
        self.col = col.min(self.current_len());
    }

    /// Scroll by `delta` lines; returns true when the view moved
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let max = self.lines.len().saturating_sub(1) as isize;
        let next = (self.scroll as isize + delta).clamp(0, max) as usize;
        let moved = next != self.scroll;
        self.scroll = next;
        moved
    }

    /// Keep the cursor row inside a view `height` rows tall
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }
    }

    /// Epoch-character run under the cursor (or ending just before it)
    pub fn selection(&self) -> Option<Selection> {
        let line = &self.lines[self.row];
        let at = if self.col < line.len() && is_epoch_char(line[self.col]) {
            self.col
        } else if self.col > 0 && is_epoch_char(line[self.col - 1]) {
            self.col - 1
        } else {
            return None;
        };

        let start = line[..at].iter().rposition(|&c| !is_epoch_char(c)).map_or(0, |i| i + 1);
        let end = line[at..].iter().position(|&c| !is_epoch_char(c)).map_or(line.len(), |i| at + i);
        Some(Selection { text: line[start..end].iter().collect(), row: self.row, start_col: start, len: end - start })
    }
}
