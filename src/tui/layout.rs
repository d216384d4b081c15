use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions for the popup
pub struct AppLayout {
    pub tabs_area: Rect,
    /// Left pane: the form on conversion tabs, the text buffer on Inspect
    pub body_area: Rect,
    pub form_area: Rect,
    pub results_area: Rect,
    pub history_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Create the layout:
    /// - Tabs bar: top row
    /// - Body: 60% width (form over results)
    /// - History pane: 40% width (right)
    /// - Status bar: bottom row
    pub fn new(area: Rect, form_rows: u16) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs bar
                Constraint::Min(3),    // Main area
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(vertical_chunks[1]);

        // Form rows plus borders
        let body_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(form_rows.saturating_add(2)), Constraint::Min(3)])
            .split(horizontal_chunks[0]);

        Self {
            tabs_area: vertical_chunks[0],
            body_area: horizontal_chunks[0],
            form_area: body_chunks[0],
            results_area: body_chunks[1],
            history_area: horizontal_chunks[1],
            status_area: vertical_chunks[2],
        }
    }

    /// Body area without its border
    pub fn body_inner(&self) -> Rect {
        Rect {
            x: self.body_area.x.saturating_add(1),
            y: self.body_area.y.saturating_add(1),
            width: self.body_area.width.saturating_sub(2),
            height: self.body_area.height.saturating_sub(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_correctly() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = AppLayout::new(area, 4);

        assert_eq!(layout.tabs_area.height, 1);
        assert_eq!(layout.tabs_area.y, 0);

        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 29);

        assert_eq!(layout.body_area.height, 28);
        assert_eq!(layout.body_area.width, 60);
        assert_eq!(layout.history_area.width, 40);

        // Form gets its rows plus borders, results take the rest
        assert_eq!(layout.form_area.height, 6);
        assert_eq!(layout.results_area.height, 22);
        assert_eq!(layout.results_area.y, 7);
    }

    #[test]
    fn test_body_inner_strips_border() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), 1);
        let inner = layout.body_inner();
        assert_eq!(inner, Rect::new(1, 2, 58, 26));
    }

    #[test]
    fn test_layout_minimum_height() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 5), 8);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.body_area.height, 3);
    }
}
