//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width reserved for the search box in the tab bar
const SEARCH_WIDTH: u16 = 36;

/// Main screen layout areas
pub struct MainLayout {
    pub tabs: Rect,
    pub search: Rect,
    pub table: Rect,
    pub details: Rect,
    pub copied: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Tab bar on top, table, then the two detail cards, status and help lines
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(55),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SEARCH_WIDTH)])
        .split(rows[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    MainLayout {
        tabs: top[0],
        search: top[1],
        table: rows[1],
        details: cards[0],
        copied: cards[1],
        status: rows[3],
        help: rows[4],
    }
}
