//! Table component for resource data
//!
//! Renders a `TableView` as aligned columns with a header row, a
//! separator and one line per shown row. Keeps a row and column cursor
//! and remembers where it drew headers and rows so mouse clicks can be
//! mapped back to sort and select actions.

use crate::action::Action;
use crate::component::Component;
use crate::model::field::{Cell, WidthHint};
use crate::model::table::{RowView, TableView};
use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Fixed columns grow to their content up to this width
const FIXED_MAX: usize = 28;
/// Fill columns never shrink below this width
const FILL_MIN: usize = 8;
/// Cursor and selection markers before each row
const GUTTER: usize = 2;
const SEPARATOR: &str = " │ ";
const SEPARATOR_WIDTH: usize = 3;

/// Screen geometry from the last draw
#[derive(Debug, Default, Clone)]
struct HitMap {
    area: Rect,
    header_y: Option<u16>,
    /// (start x, width) per column
    columns: Vec<(u16, u16)>,
    body_y: u16,
    /// Row uids in drawn order
    rows: Vec<u64>,
}

pub struct TableComponent {
    title: String,
    view: TableView,
    cursor_row: usize,
    cursor_col: usize,
    scroll: usize,
    hits: HitMap,
}

impl TableComponent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            view: TableView::default(),
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
            hits: HitMap::default(),
        }
    }

    /// Replace the displayed view, keeping the cursors in range
    pub fn set_view(&mut self, view: TableView) {
        self.view = view;
        self.cursor_row = self.cursor_row.min(self.view.rows.len().saturating_sub(1));
        self.cursor_col = self.cursor_col.min(self.view.headers.len().saturating_sub(1));
    }

    #[cfg(test)]
    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    #[cfg(test)]
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    pub fn cursor_cell(&self) -> Option<&Cell> {
        self.view
            .rows
            .get(self.cursor_row)
            .and_then(|row| row.cells.get(self.cursor_col))
    }

    /// Body lines: the rows plus the trailer
    fn body_len(&self) -> usize {
        self.view.rows.len() + usize::from(self.view.trailer.is_some())
    }

    fn ensure_cursor_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        // the trailer comes into view with the last row
        let last_row = self.view.rows.len().saturating_sub(1);
        let bottom = if self.cursor_row >= last_row && height > 1 {
            self.body_len().saturating_sub(1)
        } else {
            self.cursor_row
        };
        if self.cursor_row < self.scroll {
            self.scroll = self.cursor_row;
        } else if bottom >= self.scroll + height {
            self.scroll = bottom + 1 - height;
        }
        self.scroll = self.scroll.min(self.body_len().saturating_sub(height));
    }

    fn header_line(&self, widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::raw(" ".repeat(GUTTER))];
        for (i, header) in self.view.headers.iter().enumerate() {
            let mut text = header.title.clone();
            if let Some(direction) = header.sort {
                text.push(' ');
                text.push_str(direction.arrow());
            }

            let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
            if header.sort.is_some() {
                style = style.fg(Color::Yellow);
            }
            if i == self.cursor_col {
                style = style.add_modifier(Modifier::UNDERLINED);
            }

            if i > 0 {
                spans.push(Span::raw(SEPARATOR));
            }
            spans.push(Span::styled(fit(&text, widths[i]), style));
        }
        Line::from(spans)
    }

    fn row_line(&self, index: usize, row: &RowView, widths: &[usize]) -> Line<'static> {
        let is_cursor = index == self.cursor_row;
        let gutter = format!(
            "{}{}",
            if is_cursor { "▶" } else { " " },
            if row.selected { "●" } else { " " }
        );

        let mut style = Style::default().fg(Color::White);
        if row.selected {
            style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
        }
        if is_cursor {
            style = style.bg(Color::DarkGray);
        }

        let mut spans = vec![Span::styled(gutter, style)];
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(SEPARATOR, style));
            }
            let text = row.cells.get(i).map(|c| c.short.as_str()).unwrap_or("");
            spans.push(Span::styled(fit(text, *width), style));
        }
        Line::from(spans)
    }
}

impl Component for TableComponent {
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let (x, y) = (mouse.column, mouse.row);
        let area = self.hits.area;
        if x < area.x || x >= area.x + area.width || y < area.y || y >= area.y + area.height {
            return Ok(None);
        }

        if self.hits.header_y == Some(y) {
            let column = self
                .hits
                .columns
                .iter()
                .position(|&(start, width)| x >= start && x < start + width);
            if let Some(column) = column {
                self.cursor_col = column;
                return Ok(Some(Action::SortBy(column)));
            }
            return Ok(None);
        }

        if y >= self.hits.body_y {
            let offset = (y - self.hits.body_y) as usize;
            if let Some(&uid) = self.hits.rows.get(offset) {
                self.cursor_row = self.scroll + offset;
                return Ok(Some(Action::SelectRow(uid)));
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let last_row = self.view.rows.len().saturating_sub(1);
        let last_col = self.view.headers.len().saturating_sub(1);
        match action {
            Action::NextRow => self.cursor_row = (self.cursor_row + 1).min(last_row),
            Action::PrevRow => self.cursor_row = self.cursor_row.saturating_sub(1),
            Action::FirstRow => self.cursor_row = 0,
            Action::LastRow => self.cursor_row = last_row,
            Action::NextColumn => self.cursor_col = (self.cursor_col + 1).min(last_col),
            Action::PrevColumn => self.cursor_col = self.cursor_col.saturating_sub(1),
            Action::SortCursorColumn if !self.view.headers.is_empty() => {
                return Ok(Some(Action::SortBy(self.cursor_col)));
            }
            Action::SelectCursorRow => {
                return Ok(self
                    .view
                    .rows
                    .get(self.cursor_row)
                    .map(|row| Action::SelectRow(row.uid)));
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(Color::DarkGray));
        // full text of the cell under the cursors
        if let Some(cell) = self.cursor_cell().filter(|c| !c.full.is_empty()) {
            let room = (area.width as usize).saturating_sub(4);
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {} ", fit(&cell.full, room).trim_end()),
                Style::default().fg(Color::Gray),
            )));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let widths = column_widths(&self.view, inner.width as usize);
        let body_height = (inner.height as usize).saturating_sub(2);
        self.ensure_cursor_visible(body_height);

        let mut lines = vec![self.header_line(&widths), separator_line(&widths)];
        let mut drawn = Vec::new();
        for (index, row) in self
            .view
            .rows
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(body_height)
        {
            lines.push(self.row_line(index, row, &widths));
            drawn.push(row.uid);
        }
        if drawn.len() < body_height {
            if let Some(trailer) = self.view.trailer {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", " ".repeat(GUTTER), trailer.text()),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
        }
        frame.render_widget(Paragraph::new(lines), inner);

        let mut x = inner.x + GUTTER as u16;
        let mut columns = Vec::with_capacity(widths.len());
        for width in &widths {
            columns.push((x, *width as u16));
            x = x.saturating_add(*width as u16 + SEPARATOR_WIDTH as u16);
        }
        self.hits = HitMap {
            area: inner,
            header_y: (inner.height > 0).then_some(inner.y),
            columns,
            body_y: inner.y + 2,
            rows: drawn,
        };

        let total = self.body_len();
        if body_height > 0 && total > body_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(body_height)).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Display widths per column for a table `available` cells wide
///
/// Fixed columns take the widest of their title, their preferred length and
/// their content, capped at `FIXED_MAX`. Fill columns split what is left.
pub fn column_widths(view: &TableView, available: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = view
        .headers
        .iter()
        .map(|header| {
            // room for the sort arrow
            let title = header.title.width() + 2;
            match header.width {
                WidthHint::Fixed => {
                    let longest = view
                        .rows
                        .iter()
                        .filter_map(|row| row.cells.get(header.column))
                        .map(|cell| cell.short.width())
                        .max()
                        .unwrap_or(0);
                    longest
                        .max(header.length as usize)
                        .min(FIXED_MAX)
                        .max(title)
                }
                WidthHint::Fill => 0,
            }
        })
        .collect();

    let fills = view
        .headers
        .iter()
        .filter(|h| h.width == WidthHint::Fill)
        .count();
    if fills == 0 {
        return widths;
    }

    let used = widths.iter().sum::<usize>()
        + SEPARATOR_WIDTH * view.headers.len().saturating_sub(1)
        + GUTTER;
    let remaining = available.saturating_sub(used);
    let share = remaining / fills;
    let (share, mut extra) = if share < FILL_MIN {
        (FILL_MIN, 0)
    } else {
        (share, remaining - share * fills)
    };

    for (width, header) in widths.iter_mut().zip(&view.headers) {
        if header.width == WidthHint::Fill {
            *width = share;
            if extra > 0 {
                *width += 1;
                extra -= 1;
            }
        }
    }
    widths
}

fn separator_line(widths: &[usize]) -> Line<'static> {
    let separator = widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    Line::from(Span::styled(
        format!("{}{}", " ".repeat(GUTTER), separator),
        Style::default().fg(Color::DarkGray),
    ))
}

/// Pad or truncate `text` to exactly `width` display cells
fn fit(text: &str, width: usize) -> String {
    let text: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
