//! Detail cards
//!
//! The Details card shows the selected row as pretty JSON; the Copied card
//! shows whatever the operator copied aside with `c`.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

const PAGE: usize = 20;

pub struct DetailComponent {
    detail: String,
    copied: String,
    /// Scroll offset of the Details card
    scroll: usize,
}

impl Default for DetailComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailComponent {
    pub fn new() -> Self {
        Self {
            detail: String::new(),
            copied: String::new(),
            scroll: 0,
        }
    }

    /// Update both cards. Scroll resets when the detail text changes.
    pub fn set_content(&mut self, detail: &str, copied: &str) {
        if self.detail != detail {
            self.detail = detail.to_string();
            self.scroll = 0;
        }
        if self.copied != copied {
            self.copied = copied.to_string();
        }
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Draw the Details card into `details` and the Copied card into `copied`
    pub fn draw_cards(&mut self, frame: &mut Frame, details: Rect, copied: Rect) -> Result<()> {
        self.draw(frame, details)?;

        let lines = if self.copied.is_empty() {
            vec![placeholder("Nothing copied yet.")]
        } else {
            self.copied.lines().map(highlight_json_line).collect()
        };
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Copied [x: clear] ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, copied);
        Ok(())
    }

    fn line_count(&self) -> usize {
        self.detail.lines().count()
    }
}

impl Component for DetailComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let max_scroll = self.line_count().saturating_sub(1);

        match action {
            Action::ScrollDown => {
                if self.scroll < max_scroll {
                    self.scroll += 1;
                }
            }
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            Action::PageDown => {
                self.scroll = (self.scroll + PAGE).min(max_scroll);
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(PAGE);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let visible_height = area.height.saturating_sub(2) as usize;

        let lines: Vec<Line> = if self.detail.is_empty() {
            vec![placeholder("Select a row to see its details.")]
        } else {
            self.detail.lines().map(highlight_json_line).collect()
        };

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Details [c: copy] ")
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, area);

        let total = self.line_count();
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);

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

fn placeholder(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

/// Color a line of pretty-printed JSON by token kind
fn highlight_json_line(line: &str) -> Line<'static> {
    let indent = line.len() - line.trim_start().len();
    let trimmed = line.trim_start();
    let indent_str = " ".repeat(indent);

    if let Some(rest) = trimmed.strip_prefix('"') {
        if let Some(end) = rest.find("\": ") {
            let key = &trimmed[..end + 2];
            let value = &rest[end + 3..];
            return Line::from(vec![
                Span::raw(indent_str),
                Span::styled(key.to_string(), Style::default().fg(Color::Cyan)),
                Span::styled(": ", Style::default().fg(Color::White)),
                value_span(value),
            ]);
        }
    }

    Line::from(vec![Span::raw(indent_str), value_span(trimmed)])
}

fn value_span(value: &str) -> Span<'static> {
    let color = if value.starts_with('"') {
        Color::Green
    } else if value.starts_with(['{', '}', '[', ']']) {
        Color::White
    } else {
        Color::Yellow
    };
    Span::styled(value.to_string(), Style::default().fg(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_splits_key_and_value() {
        let line = highlight_json_line("  \"host\": \"127.0.0.1\",");
        assert_eq!(line.spans.len(), 4);
        assert_eq!(line.spans[1].content, "\"host\"");
        assert_eq!(line.spans[3].content, "\"127.0.0.1\",");
        assert_eq!(line.spans[3].style.fg, Some(Color::Green));
    }

    #[test]
    fn test_highlight_plain_values() {
        let line = highlight_json_line("    42");
        assert_eq!(line.spans[1].style.fg, Some(Color::Yellow));
        let line = highlight_json_line("}");
        assert_eq!(line.spans[1].style.fg, Some(Color::White));
    }

    #[test]
    fn test_scroll_is_bounded_and_resets_on_new_detail() {
        let mut detail = DetailComponent::new();
        detail.set_content("{\n  \"a\": 1\n}", "");

        detail.update(Action::PageDown).unwrap();
        assert_eq!(detail.scroll(), 2);
        detail.update(Action::ScrollDown).unwrap();
        assert_eq!(detail.scroll(), 2);
        detail.update(Action::ScrollUp).unwrap();
        assert_eq!(detail.scroll(), 1);

        // same text keeps the offset
        detail.set_content("{\n  \"a\": 1\n}", "copied");
        assert_eq!(detail.scroll(), 1);

        detail.set_content("{}", "copied");
        assert_eq!(detail.scroll(), 0);
    }
}
