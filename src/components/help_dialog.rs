//! Help dialog component
//!
//! Lists the dashboard's keyboard and mouse bindings.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = centered_popup(area, 64, area.height.saturating_sub(4));
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Bindings grouped by what they act on
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Rows",
        &[
            ("j / ↓", "Next row"),
            ("k / ↑", "Previous row"),
            ("g / G", "First / last row"),
            ("Enter / Space", "Select or deselect the row"),
            ("click", "Select or deselect a row"),
        ],
    ),
    (
        "Columns",
        &[
            ("h / ←", "Previous column"),
            ("l / →", "Next column"),
            ("s", "Sort by column, again to reverse"),
            ("click header", "Sort by that column"),
        ],
    ),
    (
        "Tabs",
        &[
            ("Tab", "Next tab"),
            ("Shift+Tab", "Previous tab"),
            ("1-4", "Jump to tab"),
        ],
    ),
    (
        "Details",
        &[
            ("Ctrl+e / Ctrl+y", "Scroll details down / up"),
            ("PgDn / PgUp", "Page details down / up"),
            ("c", "Copy details aside"),
            ("x", "Clear copied details"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Edit the query for every tab"),
            ("Enter", "Apply"),
            ("Esc", "Cancel"),
            ("\"text\"", "Case-sensitive match"),
        ],
    ),
    (
        "Other",
        &[
            ("r", "Refresh every tab"),
            ("?", "Show this help"),
            ("q", "Quit"),
            ("Ctrl+c", "Quit without asking"),
        ],
    ),
];

fn build_help_content() -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    for (title, bindings) in SECTIONS {
        lines.push(Line::from(""));
        lines.push(Line::styled(format!("  {}", title), heading));
        lines.push(Line::styled(
            format!("  {}", "─".repeat(title.chars().count())),
            Style::default().fg(Color::DarkGray),
        ));
        lines.extend(bindings.iter().map(|(key, description)| {
            Line::from(vec![
                Span::styled(format!("  {:16}", key), key_style),
                Span::raw(description.to_string()),
            ])
        }));
    }

    lines.push(Line::from(""));
    lines.push(Line::styled(
        "  q / Esc / ? closes this window",
        Style::default().fg(Color::DarkGray),
    ));
    lines
}
