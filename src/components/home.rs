//! Home component - main dashboard screen
//!
//! Tab bar with shown/total badges, the search box, the active table, the
//! detail cards and the status and help lines. Owns tab and search state.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, DetailComponent, TableComponent};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub struct HomeComponent {
    /// Index of the active tab
    pub active_tab: usize,
    tab_count: usize,

    /// Whether the search box has focus
    pub search_mode: bool,
    /// Text being typed into the search box
    pub search_input: String,
    /// Query currently applied to every table
    pub search_query: String,
}

impl HomeComponent {
    pub fn new(tab_count: usize) -> Self {
        Self {
            active_tab: 0,
            tab_count,
            search_mode: false,
            search_input: String::new(),
            search_query: String::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────────────────────

    pub fn next_tab(&mut self) {
        if self.tab_count > 0 {
            self.active_tab = (self.active_tab + 1) % self.tab_count;
        }
    }

    pub fn prev_tab(&mut self) {
        if self.tab_count > 0 {
            self.active_tab = (self.active_tab + self.tab_count - 1) % self.tab_count;
        }
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.tab_count {
            self.active_tab = index;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
        self.search_input = self.search_query.clone();
    }

    pub fn search_input(&mut self, c: char) {
        self.search_input.push(c);
    }

    pub fn search_backspace(&mut self) {
        self.search_input.pop();
    }

    /// Leave search mode and return the query to apply
    pub fn apply_search(&mut self) -> String {
        self.search_mode = false;
        self.search_query = self.search_input.clone();
        self.search_query.clone()
    }

    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.search_input = self.search_query.clone();
    }
}

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            // Rows
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstRow),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastRow),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::SelectCursorRow),

            // Columns
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevColumn),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextColumn),
            KeyCode::Char('s') => Some(Action::SortCursorColumn),

            // Tabs
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .map(|d| Action::SelectTab(d as usize - 1)),

            // Detail cards
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollDown)
            }
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollUp)
            }
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('c') => Some(Action::CopyDetails),
            KeyCode::Char('x') => Some(Action::ClearCopied),

            KeyCode::Char('r') => Some(Action::RefreshAll),
            KeyCode::Char('/') => Some(Action::EnterSearchMode),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextTab => self.next_tab(),
            Action::PrevTab => self.prev_tab(),
            Action::SelectTab(index) => self.select_tab(index),
            Action::EnterSearchMode => self.enter_search_mode(),
            Action::SearchInput(c) => self.search_input(c),
            Action::SearchBackspace => self.search_backspace(),
            Action::CancelSearch => self.cancel_search(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_home_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    /// Menu labels with shown/total badges, in tab order
    pub tab_labels: &'a [String],
    pub refreshing: bool,
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
}

pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &HomeComponent,
    table: &mut TableComponent,
    detail: &mut DetailComponent,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area);

    render_tabs(frame, layout.tabs, home, ctx);
    render_search_box(frame, layout.search, home);
    table.draw(frame, layout.table)?;
    detail.draw_cards(frame, layout.details, layout.copied)?;
    render_status_bar(frame, layout.status, ctx);
    render_help_bar(frame, layout.help, home);

    Ok(())
}

fn render_tabs(frame: &mut Frame, area: Rect, home: &HomeComponent, ctx: &HomeRenderContext) {
    let titles: Vec<String> = ctx
        .tab_labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{} {}", i + 1, label))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(home.active_tab)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_search_box(frame: &mut Frame, area: Rect, home: &HomeComponent) {
    let (text, style) = if home.search_mode {
        (
            format!("{}█", home.search_input),
            Style::default().fg(Color::White),
        )
    } else if home.search_query.is_empty() {
        ("/ to search".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (home.search_query.clone(), Style::default().fg(Color::Cyan))
    };

    let border = if home.search_mode {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(text, style))).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let mut spans = vec![];

    if ctx.refreshing {
        spans.push(Span::styled(
            " Refreshing… ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(error) = ctx.error {
        spans.push(Span::styled(
            format!(" Error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn key_hint(key: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", key),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_help_bar(frame: &mut Frame, area: Rect, home: &HomeComponent) {
    let help_spans = if home.search_mode {
        vec![
            key_hint("Esc", Color::Yellow),
            Span::raw("Cancel  "),
            key_hint("Enter", Color::Green),
            Span::raw("Apply  "),
            Span::styled(
                "Quote the query for a case-sensitive match",
                Style::default().fg(Color::DarkGray),
            ),
        ]
    } else {
        vec![
            key_hint("q", Color::Yellow),
            Span::raw("Quit "),
            key_hint("r", Color::Green),
            Span::raw("Refresh "),
            key_hint("/", Color::Cyan),
            Span::raw("Search "),
            key_hint("s", Color::Cyan),
            Span::raw("Sort "),
            key_hint("Enter", Color::Cyan),
            Span::raw("Select "),
            key_hint("c", Color::Magenta),
            Span::raw("Copy "),
            key_hint("x", Color::Magenta),
            Span::raw("Clear "),
            key_hint("?", Color::White),
            Span::raw("Help"),
        ]
    };

    let paragraph = Paragraph::new(Line::from(help_spans))
        .alignment(ratatui::layout::Alignment::Left);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_tabs_wrap_around() {
        let mut home = HomeComponent::new(4);
        home.prev_tab();
        assert_eq!(home.active_tab, 3);
        home.next_tab();
        assert_eq!(home.active_tab, 0);
        home.select_tab(9);
        assert_eq!(home.active_tab, 0);
        home.select_tab(2);
        assert_eq!(home.active_tab, 2);
    }

    #[test]
    fn test_digit_keys_select_tabs() {
        let mut home = HomeComponent::new(4);
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('3'))).unwrap(),
            Some(Action::SelectTab(2))
        );
        assert_eq!(home.handle_key_event(key(KeyCode::Char('0'))).unwrap(), None);
    }

    #[test]
    fn test_ctrl_e_scrolls_but_plain_e_does_nothing() {
        let mut home = HomeComponent::new(4);
        let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(home.handle_key_event(ctrl_e).unwrap(), Some(Action::ScrollDown));
        assert_eq!(home.handle_key_event(key(KeyCode::Char('e'))).unwrap(), None);
    }

    #[test]
    fn test_cancel_restores_applied_query() {
        let mut home = HomeComponent::new(4);
        home.enter_search_mode();
        home.search_input('a');
        home.search_input('b');
        assert_eq!(home.apply_search(), "ab");

        home.enter_search_mode();
        assert_eq!(home.search_input, "ab");
        home.search_backspace();
        home.search_input('x');
        home.cancel_search();

        assert!(!home.search_mode);
        assert_eq!(home.search_query, "ab");
        assert_eq!(home.search_input, "ab");
    }
}
