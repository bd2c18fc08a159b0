//! Root application component
//!
//! The App owns one tab per backend resource and coordinates them: a
//! refresh fans out to every tab, a search query is compiled once and
//! handed to every table. Event handling and rendering are delegated to
//! child components.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_home_screen, DetailComponent, HelpDialog, HomeComponent, HomeRenderContext, QuitDialog,
    TableComponent,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::resource::Resource;
use crate::model::search::{compile, Predicate};
use crate::model::tab::Tab;
use crate::services::{Backend, FetchTicket, ResourceFetcher};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Handle for one fan-out refresh: the tickets of every tab, in tab order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket(pub Vec<FetchTicket>);

/// Main application state - coordinates between tabs and components
pub struct App {
    pub tabs: Vec<Tab>,
    pub modals: ModalStack,
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,
    /// Status message to display
    pub status_message: Option<String>,

    /// Fan-out still in flight
    refresh: Option<RefreshTicket>,
    /// Tickets of the last fan-out that issued requests
    last_tickets: Option<RefreshTicket>,
    refresh_failed: bool,
    auto_refresh: Option<Duration>,
    last_refresh: Option<Instant>,
    /// Last compiled query, reused while the query text is unchanged
    search: Option<(String, Predicate)>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub home: HomeComponent,
    /// One table component per tab, in tab order
    tables: Vec<TableComponent>,
    pub detail: DetailComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

impl App {
    pub fn new(config: &Config, backend: Arc<dyn Backend>) -> App {
        let tabs: Vec<Tab> = Resource::all()
            .into_iter()
            .map(|resource| {
                let fetcher = ResourceFetcher::new(resource, Arc::clone(&backend))
                    .with_interval(config.refresh_interval());
                Tab::new(fetcher, config.max_visible)
            })
            .collect();
        let tables = tabs.iter().map(|t| TableComponent::new(t.title())).collect();

        App {
            home: HomeComponent::new(tabs.len()),
            tabs,
            modals: ModalStack::new(),
            should_quit: false,
            error: None,
            status_message: None,
            refresh: None,
            last_tickets: None,
            refresh_failed: false,
            auto_refresh: config.auto_refresh(),
            last_refresh: None,
            search: None,
            tables,
            detail: DetailComponent::new(),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dashboard operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Refresh every tab
    ///
    /// While a previous fan-out is still running the same ticket comes back
    /// and no new requests are made.
    pub fn refresh_all(&mut self) -> RefreshTicket {
        if let Some(ticket) = &self.refresh {
            debug!("refresh already in flight");
            return ticket.clone();
        }

        let ticket = RefreshTicket(self.tabs.iter_mut().map(|tab| tab.refresh()).collect());
        self.last_refresh = Some(Instant::now());
        // every tab is still inside its rate-limit interval
        if self.last_tickets.as_ref() == Some(&ticket) {
            debug!("refresh skipped, nothing requested");
            return ticket;
        }

        info!(tabs = ticket.0.len(), "refresh started");
        self.last_tickets = Some(ticket.clone());
        self.refresh = Some(ticket.clone());
        self.refresh_failed = false;
        self.error = None;
        self.status_message = Some("Refreshing…".to_string());
        ticket
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_some()
    }

    /// Filter every table with `query`
    pub fn search_all(&mut self, query: &str) {
        let predicate = match &self.search {
            Some((cached, predicate)) if cached == query => predicate.clone(),
            _ => {
                let predicate = compile(query);
                self.search = Some((query.to_string(), predicate.clone()));
                predicate
            }
        };

        debug!(query, "search applied");
        for tab in &mut self.tabs {
            tab.table_mut().set_filter(predicate.clone());
        }
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.home.active_tab]
    }

    /// Menu labels with shown/total badges
    pub fn tab_labels(&self) -> Vec<String> {
        self.tabs.iter().map(|tab| tab.menu_label()).collect()
    }

    /// Apply finished fetches and close the fan-out once every tab is idle
    fn poll_tabs(&mut self) {
        let mut failures = Vec::new();
        for tab in &mut self.tabs {
            if let Some(Err(e)) = tab.poll() {
                warn!(tab = tab.title(), error = %e, "refresh failed");
                failures.push(format!("{}: {}", tab.title(), e));
            }
        }
        if !failures.is_empty() {
            self.refresh_failed = true;
            self.error = Some(failures.join("; "));
        }

        if self.refresh.is_some() && self.tabs.iter().all(|tab| !tab.in_flight()) {
            self.refresh = None;
            if self.refresh_failed {
                self.status_message = None;
            } else {
                info!("refresh finished");
                self.status_message =
                    Some(format!("Refreshed at {}", Local::now().format("%H:%M:%S")));
            }
        }
    }

    fn auto_refresh_due(&self) -> bool {
        match (self.auto_refresh, self.last_refresh) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(period), Some(last)) => last.elapsed() >= period,
        }
    }

    fn sync_active_view(&mut self) {
        let active = self.home.active_tab;
        let tab = &self.tabs[active];
        self.tables[active].set_view(tab.table().view());
        self.detail
            .set_content(tab.table().detail(), tab.copied());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Key handling
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn handle_search_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter => Some(Action::ApplySearch),
            KeyCode::Esc => Some(Action::CancelSearch),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => {
                self.quit_dialog.refreshing = self.is_refreshing();
                self.quit_dialog.draw(frame, area)?;
            }
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.refresh_all();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else if self.home.search_mode {
            self.handle_search_key_event(key)
        } else {
            self.home.handle_key_event(key)
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if !self.modals.is_empty() || self.home.search_mode {
            return Ok(None);
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => Ok(Some(Action::NextRow)),
            MouseEventKind::ScrollUp => Ok(Some(Action::PrevRow)),
            _ => self.tables[self.home.active_tab].handle_mouse_event(mouse),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.poll_tabs();
                if self.refresh.is_none() && self.auto_refresh_due() {
                    self.refresh_all();
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Tabs (delegate to HomeComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextTab | Action::PrevTab | Action::SelectTab(_) => {
                self.home.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Table cursor (delegate to the active TableComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextRow
            | Action::PrevRow
            | Action::FirstRow
            | Action::LastRow
            | Action::NextColumn
            | Action::PrevColumn
            | Action::SortCursorColumn
            | Action::SelectCursorRow => {
                self.sync_active_view();
                return self.tables[self.home.active_tab].update(action);
            }
            Action::SortBy(column) => {
                let active = self.home.active_tab;
                self.tabs[active].table_mut().set_sort(column);
            }
            Action::SelectRow(uid) => {
                let active = self.home.active_tab;
                self.tabs[active].table_mut().select_row(uid);
            }

            // ─────────────────────────────────────────────────────────────────
            // Detail cards
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                self.sync_active_view();
                self.detail.update(action)?;
            }
            Action::CopyDetails => {
                let active = self.home.active_tab;
                if self.active_tab().table().detail().is_empty() {
                    self.status_message = Some("Select a row first".to_string());
                } else {
                    self.tabs[active].copy_details();
                    self.status_message = Some("Details copied".to_string());
                }
            }
            Action::ClearCopied => {
                let active = self.home.active_tab;
                self.tabs[active].clear_copied();
            }

            Action::RefreshAll => {
                self.refresh_all();
            }

            // ─────────────────────────────────────────────────────────────────
            // Search
            // ─────────────────────────────────────────────────────────────────
            Action::EnterSearchMode
            | Action::SearchInput(_)
            | Action::SearchBackspace
            | Action::CancelSearch => {
                self.home.update(action)?;
            }
            Action::ApplySearch => {
                let query = self.home.apply_search();
                self.search_all(&query);
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.toggle(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(Modal::QuitConfirm) = self.modals.pop() {
                    self.should_quit = true;
                }
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.sync_active_view();

        let labels = self.tab_labels();
        let ctx = HomeRenderContext {
            tab_labels: &labels,
            refreshing: self.is_refreshing(),
            error: self.error.as_deref(),
            status_message: self.status_message.as_deref(),
        };

        let active = self.home.active_tab;
        draw_home_screen(
            frame,
            area,
            &self.home,
            &mut self.tables[active],
            &mut self.detail,
            &ctx,
        )?;

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}
