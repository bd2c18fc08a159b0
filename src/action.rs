//! Action enum - everything the dashboard can be asked to do
//!
//! Components translate key and mouse events into Actions; the App applies
//! them to state.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick: poll fetches, run auto-refresh
    Tick,
    Resize(u16, u16),
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────────────────────
    NextTab,
    PrevTab,
    /// Jump to the tab at this position
    SelectTab(usize),

    // ─────────────────────────────────────────────────────────────────────────
    // Table
    // ─────────────────────────────────────────────────────────────────────────
    NextRow,
    PrevRow,
    FirstRow,
    LastRow,
    NextColumn,
    PrevColumn,
    /// Sort by the column under the column cursor
    SortCursorColumn,
    /// Select (or deselect) the row under the row cursor
    SelectCursorRow,
    /// Sort by column index
    SortBy(usize),
    /// Select (or deselect) the row with this identity key
    SelectRow(u64),

    // ─────────────────────────────────────────────────────────────────────────
    // Details
    // ─────────────────────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    CopyDetails,
    ClearCopied,

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────
    RefreshAll,

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    EnterSearchMode,
    /// Leave search mode and apply the query to every tab
    ApplySearch,
    /// Leave search mode and restore the last applied query
    CancelSearch,
    SearchInput(char),
    SearchBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    CloseModal,
    ConfirmModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::SelectTab(i) => write!(f, "SelectTab({})", i),
            Action::SortBy(c) => write!(f, "SortBy({})", c),
            Action::SelectRow(uid) => write!(f, "SelectRow({})", uid),
            Action::SearchInput(c) => write!(f, "SearchInput('{}')", c),
            other => write!(f, "{:?}", other),
        }
    }
}
