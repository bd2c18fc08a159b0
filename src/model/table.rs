//! Table model - the filtered, capped and sorted projection of fetched rows
//!
//! The model owns every ingested row plus the list of rows currently shown.
//! Any change to rows, filter or sort rebuilds the shown list:
//!
//! 1. walk rows in ingestion order, keeping those the filter accepts,
//!    until `max_visible` rows are kept
//! 2. stable-sort the kept rows by the active column
//!
//! Filtering happens before the cap, so the cap counts matches only.

use super::field::{Cell, FieldSpec, WidthHint};
use super::search::{Predicate, RESERVED_PREFIX};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::debug;

/// Default cap on the number of shown rows
pub const DEFAULT_MAX_VISIBLE: usize = 100;

/// Placeholder shown when nothing matches
pub const NO_RESULTS_TEXT: &str = "No results found.";

/// One ingested backend record
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Identity key, unique for the lifetime of the model
    pub uid: u64,
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Column header as seen by the renderer; clicking it sorts by `column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub column: usize,
    pub title: String,
    pub width: WidthHint,
    pub length: u16,
    pub sort: Option<SortDirection>,
}

/// Shown row as seen by the renderer; clicking it selects `uid`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub uid: u64,
    pub cells: Vec<Cell>,
    pub selected: bool,
}

/// Extra line rendered after the rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailer {
    NoResults,
    Limited(usize),
}

impl Trailer {
    pub fn text(&self) -> String {
        match self {
            Trailer::NoResults => NO_RESULTS_TEXT.to_string(),
            Trailer::Limited(max) => format!("Limited to {} results.", max),
        }
    }
}

/// Declarative description of what a table currently displays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub trailer: Option<Trailer>,
}

/// Data set plus filter, sort, cap and selection state for one table
pub struct TableModel {
    fields: Vec<FieldSpec>,
    rows: Vec<Row>,
    /// Indices into `rows`
    shown_rows: Vec<usize>,
    filter: Option<Predicate>,
    sort_field: Option<usize>,
    reversed: bool,
    selected: Option<u64>,
    detail: String,
    total: usize,
    shown: usize,
    max_visible: usize,
    next_uid: u64,
    recomputes: usize,
}

impl TableModel {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            rows: Vec::new(),
            shown_rows: Vec::new(),
            filter: None,
            sort_field: None,
            reversed: false,
            selected: None,
            detail: String::new(),
            total: 0,
            shown: 0,
            max_visible: DEFAULT_MAX_VISIBLE,
            next_uid: 0,
            recomputes: 0,
        }
    }

    /// Set the shown-row cap (at least one row)
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible.max(1);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Ingest a snapshot, optionally dropping the current rows first
    pub fn set_rows(&mut self, rows: Vec<Value>, clear_first: bool) {
        if clear_first {
            self.clear();
        }
        for data in rows {
            self.rows.push(Row {
                uid: self.next_uid,
                data,
            });
            self.next_uid += 1;
            self.total += 1;
        }
        self.process();
    }

    /// Replace the filter; the same predicate again is a no-op
    pub fn set_filter(&mut self, predicate: Predicate) {
        if let Some(current) = &self.filter {
            if current.same(&predicate) {
                return;
            }
        }
        self.filter = Some(predicate);
        self.process();
    }

    /// Sort by `column`, reversing the direction if it is already the sort column
    pub fn set_sort(&mut self, column: usize) {
        if column >= self.fields.len() {
            return;
        }
        if self.sort_field == Some(column) {
            self.reversed = !self.reversed;
        } else {
            self.sort_field = Some(column);
            self.reversed = false;
        }
        self.process();
    }

    /// Select the row with identity `uid`, or deselect it if already selected
    pub fn select_row(&mut self, uid: u64) {
        if self.selected == Some(uid) {
            self.selected = None;
            self.detail.clear();
            return;
        }
        let Some(row) = self.rows.iter().find(|r| r.uid == uid) else {
            return;
        };
        self.detail = detail_json(&row.data);
        self.selected = Some(uid);
    }

    /// Forget all rows. Selection and detail text are kept.
    pub fn clear(&mut self) {
        self.total = 0;
        self.rows.clear();
        self.shown_rows.clear();
        self.shown = 0;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────────

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    /// Active sort column and whether it is reversed
    #[cfg(test)]
    pub fn sort(&self) -> (Option<usize>, bool) {
        (self.sort_field, self.reversed)
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    /// Pretty JSON of the selected row, or empty
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Shown rows in display order
    pub fn shown_rows(&self) -> impl Iterator<Item = &Row> {
        self.shown_rows.iter().map(|&i| &self.rows[i])
    }

    #[cfg(test)]
    pub(crate) fn recomputes(&self) -> usize {
        self.recomputes
    }

    pub fn view(&self) -> TableView {
        let headers = self
            .fields
            .iter()
            .enumerate()
            .map(|(column, field)| HeaderView {
                column,
                title: field.title.clone(),
                width: field.width,
                length: field.length,
                sort: (self.sort_field == Some(column)).then_some(if self.reversed {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                }),
            })
            .collect();

        let rows = self
            .shown_rows()
            .map(|row| RowView {
                uid: row.uid,
                cells: self.fields.iter().map(|f| f.cell(&row.data)).collect(),
                selected: self.selected == Some(row.uid),
            })
            .collect();

        let trailer = if self.shown == 0 {
            Some(Trailer::NoResults)
        } else if self.shown >= self.max_visible {
            Some(Trailer::Limited(self.max_visible))
        } else {
            None
        };

        TableView {
            headers,
            rows,
            trailer,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Projection
    // ─────────────────────────────────────────────────────────────────────────

    fn process(&mut self) {
        self.recomputes += 1;
        self.shown_rows.clear();
        self.shown = 0;

        for (index, row) in self.rows.iter().enumerate() {
            if self.shown >= self.max_visible {
                break;
            }
            if let Some(filter) = &self.filter {
                if !filter.matches(&row.data) {
                    continue;
                }
            }
            self.shown_rows.push(index);
            self.shown += 1;
        }

        self.sort_shown();
        debug!(total = self.total, shown = self.shown, "table projection rebuilt");
    }

    fn sort_shown(&mut self) {
        let Some(field) = self.sort_field.and_then(|c| self.fields.get(c)) else {
            return;
        };
        let reversed = self.reversed;

        let mut keyed: Vec<(Value, usize)> = self
            .shown_rows
            .iter()
            .map(|&i| (field.value(&self.rows[i].data), i))
            .collect();

        // Reverse the comparator, not the result, so ties keep ingestion order
        keyed.sort_by(|a, b| {
            let ord = compare_values(&a.0, &b.0);
            if reversed {
                ord.reverse()
            } else {
                ord
            }
        });

        self.shown_rows = keyed.into_iter().map(|(_, i)| i).collect();
    }
}

/// Total order over JSON values: null < bool < number < string < array < object
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(p, q)| compare_values(p, q))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Pretty-print a row with every reserved key removed, at any depth
pub fn detail_json(value: &Value) -> String {
    serde_json::to_string_pretty(&strip_reserved(value)).unwrap_or_default()
}

fn strip_reserved(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !key.starts_with(RESERVED_PREFIX))
                .map(|(key, v)| (key.clone(), strip_reserved(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_reserved).collect()),
        other => other.clone(),
    }
}
