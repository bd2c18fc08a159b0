//! Dashboard tab: one resource table, its fetcher and the copied-details pane

use super::resource::Resource;
use super::table::TableModel;
use crate::error::FetchError;
use crate::services::fetcher::{FetchTicket, ResourceFetcher};
use tracing::info;

pub struct Tab {
    table: TableModel,
    fetcher: ResourceFetcher,
    /// Detail text the operator copied aside
    copied: String,
}

impl Tab {
    pub fn new(fetcher: ResourceFetcher, max_visible: usize) -> Self {
        let table = TableModel::new(fetcher.resource().fields()).with_max_visible(max_visible);
        Self {
            table,
            fetcher,
            copied: String::new(),
        }
    }

    pub fn resource(&self) -> Resource {
        self.fetcher.resource()
    }

    pub fn title(&self) -> &'static str {
        self.resource().title()
    }

    pub fn table(&self) -> &TableModel {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableModel {
        &mut self.table
    }

    /// Menu entry text with the shown/total badge
    pub fn menu_label(&self) -> String {
        format!("{} {}/{}", self.title(), self.table.shown(), self.table.total())
    }

    pub fn refresh(&mut self) -> FetchTicket {
        self.fetcher.refresh()
    }

    pub fn in_flight(&self) -> bool {
        self.fetcher.in_flight()
    }

    /// Apply a finished fetch. A failure keeps the last good snapshot.
    pub fn poll(&mut self) -> Option<Result<(), FetchError>> {
        let outcome = self.fetcher.poll()?;
        match outcome.result {
            Ok(rows) => {
                info!(tab = self.title(), ticket = ?outcome.ticket, rows = rows.len(), "snapshot applied");
                self.table.set_rows(rows, true);
                Some(Ok(()))
            }
            Err(e) => Some(Err(e)),
        }
    }

    pub fn copied(&self) -> &str {
        &self.copied
    }

    pub fn copy_details(&mut self) {
        self.copied = self.table.detail().to_string();
    }

    pub fn clear_copied(&mut self) {
        self.copied.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::fake::StaticBackend;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait(tab: &mut Tab) -> Result<(), FetchError> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = tab.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "fetch did not complete");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn relay_tab(backend: Arc<StaticBackend>) -> Tab {
        let fetcher =
            ResourceFetcher::new(Resource::Relays, backend).with_interval(Duration::ZERO);
        Tab::new(fetcher, 100)
    }

    #[test]
    fn test_refresh_replaces_snapshot() {
        let backend = Arc::new(StaticBackend::new().with(
            "/relay",
            json!({"1": {"name": "alpha"}, "2": {"name": "beta"}}),
        ));
        let mut tab = relay_tab(backend.clone());
        assert_eq!(tab.menu_label(), "Relays 0/0");

        tab.refresh();
        wait(&mut tab).unwrap();
        assert_eq!(tab.menu_label(), "Relays 2/2");

        backend.set("/relay", json!({"3": {"name": "gamma"}}));
        tab.refresh();
        wait(&mut tab).unwrap();
        assert_eq!(tab.table().total(), 1);
        let names: Vec<_> = tab.table().shown_rows().map(|r| r.data["name"].clone()).collect();
        assert_eq!(names, vec![json!("gamma")]);
    }

    #[test]
    fn test_failed_refresh_keeps_last_snapshot() {
        let backend = Arc::new(StaticBackend::new().with("/relay", json!({"1": {"name": "alpha"}})));
        let mut tab = relay_tab(backend.clone());
        tab.refresh();
        wait(&mut tab).unwrap();

        backend.fail(true);
        tab.refresh();
        assert!(wait(&mut tab).is_err());
        assert_eq!(tab.table().total(), 1);
        assert_eq!(tab.table().shown(), 1);
    }

    #[test]
    fn test_copy_and_clear_details() {
        let backend = Arc::new(StaticBackend::new());
        let mut tab = relay_tab(backend);
        tab.table_mut().set_rows(vec![json!({"name": "alpha"})], true);

        tab.copy_details();
        assert_eq!(tab.copied(), "");

        tab.table_mut().select_row(0);
        tab.copy_details();
        assert!(tab.copied().contains("alpha"));

        tab.table_mut().select_row(0);
        assert_eq!(tab.table().detail(), "");
        assert!(tab.copied().contains("alpha"));

        tab.clear_copied();
        assert_eq!(tab.copied(), "");
    }
}
