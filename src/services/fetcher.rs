//! Rate-limited background fetching of one resource
//!
//! Each fetch runs on its own thread and reports back over a channel that
//! the UI polls on every tick. A `refresh` issued while a fetch is in
//! flight, or within `interval` of the previous one, returns the ticket of
//! that earlier fetch instead of starting a new request.

use crate::error::FetchError;
use crate::model::resource::Resource;
use crate::services::client::Backend;
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Minimum time between two requests for the same resource
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Identifies one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

/// A finished fetch
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Value>, FetchError>,
}

struct PendingFetch {
    ticket: FetchTicket,
    receiver: Receiver<Result<Vec<Value>, FetchError>>,
    started: Instant,
}

/// Fetches snapshots of one resource from the shared backend
pub struct ResourceFetcher {
    resource: Resource,
    backend: Arc<dyn Backend>,
    interval: Duration,
    pending: Option<PendingFetch>,
    /// Most recently issued ticket and when it was issued
    last: Option<(FetchTicket, Instant)>,
    issued: u64,
}

impl ResourceFetcher {
    pub fn new(resource: Resource, backend: Arc<dyn Backend>) -> Self {
        Self {
            resource,
            backend,
            interval: DEFAULT_INTERVAL,
            pending: None,
            last: None,
            issued: 0,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a fetch, or return the ticket of the one still in effect
    pub fn refresh(&mut self) -> FetchTicket {
        if let Some((ticket, called)) = self.last {
            if self.pending.is_some() || called.elapsed() < self.interval {
                debug!(resource = ?self.resource, "refresh coalesced");
                return ticket;
            }
        }

        let ticket = FetchTicket(self.issued);
        self.issued += 1;

        let (tx, rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        let resource = self.resource;
        thread::spawn(move || {
            let result = backend
                .get_json(resource.path())
                .and_then(|body| resource.parse(body));
            let _ = tx.send(result);
        });

        debug!(resource = ?self.resource, ?ticket, "fetch issued");
        let now = Instant::now();
        self.pending = Some(PendingFetch {
            ticket,
            receiver: rx,
            started: now,
        });
        self.last = Some((ticket, now));
        ticket
    }

    /// Collect the in-flight fetch if it has finished
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        let result = match self.pending.as_ref()?.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(FetchError::Disconnected),
        };
        let pending = self.pending.take()?;

        match &result {
            Ok(rows) => debug!(
                resource = ?self.resource,
                rows = rows.len(),
                elapsed_ms = pending.started.elapsed().as_millis() as u64,
                "fetch finished"
            ),
            Err(e) => warn!(resource = ?self.resource, error = %e, "fetch failed"),
        }

        Some(FetchOutcome {
            ticket: pending.ticket,
            result,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::client::fake::StaticBackend;
    use serde_json::json;

    /// Poll until the in-flight fetch completes
    pub(crate) fn wait(fetcher: &mut ResourceFetcher) -> FetchOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = fetcher.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "fetch did not complete");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn errors_backend() -> Arc<StaticBackend> {
        Arc::new(StaticBackend::new().with(
            "/errors",
            json!({"data": [{"title": "a"}, {"title": "b"}]}),
        ))
    }

    #[test]
    fn test_fetch_delivers_rows() {
        let backend = errors_backend();
        let mut fetcher = ResourceFetcher::new(Resource::Errors, backend.clone());
        assert!(fetcher.poll().is_none());

        let ticket = fetcher.refresh();
        assert!(fetcher.in_flight());

        let outcome = wait(&mut fetcher);
        assert_eq!(outcome.ticket, ticket);
        assert_eq!(outcome.result.unwrap().len(), 2);
        assert!(!fetcher.in_flight());
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_refresh_within_interval_is_coalesced() {
        let backend = errors_backend();
        let mut fetcher = ResourceFetcher::new(Resource::Errors, backend.clone())
            .with_interval(Duration::from_secs(60));

        let first = fetcher.refresh();
        wait(&mut fetcher);

        let second = fetcher.refresh();
        assert_eq!(first, second);
        assert!(!fetcher.in_flight());
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_refresh_while_in_flight_is_coalesced() {
        let backend = Arc::new(
            StaticBackend::new()
                .with("/blob", json!({"data": []}))
                .with_delay(Duration::from_millis(100)),
        );
        let mut fetcher =
            ResourceFetcher::new(Resource::Blobs, backend.clone()).with_interval(Duration::ZERO);

        let first = fetcher.refresh();
        let second = fetcher.refresh();
        assert_eq!(first, second);

        wait(&mut fetcher);
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_refresh_after_interval_issues_new_fetch() {
        let backend = errors_backend();
        let mut fetcher =
            ResourceFetcher::new(Resource::Errors, backend.clone()).with_interval(Duration::ZERO);

        let first = fetcher.refresh();
        wait(&mut fetcher);
        let second = fetcher.refresh();
        wait(&mut fetcher);

        assert_ne!(first, second);
        assert_eq!(backend.calls(), 2);
    }

    #[test]
    fn test_failure_is_reported() {
        let backend = errors_backend();
        backend.fail(true);
        let mut fetcher = ResourceFetcher::new(Resource::Errors, backend);

        fetcher.refresh();
        let outcome = wait(&mut fetcher);
        assert!(matches!(
            outcome.result,
            Err(FetchError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn test_malformed_body_is_reported() {
        let backend = Arc::new(StaticBackend::new().with("/history", json!("oops")));
        let mut fetcher = ResourceFetcher::new(Resource::History, backend);

        fetcher.refresh();
        let outcome = wait(&mut fetcher);
        assert!(matches!(
            outcome.result,
            Err(FetchError::UnexpectedShape { .. })
        ));
    }
}
