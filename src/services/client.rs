//! Backend access
//!
//! A single `Backend` is created at start-up and shared by every fetcher.

use crate::error::FetchError;
use serde_json::Value;
use std::time::Duration;
use tracing::trace;

/// Source of JSON documents addressed by path
pub trait Backend: Send + Sync {
    fn get_json(&self, path: &str) -> Result<Value, FetchError>;
}

/// Backend reached over HTTP
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Backend for HttpBackend {
    fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.url(path);
        trace!(%url, "GET");
        let response = self.client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::thread;

    /// In-memory backend serving canned bodies
    #[derive(Default)]
    pub struct StaticBackend {
        bodies: Mutex<HashMap<String, Value>>,
        calls: AtomicUsize,
        failing: AtomicBool,
        delay: Duration,
    }

    impl StaticBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, path: &str, body: Value) -> Self {
            self.set(path, body);
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn set(&self, path: &str, body: Value) {
            self.bodies.lock().unwrap().insert(path.to_string(), body);
        }

        pub fn fail(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Backend for StaticBackend {
        fn get_json(&self, path: &str) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(FetchError::Status {
                    path: path.to_string(),
                    status: 503,
                });
            }
            self.bodies
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    path: path.to_string(),
                    status: 404,
                })
        }
    }
}
