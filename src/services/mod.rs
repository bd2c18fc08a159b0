//! Backend access
//!
//! - `Backend` / `HttpBackend` - blocking JSON GETs against the server
//! - `ResourceFetcher` - rate-limited background fetches of one resource

pub mod client;
pub mod fetcher;

pub use client::{Backend, HttpBackend};
pub use fetcher::{FetchTicket, ResourceFetcher};
