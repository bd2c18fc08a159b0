//! Error types for backend fetches

use thiserror::Error;

/// Why a resource snapshot could not be fetched
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{path} returned an unexpected body")]
    UnexpectedShape { path: String },

    #[error("fetch worker stopped before replying")]
    Disconnected,
}
