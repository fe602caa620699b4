//! Error types for inbox-digest.

use thiserror::Error;

use crate::models::ItemId;

/// Result type alias using inbox-digest's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for inbox-digest operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Initial collection fetch failed (network, non-2xx, or error body)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Summarization call failed
    #[error("Summarize error: {0}")]
    Summarize(String),

    /// Enrichment result arrived for an item no longer in the store
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Item already carries an enrichment; enrichment is write-once
    #[error("Item already enriched: {0}")]
    AlreadyEnriched(ItemId),

    /// Chat assistant call failed
    #[error("Chat error: {0}")]
    Chat(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error is absorbed locally rather than surfaced to the user.
    ///
    /// Every variant produced by the enrichment core is recoverable; only
    /// configuration errors should stop the shell from starting.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Config(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
