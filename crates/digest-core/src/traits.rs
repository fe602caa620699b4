//! Gateway traits shared by the HTTP implementations and the enrichment board.
//!
//! The board depends only on these traits, so tests can substitute
//! in-process doubles for the backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Item;

// =============================================================================
// GATEWAY TRAITS
// =============================================================================

/// Source of the initial item collection.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Fetch the full collection in one call.
    ///
    /// Fails with [`crate::Error::Fetch`] on transport errors, non-success
    /// status, or an error body. Callers decide the fallback policy.
    async fn fetch_initial(&self) -> Result<Vec<Item>>;
}

/// Backend that produces a summary for one piece of content.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `content`. Single request/response, no retry.
    ///
    /// Fails with [`crate::Error::Summarize`] on any failure.
    async fn summarize(&self, content: &str) -> Result<String>;
}

#[async_trait]
impl<T: ItemSource + ?Sized> ItemSource for std::sync::Arc<T> {
    async fn fetch_initial(&self) -> Result<Vec<Item>> {
        (**self).fetch_initial().await
    }
}

#[async_trait]
impl<T: Summarizer + ?Sized> Summarizer for std::sync::Arc<T> {
    async fn summarize(&self, content: &str) -> Result<String> {
        (**self).summarize(content).await
    }
}
