//! The email board: store, coordinator, and the gateways that feed them.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use digest_core::logging::enrichment_span;
use digest_core::uuid_utils::extract_timestamp;
use digest_core::{
    defaults, new_v7, placeholder, DigestEvent, EventBus, ItemId, ItemSource, Summarizer,
};

use crate::coordinator::{Admission, EnrichmentCoordinator, RejectReason};
use crate::store::ItemStore;
use crate::view::{self, CardView};

/// Board settings.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Buffer size of the change-notification channel.
    pub event_capacity: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            event_capacity: defaults::EVENT_BUS_CAPACITY,
        }
    }
}

impl BoardConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `DIGEST_EVENT_CAPACITY` | `64` | Change-notification buffer |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let event_capacity = lookup("DIGEST_EVENT_CAPACITY")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults::EVENT_BUS_CAPACITY)
            .max(1);
        Self { event_capacity }
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

/// Result of [`EmailBoard::load_initial`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The backend delivered the collection.
    Fetched { item_count: usize },
    /// The fetch failed and the placeholder collection was loaded instead.
    Fallback { item_count: usize, error: String },
}

impl LoadOutcome {
    pub fn item_count(&self) -> usize {
        match self {
            LoadOutcome::Fetched { item_count } | LoadOutcome::Fallback { item_count, .. } => {
                *item_count
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadOutcome::Fallback { .. })
    }
}

/// Result of [`EmailBoard::trigger`].
#[derive(Debug)]
pub enum TriggerOutcome {
    /// The attempt was admitted and is running on its own task.
    Started {
        attempt_id: Uuid,
        handle: JoinHandle<()>,
    },
    Rejected(RejectReason),
}

impl TriggerOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, TriggerOutcome::Started { .. })
    }

    /// Wait for a started attempt to finish. No-op for rejections.
    pub async fn join(self) {
        if let TriggerOutcome::Started { handle, .. } = self {
            if let Err(e) = handle.await {
                error!(error = %e, "Enrichment task panicked");
            }
        }
    }
}

/// Owns the item collection and runs user-triggered enrichments.
pub struct EmailBoard {
    store: Arc<ItemStore>,
    coordinator: Arc<EnrichmentCoordinator>,
    source: Arc<dyn ItemSource>,
    summarizer: Arc<dyn Summarizer>,
}

impl EmailBoard {
    pub fn new<S, Z>(source: S, summarizer: Z, config: BoardConfig) -> Self
    where
        S: ItemSource + 'static,
        Z: Summarizer + 'static,
    {
        let store = Arc::new(ItemStore::new(EventBus::new(config.event_capacity)));
        let coordinator = Arc::new(EnrichmentCoordinator::new(store.clone()));
        Self {
            store,
            coordinator,
            source: Arc::new(source),
            summarizer: Arc::new(summarizer),
        }
    }

    /// Fetch the collection once and load it, or load the placeholder
    /// collection when the fetch fails. Replaces whatever was loaded before.
    pub async fn load_initial(&self) -> LoadOutcome {
        let started = Instant::now();
        match self.source.fetch_initial().await {
            Ok(items) => {
                self.store.load(items, false);
                self.coordinator.forget_settled();
                let item_count = self.store.len();
                info!(
                    item_count,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Loaded emails"
                );
                LoadOutcome::Fetched { item_count }
            }
            Err(e) => {
                warn!(error = %e, fallback = true, "Email fetch failed, using placeholder emails");
                self.store.load(placeholder::emails(), true);
                self.coordinator.forget_settled();
                LoadOutcome::Fallback {
                    item_count: self.store.len(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Start summarizing `id`.
    ///
    /// Admission happens synchronously, before this returns; the summarize
    /// call runs on a spawned tokio task, so this must be called from within
    /// a runtime.
    pub fn trigger(&self, id: &ItemId) -> TriggerOutcome {
        let Some(item) = self.store.get(id) else {
            warn!(item_id = %id, "Trigger for unknown item");
            return TriggerOutcome::Rejected(RejectReason::UnknownItem);
        };
        if item.is_enriched() {
            return TriggerOutcome::Rejected(RejectReason::AlreadyEnriched);
        }
        if let Admission::Rejected(reason) = self.coordinator.request(id) {
            return TriggerOutcome::Rejected(reason);
        }
        // A previous attempt may have landed between the check above and
        // admission.
        if self.store.get(id).is_some_and(|item| item.is_enriched()) {
            self.coordinator.withdraw(id);
            return TriggerOutcome::Rejected(RejectReason::AlreadyEnriched);
        }

        let attempt_id = new_v7();
        let content = item.enrichment_source().to_string();
        let coordinator = self.coordinator.clone();
        let summarizer = self.summarizer.clone();
        let id = id.clone();
        let span = enrichment_span(&id, &attempt_id);

        let handle = tokio::spawn(
            async move {
                let started = Instant::now();
                let queued_ms = extract_timestamp(&attempt_id)
                    .map(|admitted| (chrono::Utc::now() - admitted).num_milliseconds().max(0));
                info!(content_len = content.len(), queued_ms, "Summarizing");
                match summarizer.summarize(&content).await {
                    Ok(summary) => {
                        info!(
                            response_len = summary.len(),
                            duration_ms = started.elapsed().as_millis() as u64,
                            "Summary received"
                        );
                        coordinator.complete(&id, &summary);
                    }
                    Err(e) => coordinator.fail(&id, &e),
                }
            }
            .instrument(span),
        );

        TriggerOutcome::Started { attempt_id, handle }
    }

    /// Current cards, in load order.
    pub fn cards(&self) -> Vec<CardView> {
        // Pending ids first: completion writes the store before clearing the
        // pending entry, so this order never shows a finished item as plain.
        let pending = self.coordinator.pending_ids();
        let items = self.store.snapshot();
        view::project(&items, &pending)
    }

    /// Change notifications for every store mutation and enrichment
    /// transition.
    pub fn subscribe(&self) -> broadcast::Receiver<DigestEvent> {
        self.store.events().subscribe()
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn coordinator(&self) -> &EnrichmentCoordinator {
        &self.coordinator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_config_from_lookup() {
        let config = BoardConfig::from_lookup(|key| match key {
            "DIGEST_EVENT_CAPACITY" => Some("128".to_string()),
            _ => None,
        });
        assert_eq!(config.event_capacity, 128);

        let config = BoardConfig::from_lookup(|_| Some("zero".to_string()));
        assert_eq!(config.event_capacity, defaults::EVENT_BUS_CAPACITY);

        let config = BoardConfig::from_lookup(|_| Some("0".to_string()));
        assert_eq!(config.event_capacity, 1);
    }

    #[test]
    fn test_load_outcome_accessors() {
        let fetched = LoadOutcome::Fetched { item_count: 3 };
        assert_eq!(fetched.item_count(), 3);
        assert!(!fetched.is_fallback());

        let fallback = LoadOutcome::Fallback {
            item_count: 5,
            error: "Fetch error: down".into(),
        };
        assert_eq!(fallback.item_count(), 5);
        assert!(fallback.is_fallback());
    }
}
