//! Item store: the single owner of item data.
//!
//! `load` and `apply_enrichment` are the only mutation points. Each bumps the
//! revision counter and emits a [`DigestEvent`] so renderers can re-derive
//! their view.

use std::collections::HashSet;
use std::sync::RwLock;

use tracing::{debug, warn};

use digest_core::{DigestEvent, Error, EventBus, Item, ItemId, Result};

struct Inner {
    items: Vec<Item>,
    revision: u64,
}

/// Ordered collection of items, shared between the board and its tasks.
pub struct ItemStore {
    inner: RwLock<Inner>,
    events: EventBus,
}

impl ItemStore {
    pub fn new(events: EventBus) -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: Vec::new(),
                revision: 0,
            }),
            events,
        }
    }

    /// Replace the whole collection. No merge with prior contents.
    ///
    /// Ids must be unique; later duplicates are dropped with a warning.
    pub fn load(&self, items: Vec<Item>, fallback: bool) -> u64 {
        let mut seen = HashSet::with_capacity(items.len());
        let items: Vec<Item> = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.id.clone());
                if !fresh {
                    warn!(item_id = %item.id, "Dropping duplicate item id on load");
                }
                fresh
            })
            .collect();
        let item_count = items.len();

        let revision = {
            let mut inner = self.write();
            inner.items = items;
            inner.revision += 1;
            inner.revision
        };

        debug!(item_count, revision, fallback, "Item store loaded");
        self.events.emit(DigestEvent::ItemsLoaded {
            item_count,
            fallback,
            revision,
        });
        revision
    }

    /// Set the summary of the item with `id`.
    ///
    /// Fails with `ItemNotFound` when the id is absent and with
    /// `AlreadyEnriched` when a summary exists; the store is untouched in
    /// both cases.
    pub fn apply_enrichment(&self, id: &ItemId, summary: &str) -> Result<u64> {
        let revision = {
            let mut inner = self.write();
            let item = inner
                .items
                .iter_mut()
                .find(|item| &item.id == id)
                .ok_or_else(|| Error::ItemNotFound(id.clone()))?;
            item.set_enrichment(summary)?;
            inner.revision += 1;
            inner.revision
        };

        self.events.emit(DigestEvent::ItemEnriched {
            item_id: id.clone(),
            revision,
        });
        Ok(revision)
    }

    /// Copy of the collection in load order.
    pub fn snapshot(&self) -> Vec<Item> {
        self.read().items.clone()
    }

    pub fn get(&self, id: &ItemId) -> Option<Item> {
        self.read().items.iter().find(|item| &item.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    /// Monotonic counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }

    // Every mutation is a single assignment or a checked set, so a poisoned
    // lock still guards consistent data.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new(EventBus::default())
    }
}
