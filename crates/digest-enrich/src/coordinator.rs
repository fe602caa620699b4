//! Enrichment coordinator: at most one in-flight enrichment per item.
//!
//! The coordinator owns only the transient `id -> state` map. Item data stays
//! in the [`ItemStore`]; a successful attempt is written there before the
//! pending entry is cleared, so no observer sees an id that is neither
//! pending nor enriched.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use digest_core::{DigestEvent, EnrichmentState, Error, ItemId};

use crate::store::ItemStore;

/// Why a request was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The id is not in the store, so there is nothing to enrich.
    UnknownItem,
    /// The item already carries a summary.
    AlreadyEnriched,
    /// An attempt for this id is still in flight.
    AlreadyPending,
}

/// Answer to [`EnrichmentCoordinator::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected(RejectReason),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Anything that can say whether an id has an attempt in flight.
///
/// The view projection takes this instead of the coordinator so it can be
/// driven from a frozen set in tests.
pub trait PendingLookup {
    fn is_pending(&self, id: &ItemId) -> bool;
}

impl PendingLookup for HashSet<ItemId> {
    fn is_pending(&self, id: &ItemId) -> bool {
        self.contains(id)
    }
}

impl<T: PendingLookup + ?Sized> PendingLookup for &T {
    fn is_pending(&self, id: &ItemId) -> bool {
        (**self).is_pending(id)
    }
}

/// Tracks per-item enrichment attempts and routes their results.
pub struct EnrichmentCoordinator {
    store: Arc<ItemStore>,
    states: Mutex<HashMap<ItemId, EnrichmentState>>,
}

impl EnrichmentCoordinator {
    pub fn new(store: Arc<ItemStore>) -> Self {
        Self {
            store,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Admit an attempt for `id` unless one is already in flight.
    ///
    /// The check and the transition to `Pending` happen inside one critical
    /// section, so two concurrent callers can never both be admitted.
    pub fn request(&self, id: &ItemId) -> Admission {
        {
            let mut states = self.lock();
            let current = states.get(id).copied().unwrap_or_default();
            if !current.admits_request() {
                debug!(item_id = %id, state = %current, "Enrichment request rejected");
                return Admission::Rejected(RejectReason::AlreadyPending);
            }
            states.insert(id.clone(), EnrichmentState::Pending);
        }

        debug!(item_id = %id, "Enrichment request admitted");
        self.store.events().emit(DigestEvent::EnrichmentStarted {
            item_id: id.clone(),
        });
        Admission::Admitted
    }

    /// Record a successful attempt: write the summary, then clear the entry.
    ///
    /// A blank summary is recorded as a failure so the item stays
    /// re-triggerable. A missing item (the collection was reloaded
    /// mid-flight) or an existing summary is logged and absorbed. Signals for
    /// ids that are not pending are ignored.
    pub fn complete(&self, id: &ItemId, summary: &str) {
        if !self.is_pending(id) {
            warn!(item_id = %id, "Ignoring completion for an id that is not pending");
            return;
        }
        if summary.trim().is_empty() {
            let error = Error::Summarize("Summarizer returned an empty summary".to_string());
            self.fail(id, &error);
            return;
        }

        match self.store.apply_enrichment(id, summary) {
            Ok(revision) => {
                info!(item_id = %id, revision, "Item enriched");
            }
            Err(Error::ItemNotFound(_)) => {
                warn!(item_id = %id, "Enrichment result discarded: item no longer in store");
                self.store.events().emit(DigestEvent::EnrichmentDiscarded {
                    item_id: id.clone(),
                });
            }
            Err(e) => {
                warn!(item_id = %id, error = %e, "Enrichment result not applied");
            }
        }

        self.lock().remove(id);
    }

    /// Record a failed attempt. The item is never touched and may be
    /// requested again.
    pub fn fail(&self, id: &ItemId, error: &Error) {
        let was_pending = {
            let mut states = self.lock();
            match states.get_mut(id) {
                Some(state) if *state == EnrichmentState::Pending => {
                    *state = EnrichmentState::Failed;
                    true
                }
                _ => false,
            }
        };
        if !was_pending {
            warn!(item_id = %id, "Ignoring failure for an id that is not pending");
            return;
        }

        warn!(item_id = %id, error = %error, "Enrichment failed");
        self.store.events().emit(DigestEvent::EnrichmentFailed {
            item_id: id.clone(),
            error: error.to_string(),
        });
    }

    /// Drop an admitted attempt that will never run.
    ///
    /// Emits `EnrichmentDiscarded` so the earlier `EnrichmentStarted` has a
    /// terminal event.
    pub(crate) fn withdraw(&self, id: &ItemId) {
        let removed = {
            let mut states = self.lock();
            if states.get(id) == Some(&EnrichmentState::Pending) {
                states.remove(id);
                true
            } else {
                false
            }
        };
        if removed {
            debug!(item_id = %id, "Enrichment attempt withdrawn");
            self.store.events().emit(DigestEvent::EnrichmentDiscarded {
                item_id: id.clone(),
            });
        }
    }

    /// Forget every entry that is not in flight.
    ///
    /// Called after the collection is replaced so `Failed` entries do not
    /// outlive their items. Pending entries stay; their results are routed by
    /// id when they arrive.
    pub fn forget_settled(&self) {
        let mut states = self.lock();
        let before = states.len();
        states.retain(|_, state| *state == EnrichmentState::Pending);
        let dropped = before - states.len();
        if dropped > 0 {
            debug!(dropped, "Cleared settled enrichment states");
        }
    }

    pub fn is_pending(&self, id: &ItemId) -> bool {
        self.lock().get(id) == Some(&EnrichmentState::Pending)
    }

    /// Full lifecycle state of `id`. `Done` is read from the store.
    pub fn state(&self, id: &ItemId) -> EnrichmentState {
        if let Some(state) = self.lock().get(id).copied() {
            return state;
        }
        match self.store.get(id) {
            Some(item) if item.is_enriched() => EnrichmentState::Done,
            _ => EnrichmentState::Idle,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.lock()
            .values()
            .filter(|s| **s == EnrichmentState::Pending)
            .count()
    }

    /// Ids with an attempt in flight right now.
    pub fn pending_ids(&self) -> HashSet<ItemId> {
        self.lock()
            .iter()
            .filter(|(_, s)| **s == EnrichmentState::Pending)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ItemId, EnrichmentState>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PendingLookup for EnrichmentCoordinator {
    fn is_pending(&self, id: &ItemId) -> bool {
        EnrichmentCoordinator::is_pending(self, id)
    }
}
