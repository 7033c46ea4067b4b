//! Listener registry for broadcasting store changes.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::contract::Listener;

/// Unique identifier for a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Registered listener plus its liveness flag.
struct Entry {
    listener: Listener,
    /// Cleared by `remove`; checked right before every call.
    active: AtomicBool,
}

/// Manages listeners and broadcasts change notifications.
///
/// Listeners are called in registration order. The lock is never held while
/// a listener runs, so listeners may register or remove listeners (including
/// themselves) and read or mutate the owning store.
///
/// A removed listener is never called by a later round, and is skipped by
/// the current round if its turn has not come yet. Only a call that another
/// thread had already begun when `remove` ran may still finish.
pub struct ListenerRegistry {
    /// Active listeners by ID; ids grow monotonically so map order is
    /// registration order.
    listeners: RwLock<BTreeMap<ListenerId, Arc<Entry>>>,
    /// Counter for generating listener IDs.
    next_id: AtomicU64,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a listener.
    pub fn register(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let entry = Entry {
            listener,
            active: AtomicBool::new(true),
        };
        self.listeners.write().insert(id, Arc::new(entry));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove(&self, id: ListenerId) -> bool {
        match self.listeners.write().remove(&id) {
            Some(entry) => {
                entry.active.store(false, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Call every listener registered at the start of this round.
    ///
    /// A listener removed during the round is skipped if it has not run
    /// yet; one added during the round is not called until the next round.
    pub fn notify(&self) {
        let snapshot: Vec<Arc<Entry>> = self.listeners.read().values().cloned().collect();

        for entry in snapshot {
            if entry.active.load(Ordering::SeqCst) {
                (entry.listener)();
            }
        }
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
