//! In-memory store driven by a reducer function.

use crate::error::BoxError;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::trace;

use super::contract::{Listener, Store, Unsubscribe};
use super::listeners::ListenerRegistry;

type Reducer<S, A> = Box<dyn Fn(&S, &A) -> S + Send + Sync>;

/// A thread-safe store whose state only changes through `dispatch`.
///
/// Each dispatch replaces the state with `reducer(&state, &action)` and then
/// notifies every listener, whether or not the new state differs.
///
/// The reducer runs under the state lock: it must not call back into the
/// store. Listeners run with no lock held and may do anything.
pub struct ReducerStore<S, A> {
    state: RwLock<S>,
    reducer: Reducer<S, A>,
    listeners: Arc<ListenerRegistry>,
}

impl<S, A> ReducerStore<S, A>
where
    S: Clone,
{
    /// Create a store with an initial state and a reducer.
    pub fn new<F>(initial: S, reducer: F) -> Self
    where
        F: Fn(&S, &A) -> S + Send + Sync + 'static,
    {
        Self {
            state: RwLock::new(initial),
            reducer: Box::new(reducer),
            listeners: Arc::new(ListenerRegistry::new()),
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.state.read();
        f(&state)
    }

    fn apply(&self, action: &A) {
        let mut state = self.state.write();
        let next = (self.reducer)(&state, action);
        *state = next;
    }
}

impl<S, A> Store for ReducerStore<S, A>
where
    S: Clone,
{
    type State = S;
    type Action = A;

    fn get_state(&self) -> S {
        self.state.read().clone()
    }

    fn dispatch(&self, action: A) -> Result<(), BoxError> {
        self.apply(&action);
        trace!(listeners = self.listeners.len(), "State reduced, notifying");
        self.listeners.notify();
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> Result<Unsubscribe, BoxError> {
        let id = self.listeners.register(listener);
        let registry: Weak<ListenerRegistry> = Arc::downgrade(&self.listeners);

        Ok(Unsubscribe::from_fn(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        }))
    }
}
