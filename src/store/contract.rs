//! The store contract consumed by the adapter.

use crate::error::BoxError;
use std::fmt;

/// Change-notification callback registered with a store.
pub type Listener = Box<dyn Fn() + Send + Sync + 'static>;

/// A holder of current state that accepts actions and notifies listeners.
///
/// Implementations may be shared across threads and mutated by actors other
/// than any one subscriber; nothing here assumes exclusive access.
pub trait Store {
    /// Snapshot type returned by [`Store::get_state`].
    type State;
    /// Input type accepted by [`Store::dispatch`].
    type Action;

    /// Current state. Pure read.
    fn get_state(&self) -> Self::State;

    /// Apply an action. May change state and fire notifications, possibly
    /// before this call returns.
    fn dispatch(&self, action: Self::Action) -> Result<(), BoxError>;

    /// Register one listener and return the handle that removes it.
    ///
    /// After the returned handle has been invoked the listener must not be
    /// called again.
    fn subscribe(&self, listener: Listener) -> Result<Unsubscribe, BoxError>;
}

/// Single-use capability that removes a listener from a store.
///
/// Calling it consumes the handle, so it can be invoked at most once.
pub struct Unsubscribe {
    release: Box<dyn FnOnce() -> Result<(), BoxError> + Send + 'static>,
}

impl Unsubscribe {
    /// Wrap a fallible release function.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() -> Result<(), BoxError> + Send + 'static,
    {
        Self {
            release: Box::new(release),
        }
    }

    /// Wrap an infallible release function.
    pub fn from_fn<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::new(move || {
            release();
            Ok(())
        })
    }

    /// A handle with nothing to release.
    pub fn noop() -> Self {
        Self::new(|| Ok(()))
    }

    /// Release the subscription.
    pub fn call(self) -> Result<(), BoxError> {
        (self.release)()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").finish_non_exhaustive()
    }
}
