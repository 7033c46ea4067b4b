//! Stage that turns a stream of actions into a stream of store states.

use crate::config::StreamConfig;
use crate::error::{Result, StreamError};
use crate::store::{Store, Unsubscribe};
use crate::stream::{Controller, TransformStream, Transformer};
use crate::types::StageState;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A transform stream of actions into states.
pub type StateStream<S> = TransformStream<StateEmittingAdapter<S>>;

/// Forwards actions to a store and emits the store's state after every change.
///
/// - On start, emits the current state, then subscribes to the store.
/// - Each action is dispatched; nothing is emitted directly. States reach the
///   output only through the subscription, so changes made by other actors
///   on the same store show up too.
/// - On flush, releases the subscription exactly once. Later flushes are
///   no-ops, and dropping an adapter that still holds its subscription
///   releases it.
///
/// A store whose `subscribe` notifies synchronously produces the initial
/// state twice; states are never deduplicated.
pub struct StateEmittingAdapter<S: Store> {
    store: Arc<S>,
    unsubscribe: Option<Unsubscribe>,
    state: StageState,
}

impl<S: Store> StateEmittingAdapter<S> {
    /// Create an adapter over a shared store. Nothing happens until `start`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            unsubscribe: None,
            state: StageState::Created,
        }
    }

    /// The adapter's own lifecycle state.
    pub fn state(&self) -> StageState {
        self.state
    }

    /// Whether a subscription is currently held.
    pub fn is_subscribed(&self) -> bool {
        self.unsubscribe.is_some()
    }

    /// The store this adapter drives.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn expect_state(&self, expected: StageState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(StreamError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }
}

impl<S> Transformer for StateEmittingAdapter<S>
where
    S: Store + Send + Sync + 'static,
    S::State: Send + 'static,
{
    type Input = S::Action;
    type Output = S::State;

    fn start(&mut self, controller: &Controller<S::State>) -> Result<()> {
        self.expect_state(StageState::Created)?;

        controller.enqueue(self.store.get_state());

        let store = Arc::downgrade(&self.store);
        let sink = controller.clone();
        let handle = self
            .store
            .subscribe(Box::new(move || {
                if let Some(store) = store.upgrade() {
                    sink.enqueue_with(|| store.get_state());
                }
            }))
            .map_err(StreamError::Subscription)?;

        self.unsubscribe = Some(handle);
        self.state = StageState::Activated;
        debug!("Subscribed to store");
        Ok(())
    }

    fn transform(&mut self, action: S::Action, _controller: &Controller<S::State>) -> Result<()> {
        self.expect_state(StageState::Activated)?;

        trace!("Dispatching action");
        self.store.dispatch(action).map_err(StreamError::Dispatch)
    }

    fn flush(&mut self, _controller: &Controller<S::State>) -> Result<()> {
        if self.state != StageState::Activated {
            return Ok(());
        }

        self.state = StageState::ShuttingDown;
        let result = match self.unsubscribe.take() {
            Some(handle) => handle.call().map_err(StreamError::Unsubscribe),
            None => Ok(()),
        };
        self.state = StageState::Closed;

        debug!(released = result.is_ok(), "Store subscription released");
        result
    }
}

impl<S: Store> Drop for StateEmittingAdapter<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.unsubscribe.take() {
            if let Err(e) = handle.call() {
                warn!(error = %e, "Unsubscribe failed while dropping adapter");
            }
        }
    }
}

/// Build an activated action-to-state stream over `store`.
///
/// The store's current state is already queued when this returns.
pub fn state_stream<S>(store: Arc<S>) -> Result<StateStream<S>>
where
    S: Store + Send + Sync + 'static,
    S::State: Send + 'static,
{
    TransformStream::new(StateEmittingAdapter::new(store))
}

/// [`state_stream`] with explicit configuration.
pub fn state_stream_with_config<S>(store: Arc<S>, config: StreamConfig) -> Result<StateStream<S>>
where
    S: Store + Send + Sync + 'static,
    S::State: Send + 'static,
{
    TransformStream::with_config(StateEmittingAdapter::new(store), config)
}
