//! Shared fixtures for integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use store_stream::{BoxError, Listener, ReducerStore, Store, Unsubscribe};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Counter {
    Increment,
    Decrement,
}

pub fn counter_reducer(state: &i64, action: &Counter) -> i64 {
    match action {
        Counter::Increment => state + 1,
        Counter::Decrement => state - 1,
    }
}

pub fn counter_store() -> Arc<ReducerStore<i64, Counter>> {
    Arc::new(ReducerStore::new(0, counter_reducer))
}

/// Route library logs to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Counter store that records every interaction and can be told to fail.
pub struct SpyStore {
    inner: ReducerStore<i64, Counter>,
    subscribe_calls: AtomicUsize,
    unsubscribe_calls: Arc<AtomicUsize>,
    dispatched: Mutex<Vec<Counter>>,
    fail_subscribe: bool,
    fail_dispatch_at: Option<usize>,
    fail_unsubscribe: bool,
    notify_on_subscribe: bool,
}

impl SpyStore {
    pub fn new() -> Self {
        Self {
            inner: ReducerStore::new(0, counter_reducer),
            subscribe_calls: AtomicUsize::new(0),
            unsubscribe_calls: Arc::new(AtomicUsize::new(0)),
            dispatched: Mutex::new(Vec::new()),
            fail_subscribe: false,
            fail_dispatch_at: None,
            fail_unsubscribe: false,
            notify_on_subscribe: false,
        }
    }

    pub fn failing_subscribe(mut self) -> Self {
        self.fail_subscribe = true;
        self
    }

    /// Fail the dispatch call with this zero-based index.
    pub fn failing_dispatch_at(mut self, index: usize) -> Self {
        self.fail_dispatch_at = Some(index);
        self
    }

    pub fn failing_unsubscribe(mut self) -> Self {
        self.fail_unsubscribe = true;
        self
    }

    /// Fire the listener once from inside `subscribe`.
    pub fn notifying_on_subscribe(mut self) -> Self {
        self.notify_on_subscribe = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls.load(Ordering::SeqCst)
    }

    pub fn dispatched(&self) -> Vec<Counter> {
        self.dispatched.lock().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listener_count()
    }

    /// Mutate the store without going through any stream.
    pub fn external(&self, action: Counter) {
        self.inner
            .dispatch(action)
            .expect("reducer store dispatch is infallible");
    }
}

impl Store for SpyStore {
    type State = i64;
    type Action = Counter;

    fn get_state(&self) -> i64 {
        self.inner.get_state()
    }

    fn dispatch(&self, action: Counter) -> Result<(), BoxError> {
        let index = {
            let mut dispatched = self.dispatched.lock();
            dispatched.push(action);
            dispatched.len() - 1
        };

        if self.fail_dispatch_at == Some(index) {
            return Err(format!("dispatch #{} rejected", index).into());
        }
        self.inner.dispatch(action)
    }

    fn subscribe(&self, listener: Listener) -> Result<Unsubscribe, BoxError> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_subscribe {
            return Err("subscriptions disabled".into());
        }

        let listener: Arc<Listener> = Arc::new(listener);
        let registered = Arc::clone(&listener);
        let inner = self.inner.subscribe(Box::new(move || registered()))?;

        if self.notify_on_subscribe {
            listener();
        }

        let calls = Arc::clone(&self.unsubscribe_calls);
        let fail = self.fail_unsubscribe;
        Ok(Unsubscribe::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            inner.call()?;
            if fail {
                return Err("listener table locked".into());
            }
            Ok(())
        }))
    }
}
