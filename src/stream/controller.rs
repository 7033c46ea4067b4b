//! Output sink handed to transformer callbacks.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

struct Shared<T> {
    /// `None` once the sink is closed.
    sender: Mutex<Option<Sender<T>>>,
    enqueued: AtomicU64,
    rejected: AtomicU64,
}

/// Thread-safe handle for pushing outputs downstream.
///
/// Clones share one queue. Pushes from any number of threads are serialized
/// by an internal lock and land in the order they acquired it. Once
/// [`Controller::close`] returns, every further push is rejected.
pub struct Controller<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Controller<T> {
    /// Create a controller and the receiving end of its queue.
    pub(crate) fn channel() -> (Self, Receiver<T>) {
        let (sender, receiver) = unbounded();
        let controller = Self {
            shared: Arc::new(Shared {
                sender: Mutex::new(Some(sender)),
                enqueued: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
            }),
        };
        (controller, receiver)
    }

    /// Push a chunk. Returns false if the sink is closed.
    pub fn enqueue(&self, chunk: T) -> bool {
        self.enqueue_with(|| chunk)
    }

    /// Produce and push a chunk while holding the sink lock.
    ///
    /// `produce` is only called if the sink is open, and no other push can
    /// land between producing the chunk and queueing it.
    pub fn enqueue_with<F>(&self, produce: F) -> bool
    where
        F: FnOnce() -> T,
    {
        let sender = self.shared.sender.lock();
        let accepted = match sender.as_ref() {
            Some(sender) => sender.send(produce()).is_ok(),
            None => false,
        };

        if accepted {
            self.shared.enqueued.fetch_add(1, Ordering::SeqCst);
        } else {
            self.shared.rejected.fetch_add(1, Ordering::SeqCst);
            trace!("Chunk rejected by closed sink");
        }
        accepted
    }

    /// Close the sink. Already queued chunks stay readable.
    pub fn close(&self) {
        self.shared.sender.lock().take();
    }

    /// Whether the sink has been closed.
    pub fn is_closed(&self) -> bool {
        self.shared.sender.lock().is_none()
    }

    /// Total chunks accepted so far.
    pub fn enqueued_count(&self) -> u64 {
        self.shared.enqueued.load(Ordering::SeqCst)
    }

    /// Total chunks rejected so far.
    pub fn rejected_count(&self) -> u64 {
        self.shared.rejected.load(Ordering::SeqCst)
    }
}

impl<T> Clone for Controller<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}
