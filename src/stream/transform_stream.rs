//! A transform stage with a writable input side and a readable output queue.

use crate::config::StreamConfig;
use crate::error::{Result, StreamError};
use crate::types::{ShutdownReason, StageState};
use crossbeam_channel::Receiver;
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::controller::Controller;
use super::transformer::Transformer;

/// Runtime around a [`Transformer`].
///
/// Construction activates the transformer. Every exit path (close, abort,
/// cancel, a failing callback, or drop) funnels into one shutdown routine
/// that runs `flush` exactly once and then closes the output queue.
pub struct TransformStream<T: Transformer> {
    config: StreamConfig,
    transformer: T,
    controller: Controller<T::Output>,
    readable: Receiver<T::Output>,
    state: StageState,
    reason: Option<ShutdownReason>,
}

impl<T: Transformer> TransformStream<T> {
    /// Create a stream with default configuration and run `start`.
    pub fn new(transformer: T) -> Result<Self> {
        Self::with_config(transformer, StreamConfig::default())
    }

    /// Create a stream and run `start`.
    ///
    /// If `start` fails the stream never becomes active; `flush` is not
    /// called and the error is returned.
    pub fn with_config(transformer: T, config: StreamConfig) -> Result<Self> {
        let (controller, readable) = Controller::channel();
        let mut stream = Self {
            config,
            transformer,
            controller,
            readable,
            state: StageState::Created,
            reason: None,
        };

        if let Err(e) = stream.transformer.start(&stream.controller) {
            debug!(stream = %stream.config.name, error = %e, "Start failed");
            stream.controller.close();
            stream.state = StageState::Closed;
            stream.reason = Some(ShutdownReason::Errored);
            return Err(e);
        }

        stream.state = StageState::Activated;
        debug!(stream = %stream.config.name, "Stream activated");
        Ok(stream)
    }

    /// Feed one input chunk to the transformer.
    ///
    /// A transformer error shuts the stream down before it is returned.
    pub fn write(&mut self, chunk: T::Input) -> Result<()> {
        if !self.state.accepts_input() {
            return Err(self.not_writable());
        }

        trace!(stream = %self.config.name, "Transforming chunk");
        match self.transformer.transform(chunk, &self.controller) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.teardown(ShutdownReason::Errored);
                Err(e)
            }
        }
    }

    /// Signal end of input. No-op if already shut down.
    pub fn close(&mut self) -> Result<()> {
        self.shutdown(ShutdownReason::Completed)
    }

    /// Shut down because the input side failed. No-op if already shut down.
    pub fn abort(&mut self) -> Result<()> {
        self.shutdown(ShutdownReason::UpstreamError)
    }

    /// Shut down because the consumer stopped reading. No-op if already shut down.
    pub fn cancel(&mut self) -> Result<()> {
        self.shutdown(ShutdownReason::Cancelled)
    }

    /// Next queued output, if any.
    pub fn try_read(&self) -> Option<T::Output> {
        self.readable.try_recv().ok()
    }

    /// Wait up to `timeout` for the next output.
    ///
    /// Returns `None` on timeout, or at once when the stream is closed and
    /// its queue is empty.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T::Output> {
        self.readable.recv_timeout(timeout).ok()
    }

    /// Take every queued output.
    pub fn drain(&self) -> Vec<T::Output> {
        self.readable.try_iter().collect()
    }

    /// Number of outputs waiting to be read.
    pub fn queued(&self) -> usize {
        self.readable.len()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StageState {
        self.state
    }

    /// Why the stream shut down, once it has.
    pub fn shutdown_reason(&self) -> Option<ShutdownReason> {
        self.reason
    }

    /// Whether the stream is closed and fully read.
    pub fn is_finished(&self) -> bool {
        self.state == StageState::Closed && self.readable.is_empty()
    }

    /// Configuration the stream was built with.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// The wrapped transformer.
    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    /// Run `flush` and close the sink, once.
    pub(crate) fn shutdown(&mut self, reason: ShutdownReason) -> Result<()> {
        if self.state != StageState::Activated {
            return Ok(());
        }

        self.state = StageState::ShuttingDown;
        debug!(stream = %self.config.name, ?reason, "Shutting down");

        let result = self.transformer.flush(&self.controller);
        self.controller.close();
        self.state = StageState::Closed;
        self.reason = Some(reason);

        debug!(
            stream = %self.config.name,
            emitted = self.controller.enqueued_count(),
            "Stream closed"
        );
        result
    }

    /// Shutdown on a path that already has an error to report.
    pub(crate) fn teardown(&mut self, reason: ShutdownReason) {
        if let Err(e) = self.shutdown(reason) {
            warn!(stream = %self.config.name, ?reason, error = %e, "Flush failed during teardown");
        }
    }

    fn not_writable(&self) -> StreamError {
        if self.state.is_shut_down() {
            StreamError::Closed
        } else {
            StreamError::InvalidState {
                expected: StageState::Activated,
                actual: self.state,
            }
        }
    }
}

impl<T: Transformer> Drop for TransformStream<T> {
    fn drop(&mut self) {
        if self.state == StageState::Activated {
            self.teardown(ShutdownReason::Cancelled);
        }
    }
}
