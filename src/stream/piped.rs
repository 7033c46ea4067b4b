//! Pull-based pipeline: an input iterator piped through a transform stream.

use crate::error::{BoxError, Result, StreamError};
use crate::types::{ShutdownReason, StageState};
use tracing::debug;

use super::transform_stream::TransformStream;
use super::transformer::Transformer;

type Upstream<'a, I> = Box<dyn Iterator<Item = std::result::Result<I, BoxError>> + 'a>;

/// Iterator over the outputs of a stream fed from an upstream iterator.
///
/// Upstream items are pulled lazily, only while fewer than `read_ahead`
/// outputs are queued. When upstream ends the stream is closed. When
/// upstream, `transform`, or `flush` fails, outputs queued before the
/// failure are still yielded, followed by the error, and then iteration
/// ends. Dropping the iterator early cancels the stream.
pub struct Piped<'a, T: Transformer> {
    stream: TransformStream<T>,
    upstream: Upstream<'a, T::Input>,
    upstream_done: bool,
    pending_error: Option<StreamError>,
    finished: bool,
}

impl<'a, T: Transformer> Piped<'a, T> {
    pub(crate) fn new<U>(stream: TransformStream<T>, upstream: U) -> Self
    where
        U: Iterator<Item = std::result::Result<T::Input, BoxError>> + 'a,
    {
        Self {
            stream,
            upstream: Box::new(upstream),
            upstream_done: false,
            pending_error: None,
            finished: false,
        }
    }

    /// The underlying stream.
    pub fn stream(&self) -> &TransformStream<T> {
        &self.stream
    }

    /// Stop reading and shut the stream down now.
    pub fn cancel(mut self) -> Result<()> {
        self.upstream_done = true;
        self.stream.cancel()
    }

    fn fill(&mut self) {
        let target = self.stream.config().effective_read_ahead();

        while !self.upstream_done && self.stream.queued() < target {
            match self.upstream.next() {
                Some(Ok(chunk)) => {
                    if let Err(e) = self.stream.write(chunk) {
                        self.fail(e);
                    }
                }
                Some(Err(e)) => {
                    debug!(stream = %self.stream.config().name, error = %e, "Upstream failed");
                    self.stream.teardown(ShutdownReason::UpstreamError);
                    self.fail(StreamError::Upstream(e));
                }
                None => {
                    self.upstream_done = true;
                    if let Err(e) = self.stream.close() {
                        self.pending_error = Some(e);
                    }
                }
            }
        }
    }

    fn fail(&mut self, error: StreamError) {
        self.upstream_done = true;
        if self.stream.state() != StageState::Closed {
            self.stream.teardown(ShutdownReason::Errored);
        }
        self.pending_error.get_or_insert(error);
    }
}

impl<'a, T: Transformer> Iterator for Piped<'a, T> {
    type Item = Result<T::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.fill();

        if let Some(chunk) = self.stream.try_read() {
            return Some(Ok(chunk));
        }

        self.finished = true;
        self.pending_error.take().map(Err)
    }
}

/// Extension for piping any iterator through a [`TransformStream`].
pub trait PipeThrough: Iterator + Sized {
    /// Pipe plain input items through `stream`.
    fn pipe_through<'a, T>(self, stream: TransformStream<T>) -> Piped<'a, T>
    where
        Self: 'a,
        T: Transformer<Input = Self::Item>,
    {
        Piped::new(stream, self.map(Ok))
    }

    /// Pipe fallible input items through `stream`; an `Err` item aborts it.
    fn try_pipe_through<'a, T, I, E>(self, stream: TransformStream<T>) -> Piped<'a, T>
    where
        Self: Iterator<Item = std::result::Result<I, E>> + 'a,
        E: Into<BoxError>,
        T: Transformer<Input = I>,
    {
        Piped::new(stream, self.map(|item| item.map_err(Into::into)))
    }
}

impl<I: Iterator> PipeThrough for I {}
