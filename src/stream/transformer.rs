//! The callback contract of a transform stage.

use crate::error::Result;

use super::controller::Controller;

/// A stage that consumes `Input` chunks and produces `Output` chunks.
///
/// The owning [`TransformStream`](super::TransformStream) calls `start` once
/// on construction, `transform` once per written chunk in order, and `flush`
/// once when the stream shuts down for any reason. An error from any callback
/// is returned to the caller and tears the stream down.
pub trait Transformer {
    type Input;
    type Output;

    /// Activation hook.
    fn start(&mut self, _controller: &Controller<Self::Output>) -> Result<()> {
        Ok(())
    }

    /// Handle one input chunk.
    fn transform(&mut self, chunk: Self::Input, controller: &Controller<Self::Output>)
        -> Result<()>;

    /// Shutdown hook. The sink is closed right after this returns.
    fn flush(&mut self, _controller: &Controller<Self::Output>) -> Result<()> {
        Ok(())
    }
}
