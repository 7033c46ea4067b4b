//! Transform-stream runtime.
//!
//! A [`TransformStream`] wraps a [`Transformer`] and owns its lifecycle:
//! - `start` runs when the stream is constructed
//! - `transform` runs once per written chunk, in order
//! - `flush` runs exactly once on shutdown, whatever the cause
//!
//! Outputs go through a [`Controller`] into a queue the consumer reads from.
//! The controller is `Clone + Send + Sync`, so a transformer may hand it to
//! callbacks that fire on other threads.
//!
//! # Example
//!
//! ```ignore
//! let stream = TransformStream::new(my_transformer)?;
//!
//! for output in inputs.into_iter().pipe_through(stream) {
//!     println!("{:?}", output?);
//! }
//! ```

mod controller;
mod piped;
mod transform_stream;
mod transformer;

pub use controller::Controller;
pub use piped::{PipeThrough, Piped};
pub use transform_stream::TransformStream;
pub use transformer::Transformer;
