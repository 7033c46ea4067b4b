//! # Store Stream
//!
//! Bridges a state store to a pull-based streaming pipeline: actions go in,
//! states come out.
//!
//! ## Core Concepts
//!
//! - **Store**: Holds current state, accepts actions, notifies listeners
//! - **Transform stream**: A stage with `start`, `transform`, and `flush`
//!   callbacks and an output queue
//! - **State-emitting adapter**: The stage that dispatches every action to a
//!   store and emits the store's state after every change, starting with the
//!   state it had on activation
//!
//! ## Example
//!
//! ```ignore
//! use store_stream::{state_stream, PipeThrough, ReducerStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(ReducerStore::new(0, |state: &i64, delta: &i64| state + delta));
//!
//! let states = vec![1, -1, 1]
//!     .into_iter()
//!     .pipe_through(state_stream(store)?)
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! assert_eq!(states, vec![0, 1, 0, 1]);
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod store;
pub mod stream;
pub mod types;

// Re-exports
pub use adapter::{state_stream, state_stream_with_config, StateEmittingAdapter, StateStream};
pub use config::StreamConfig;
pub use error::{BoxError, Result, StreamError};
pub use store::{Listener, ListenerId, ListenerRegistry, ReducerStore, Store, Unsubscribe};
pub use stream::{Controller, PipeThrough, Piped, TransformStream, Transformer};
pub use types::{ShutdownReason, StageState};
