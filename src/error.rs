//! Error types for store-backed streams.

use crate::types::StageState;
use thiserror::Error;

/// Boxed error raised by an external collaborator (a store or an upstream source).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for stream operations.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Subscription failed: {0}")]
    Subscription(#[source] BoxError),

    #[error("Dispatch failed: {0}")]
    Dispatch(#[source] BoxError),

    #[error("Unsubscribe failed: {0}")]
    Unsubscribe(#[source] BoxError),

    #[error("Upstream error: {0}")]
    Upstream(#[source] BoxError),

    #[error("Invalid stage state: expected {expected:?}, got {actual:?}")]
    InvalidState {
        expected: StageState,
        actual: StageState,
    },

    #[error("Stream is closed")]
    Closed,
}

impl StreamError {
    /// Whether the error originated in the store rather than the pipeline.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            StreamError::Subscription(_) | StreamError::Dispatch(_) | StreamError::Unsubscribe(_)
        )
    }
}

/// Result type for stream operations.
pub type Result<T> = std::result::Result<T, StreamError>;
