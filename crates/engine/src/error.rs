//! Shared error types for the engine crate.

use thiserror::Error;

use lingo_core::model::Topic;
use storage::repository::StorageError;

/// Errors emitted while assembling a task pool.
///
/// An empty content category is not an error; the factory silently omits
/// the task. Only a failing content source surfaces here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("no content available for topic {0}")]
    NoContent(Topic),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
