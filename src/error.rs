//! Error types surfaced by the direct indexed accessors.
//!
//! Only `get`/`set` report failures to the caller. Every other kind of misuse
//! (unbalanced `end_update`, removing an unknown observer, mutating a
//! moved-from container) is absorbed where it happens.

use thiserror::Error;

/// Errors returned by [`ObservableContainer`](crate::container::ObservableContainer)
/// and the [`IndexAccess`](crate::storage::IndexAccess) strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContainerError {
  /// The position named by an indexed accessor is not below the current length.
  #[error("index {index} is out of range for a container of length {len}")]
  OutOfRange { index: usize, len: usize },
}

pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
