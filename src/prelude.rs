//! Prelude module for convenient imports

#[cfg(feature = "stream")]
pub use crate::container::ChangeStream;
pub use crate::{
  batch::{BatchPhase, BatchState},
  container::{ObservableContainer, UpdateScope},
  error::{ContainerError, Result},
  event::{ChangeEvent, ChangeKind},
  observer::{BoxedObserver, ObserverHandle},
  storage::IndexAccess,
};
