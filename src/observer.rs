//! Observer callbacks and the handles that identify their registrations.
//!
//! An observer is any `Fn(&ChangeEvent<T>)` that is `Send + Sync`. Removal
//! goes through the [`ObserverHandle`] issued at registration time, never
//! through the identity of the closure.

mod registry;

use std::{
  fmt::{Display, Formatter},
  sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
  },
};

pub use registry::{ObserverRegistry, Snapshot};

use crate::event::ChangeEvent;

/// A type-erased, shareable observer callback. Dispatch snapshots hold
/// clones of these.
pub type BoxedObserver<T> = Arc<dyn Fn(&ChangeEvent<T>) + Send + Sync>;

// Process-wide: a handle is unique across all containers.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque token identifying one observer registration.
///
/// Handles are issued from a process-wide monotonic counter and never reused.
/// A handle only means something to the container that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverHandle(u64);

impl ObserverHandle {
  pub(crate) fn next() -> Self { Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)) }

  /// The raw id, for logging.
  #[inline]
  pub fn id(&self) -> u64 { self.0 }
}

impl Display for ObserverHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "observer#{}", self.0) }
}
