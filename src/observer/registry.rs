use smallvec::SmallVec;

use super::{BoxedObserver, ObserverHandle};
use crate::event::ChangeEvent;

/// Ordered collection of observer registrations with handle-based removal.
///
/// # Design
///
/// - **SmallVec Optimization**: Uses `SmallVec<[_; 2]>` to avoid heap
///   allocation for the common case of 0-2 observers.
/// - **Insertion Order**: Entries are kept in registration order and dispatch
///   follows it.
/// - **Snapshots**: [`snapshot`](Self::snapshot) copies the callbacks out so
///   they can be invoked after the owning lock is released.
pub struct ObserverRegistry<T> {
  entries: SmallVec<[(ObserverHandle, BoxedObserver<T>); 2]>,
}

impl<T> Default for ObserverRegistry<T> {
  fn default() -> Self { Self { entries: SmallVec::new() } }
}

impl<T> ObserverRegistry<T> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Store `observer` under a freshly issued handle.
  pub fn register(&mut self, observer: BoxedObserver<T>) -> ObserverHandle {
    let handle = ObserverHandle::next();
    self.entries.push((handle, observer));
    handle
  }

  /// Remove the registration for `handle`. Returns whether anything was
  /// removed; unknown handles are not an error.
  pub fn unregister(&mut self, handle: ObserverHandle) -> bool {
    match self.entries.iter().position(|(h, _)| *h == handle) {
      Some(pos) => {
        self.entries.remove(pos);
        true
      }
      None => false,
    }
  }

  #[inline]
  pub fn contains(&self, handle: ObserverHandle) -> bool {
    self.entries.iter().any(|(h, _)| *h == handle)
  }

  #[inline]
  pub fn len(&self) -> usize { self.entries.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  #[inline]
  pub fn clear(&mut self) { self.entries.clear() }

  /// Copy of the current callbacks, in registration order.
  pub fn snapshot(&self) -> Snapshot<T> {
    Snapshot(self.entries.iter().map(|(_, observer)| observer.clone()).collect())
  }
}

/// Callbacks captured for one round of dispatch.
pub struct Snapshot<T>(SmallVec<[BoxedObserver<T>; 2]>);

impl<T> Snapshot<T> {
  #[inline]
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  #[inline]
  pub fn len(&self) -> usize { self.0.len() }

  /// Invoke every captured callback with `event`.
  pub fn dispatch(&self, event: &ChangeEvent<T>) {
    for observer in &self.0 {
      observer(event);
    }
  }
}
