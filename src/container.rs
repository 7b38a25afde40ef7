//! The observable container: backing storage, observer registry and batching
//! state behind a single lock.
//!
//! # Locking
//!
//! Every operation follows the same shape:
//!
//! 1. lock the state;
//! 2. mutate the storage and build the events the mutation implies;
//! 3. offer each event to the batching state machine and, if any survive,
//!    snapshot the observers;
//! 4. unlock;
//! 5. invoke the snapshot.
//!
//! Callbacks therefore never run under the lock. A callback may subscribe,
//! unsubscribe or even mutate the same container without deadlocking; such a
//! nested mutation interleaves with the dispatch that triggered it instead of
//! queueing behind it.
//!
//! # Copy and move
//!
//! | operation | data | destination observers | notification |
//! |-----------|------|-----------------------|--------------|
//! | [`Clone`] | copied | empty | none |
//! | [`take_from`](ObservableContainer::take_from) | moved | empty | none |
//! | [`assign_from`](ObservableContainer::assign_from) | copied | cleared first | one `BatchUpdate` if data differed |
//! | [`assign_take`](ObservableContainer::assign_take) | moved | kept | always one `BatchUpdate` |
//!
//! Moving leaves the source in the moved-from condition: it stays usable but
//! never notifies again.

mod scope;
#[cfg(feature = "stream")]
mod stream;

use std::{
  fmt::{Debug, Formatter},
  sync::Arc,
};

use parking_lot::Mutex;
pub use scope::UpdateScope;
use smallvec::{smallvec, SmallVec};
#[cfg(feature = "stream")]
pub use stream::ChangeStream;

use crate::{
  batch::{Admission, BatchState},
  error::{ContainerError, Result},
  event::ChangeEvent,
  observer::{ObserverHandle, ObserverRegistry, Snapshot},
  storage::IndexAccess,
};

type Events<T> = SmallVec<[ChangeEvent<T>; 2]>;

/// A sequence that notifies observers about changes to it.
///
/// `S` is the backing storage strategy; anything implementing
/// [`IndexAccess`] works, `Vec<T>` is the default.
///
/// All methods take `&self`. Share the container between threads with an
/// `Arc`.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use observable_container::prelude::*;
///
/// let container = ObservableContainer::from(vec![10, 20]);
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// container.subscribe(move |event: &ChangeEvent<i32>| c_seen.lock().unwrap().push(event.kind()));
///
/// container.modify(0, 15);
/// assert_eq!(container.to_vec(), vec![15, 20]);
/// assert_eq!(*seen.lock().unwrap(), vec![ChangeKind::ElementModified]);
/// ```
pub struct ObservableContainer<T, S = Vec<T>> {
  state: Mutex<State<T, S>>,
}

struct State<T, S> {
  data: S,
  observers: ObserverRegistry<T>,
  batch: BatchState,
  moved_from: bool,
}

/// Events that survived batching, plus the observers to hand them to.
struct Pending<T> {
  events: Events<T>,
  observers: Option<Snapshot<T>>,
}

impl<T> Pending<T> {
  fn none() -> Self { Self { events: Events::new(), observers: None } }

  /// Dispatch each event in turn. The first goes to the snapshot taken with
  /// the mutation; every later one re-reads the live registry so an observer
  /// removed mid-dispatch hears nothing further.
  fn deliver<S>(self, state: &Mutex<State<T, S>>) {
    let Some(mut observers) = self.observers else { return };
    for (idx, event) in self.events.iter().enumerate() {
      if idx > 0 {
        let live = state.lock().live_observers();
        match live {
          Some(live) => observers = live,
          None => return,
        }
      }
      tracing::trace!(kind = %event.kind(), observers = observers.len(), "dispatch change event");
      observers.dispatch(event);
    }
  }
}

impl<T, S> State<T, S> {
  fn new(data: S) -> Self {
    Self { data, observers: ObserverRegistry::new(), batch: BatchState::new(), moved_from: false }
  }

  fn stage(&mut self, mut events: Events<T>) -> Pending<T> {
    if events.is_empty() {
      return Pending::none();
    }
    if self.moved_from {
      tracing::trace!(dropped = events.len(), "moved-from container ignores notification");
      return Pending::none();
    }

    let batch = &mut self.batch;
    let offered = events.len();
    events.retain(|event| batch.admit(event.kind()) == Admission::Dispatch);
    if events.len() < offered {
      tracing::trace!(deferred = offered - events.len(), depth = batch.depth(), "change deferred");
    }

    if events.is_empty() {
      return Pending::none();
    }
    match self.live_observers() {
      Some(observers) => Pending { events, observers: Some(observers) },
      None => Pending::none(),
    }
  }

  fn live_observers(&self) -> Option<Snapshot<T>> {
    if self.moved_from || self.observers.is_empty() {
      None
    } else {
      Some(self.observers.snapshot())
    }
  }
}

// Observer management and batching need nothing from the storage.
impl<T, S> ObservableContainer<T, S> {
  /// Wrap existing storage. No notification fires.
  pub fn from_storage(data: S) -> Self { Self { state: Mutex::new(State::new(data)) } }

  /// Consume the container and return its storage.
  pub fn into_storage(self) -> S { self.state.into_inner().data }

  /// Register `observer`; it receives every subsequent dispatched event, in
  /// registration order relative to other observers.
  pub fn subscribe<F>(&self, observer: F) -> ObserverHandle
  where
    F: Fn(&ChangeEvent<T>) + Send + Sync + 'static,
  {
    let handle = self.state.lock().observers.register(Arc::new(observer));
    tracing::debug!(%handle, "observer subscribed");
    handle
  }

  /// Remove the observer registered under `handle`.
  ///
  /// Returns `false` for handles that are unknown to this container,
  /// including handles already removed or issued by another container.
  pub fn unsubscribe(&self, handle: ObserverHandle) -> bool {
    let removed = self.state.lock().observers.unregister(handle);
    tracing::debug!(%handle, removed, "observer unsubscribed");
    removed
  }

  pub fn observer_count(&self) -> usize { self.state.lock().observers.len() }

  /// Open a batch scope. Until the matching outermost
  /// [`end_update`](Self::end_update), individual events are suppressed.
  pub fn begin_update(&self) { self.state.lock().batch.begin(); }

  /// Close a batch scope.
  ///
  /// Closing the outermost scope fires a single `BatchUpdate` if anything
  /// changed inside it. Calling this without an open scope does nothing.
  pub fn end_update(&self) {
    let pending = {
      let mut state = self.state.lock();
      if !state.batch.is_batching() {
        tracing::debug!("end_update without a matching begin_update");
        return;
      }
      if state.batch.end() {
        tracing::debug!("batch closed with changes, flushing");
        state.stage(smallvec![ChangeEvent::batch_update()])
      } else {
        Pending::none()
      }
    };
    pending.deliver(&self.state);
  }

  /// An RAII batch scope: `begin_update` now, `end_update` on drop.
  pub fn update_scope(&self) -> UpdateScope<'_, T, S> { UpdateScope::new(self) }

  /// Run `f` inside a batch scope. The scope closes even if `f` panics.
  pub fn batch<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
    let _scope = self.update_scope();
    f(self)
  }

  /// Current nesting depth of batch scopes.
  pub fn update_depth(&self) -> usize { self.state.lock().batch.depth() }

  /// Whether this container's content was moved out by
  /// [`take_from`](Self::take_from) or [`assign_take`](Self::assign_take).
  pub fn is_moved_from(&self) -> bool { self.state.lock().moved_from }

  fn commit<R>(&self, op: impl FnOnce(&mut S) -> (R, Events<T>)) -> R {
    let (result, pending) = {
      let mut state = self.state.lock();
      let (result, events) = op(&mut state.data);
      (result, state.stage(events))
    };
    pending.deliver(&self.state);
    result
  }
}

impl<T, S: IndexAccess<T> + Default> ObservableContainer<T, S> {
  pub fn new() -> Self { Self::from_storage(S::default()) }

  /// Construct a container that takes over `source`'s content.
  ///
  /// `source` is left empty, its batching state is reset, and it becomes
  /// moved-from: its observers stay registered but will never be called
  /// again. The new container starts without observers. Nothing is
  /// notified.
  pub fn take_from(source: &Self) -> Self {
    let data = {
      let mut src = source.state.lock();
      src.batch.reset();
      src.moved_from = true;
      std::mem::take(&mut src.data)
    };
    tracing::debug!("content moved into a new container");
    Self::from_storage(data)
  }

  /// Take over `other`'s content, replacing this container's.
  ///
  /// This container keeps its observers and always notifies them with
  /// exactly one `BatchUpdate`, whether or not the content differed. `other`
  /// loses its data, observers and batching state and becomes moved-from.
  /// Assigning a container to itself does nothing.
  pub fn assign_take(&self, other: &Self) {
    if std::ptr::eq(self, other) {
      return;
    }
    let incoming = {
      let mut src = other.state.lock();
      src.observers.clear();
      src.batch.reset();
      src.moved_from = true;
      std::mem::take(&mut src.data)
    };
    let pending = {
      let mut state = self.state.lock();
      state.data = incoming;
      state.batch.reset();
      state.stage(smallvec![ChangeEvent::batch_update()])
    };
    tracing::debug!("content moved by assignment");
    pending.deliver(&self.state);
  }
}

impl<T: Clone, S: IndexAccess<T>> ObservableContainer<T, S> {
  /// Append `value`.
  ///
  /// Emits `ElementAdded(len - 1, value)` then `SizeChanged(len)`.
  pub fn push(&self, value: T) {
    self.commit(|data| {
      data.push(value.clone());
      let len = data.len();
      ((), smallvec![ChangeEvent::added(len - 1, value), ChangeEvent::size_changed(len)])
    })
  }

  /// Remove and return the last element, or `None` (and no event) when empty.
  ///
  /// Emits `ElementRemoved(old_len - 1, value)` then `SizeChanged(len)`.
  pub fn pop(&self) -> Option<T> {
    self.commit(|data| match data.pop() {
      Some(value) => {
        let len = data.len();
        (Some(value.clone()), smallvec![ChangeEvent::removed(len, value), ChangeEvent::size_changed(len)])
      }
      None => (None, Events::new()),
    })
  }

  /// Insert `value` before `pos`; `pos == len` appends.
  ///
  /// Returns `false`, without notifying, when `pos > len`. Otherwise emits
  /// `ElementAdded(pos, value)` then `SizeChanged(len)`.
  pub fn insert(&self, pos: usize, value: T) -> bool {
    self.commit(|data| {
      if let Err(err) = data.insert(pos, value.clone()) {
        tracing::trace!(%err, "insert ignored");
        return (false, Events::new());
      }
      (true, smallvec![ChangeEvent::added(pos, value), ChangeEvent::size_changed(data.len())])
    })
  }

  /// Remove and return the element at `pos`, or `None` (and no event) when
  /// `pos` is out of range.
  ///
  /// Emits `ElementRemoved(pos, value)` then `SizeChanged(len)`.
  pub fn remove(&self, pos: usize) -> Option<T> {
    self.commit(|data| match data.remove(pos) {
      Some(value) => {
        let len = data.len();
        (Some(value.clone()), smallvec![ChangeEvent::removed(pos, value), ChangeEvent::size_changed(len)])
      }
      None => (None, Events::new()),
    })
  }

  /// Remove every element. Emits `SizeChanged(0)` unless already empty.
  pub fn clear(&self) {
    self.commit(|data| {
      if data.is_empty() {
        return ((), Events::new());
      }
      data.clear();
      ((), smallvec![ChangeEvent::size_changed(0)])
    })
  }

  /// Bounds-checked read of the element at `pos`.
  pub fn get(&self, pos: usize) -> Result<T> {
    let state = self.state.lock();
    let len = state.data.len();
    state.data.get(pos).cloned().ok_or(ContainerError::OutOfRange { index: pos, len })
  }

  /// Bounds-checked write of the element at `pos`, returning the previous
  /// value.
  ///
  /// This is direct storage access and is **silent**: no observer hears
  /// about it, inside or outside a batch scope. Use
  /// [`modify`](Self::modify) for a notifying replacement.
  pub fn set(&self, pos: usize, value: T) -> Result<T> { self.state.lock().data.set(pos, value) }

  /// Mutate the element at `pos` in place. Silent, like [`set`](Self::set).
  /// Runs under the lock, so `f` must not call back into this container.
  ///
  /// ```rust
  /// use observable_container::prelude::*;
  ///
  /// let container = ObservableContainer::from(vec![1, 2]);
  /// let doubled = container.with_element_mut(1, |v| {
  ///   *v *= 2;
  ///   *v
  /// });
  /// assert_eq!(doubled, Ok(4));
  /// assert!(container.with_element_mut(2, |v| *v).is_err());
  /// ```
  pub fn with_element_mut<R>(&self, pos: usize, f: impl FnOnce(&mut T) -> R) -> Result<R> {
    let mut state = self.state.lock();
    let len = state.data.len();
    match state.data.get_mut(pos) {
      Some(slot) => Ok(f(slot)),
      None => Err(ContainerError::OutOfRange { index: pos, len }),
    }
  }

  /// Borrow the storage for reading. Runs under the lock, so `f` must not
  /// call back into this container.
  pub fn with_storage<R>(&self, f: impl FnOnce(&S) -> R) -> R { f(&self.state.lock().data) }

  pub fn len(&self) -> usize { self.state.lock().data.len() }

  pub fn is_empty(&self) -> bool { self.state.lock().data.is_empty() }

  pub fn first(&self) -> Option<T> { self.state.lock().data.get(0).cloned() }

  pub fn last(&self) -> Option<T> {
    let state = self.state.lock();
    state.data.len().checked_sub(1).and_then(|pos| state.data.get(pos).cloned())
  }

  /// Snapshot of the current content.
  pub fn to_vec(&self) -> Vec<T> { self.state.lock().data.iter().cloned().collect() }
}

impl<T: Clone + PartialEq, S: IndexAccess<T>> ObservableContainer<T, S> {
  /// Replace the element at `pos` with `value`, notifying only if the value
  /// actually changes.
  ///
  /// Returns whether the element changed. Out-of-range positions are ignored
  /// without notification. Emits `ElementModified(pos, old, new)`.
  pub fn modify(&self, pos: usize, value: T) -> bool {
    self.commit(|data| {
      let Some(slot) = data.get_mut(pos) else {
        return (false, Events::new());
      };
      if *slot == value {
        return (false, Events::new());
      }
      let old = std::mem::replace(slot, value.clone());
      (true, smallvec![ChangeEvent::modified(pos, old, value)])
    })
  }

  pub fn contains(&self, value: &T) -> bool { self.state.lock().data.iter().any(|v| v == value) }
}

impl<T: Clone + PartialEq, S: IndexAccess<T> + Clone> ObservableContainer<T, S> {
  /// Overwrite this container with a copy of `other`'s content.
  ///
  /// Observers of this container are removed and its batching state reset
  /// *before* anything is notified, so the `BatchUpdate` emitted when the
  /// content differed reaches the now-empty observer set. `other` is left
  /// untouched. Assigning a container to itself does nothing.
  ///
  /// Returns whether the content differed.
  pub fn assign_from(&self, other: &Self) -> bool { self.assign_from_by(other, |a, b| a == b) }
}

impl<T, S: IndexAccess<T> + Clone> ObservableContainer<T, S> {
  /// [`assign_from`](Self::assign_from) with a caller supplied element
  /// equality, for element types without a meaningful `PartialEq`. Passing
  /// `|_, _| false` treats every assignment as a change.
  pub fn assign_from_by(&self, other: &Self, eq: impl Fn(&T, &T) -> bool) -> bool {
    if std::ptr::eq(self, other) {
      return false;
    }
    let incoming = other.state.lock().data.clone();
    let (changed, pending) = {
      let mut state = self.state.lock();
      let same = state.data.len() == incoming.len()
        && state.data.iter().zip(incoming.iter()).all(|(a, b)| eq(a, b));
      state.data = incoming;
      state.observers.clear();
      state.batch.reset();
      let pending =
        if same { Pending::none() } else { state.stage(smallvec![ChangeEvent::batch_update()]) };
      (!same, pending)
    };
    tracing::debug!(changed, "content copied by assignment");
    pending.deliver(&self.state);
    changed
  }
}

/// Copies the content only. The clone starts with no observers, outside any
/// batch scope, and is not moved-from.
impl<T, S: Clone> Clone for ObservableContainer<T, S> {
  fn clone(&self) -> Self { Self::from_storage(self.state.lock().data.clone()) }
}

impl<T, S: IndexAccess<T> + Default> Default for ObservableContainer<T, S> {
  fn default() -> Self { Self::new() }
}

impl<T> From<Vec<T>> for ObservableContainer<T> {
  fn from(data: Vec<T>) -> Self { Self::from_storage(data) }
}

impl<T, S: IndexAccess<T> + FromIterator<T>> FromIterator<T> for ObservableContainer<T, S> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    Self::from_storage(iter.into_iter().collect())
  }
}

impl<T, S: IndexAccess<T>> Debug for ObservableContainer<T, S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let state = self.state.lock();
    f.debug_struct("ObservableContainer")
      .field("len", &state.data.len())
      .field("observers", &state.observers.len())
      .field("batch", &state.batch.phase())
      .field("moved_from", &state.moved_from)
      .finish()
  }
}
