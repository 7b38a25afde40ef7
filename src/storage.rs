//! Index access strategies for the backing sequence.
//!
//! The container never touches a concrete collection directly. Everything it
//! does goes through [`IndexAccess`], so the same notification logic runs on
//! top of contiguous (`Vec<T>`) or node-based (`LinkedList<T>`) storage. The
//! strategy is picked at compile time through the container's `S` parameter.

mod contiguous;
mod linked;

use crate::error::Result;

/// Bounds-checked, position-based access to an ordered sequence.
///
/// Implementations must behave identically for the same sequence of calls;
/// only their cost model may differ.
pub trait IndexAccess<T> {
  type Iter<'a>: Iterator<Item = &'a T>
  where
    Self: 'a,
    T: 'a;

  fn len(&self) -> usize;

  #[inline]
  fn is_empty(&self) -> bool { self.len() == 0 }

  /// Borrow the element at `index`, or `None` when out of range.
  fn get(&self, index: usize) -> Option<&T>;

  /// Mutably borrow the element at `index`, or `None` when out of range.
  fn get_mut(&mut self, index: usize) -> Option<&mut T>;

  /// Replace the element at `index`, returning the previous value.
  ///
  /// Fails with [`ContainerError::OutOfRange`](crate::error::ContainerError)
  /// when `index >= len`.
  fn set(&mut self, index: usize, value: T) -> Result<T>;

  fn push(&mut self, value: T);

  fn pop(&mut self) -> Option<T>;

  /// Insert before `index`. `index == len` appends.
  fn insert(&mut self, index: usize, value: T) -> Result<()>;

  fn remove(&mut self, index: usize) -> Option<T>;

  fn clear(&mut self);

  #[allow(clippy::needless_lifetimes)]
  fn iter<'a>(&'a self) -> Self::Iter<'a>;
}
