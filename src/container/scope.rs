use std::ops::Deref;

use super::ObservableContainer;

/// An open batch scope on one container.
///
/// Created by [`ObservableContainer::update_scope`]; calls `begin_update` on
/// creation and `end_update` when dropped, including during unwinding. The
/// guard is tied to a single scope and is neither `Clone` nor `Copy`.
///
/// ```rust
/// use observable_container::prelude::*;
///
/// let container = ObservableContainer::<i32>::new();
/// {
///   let scope = container.update_scope();
///   scope.push(1);
///   scope.push(2);
///   assert_eq!(container.update_depth(), 1);
/// }
/// assert_eq!(container.update_depth(), 0);
/// ```
#[must_use = "the batch scope closes as soon as the guard is dropped"]
pub struct UpdateScope<'a, T, S = Vec<T>> {
  container: &'a ObservableContainer<T, S>,
}

impl<'a, T, S> UpdateScope<'a, T, S> {
  pub fn new(container: &'a ObservableContainer<T, S>) -> Self {
    container.begin_update();
    Self { container }
  }

  #[inline]
  pub fn container(&self) -> &'a ObservableContainer<T, S> { self.container }
}

impl<T, S> Deref for UpdateScope<'_, T, S> {
  type Target = ObservableContainer<T, S>;

  #[inline]
  fn deref(&self) -> &Self::Target { self.container }
}

impl<T, S> Drop for UpdateScope<'_, T, S> {
  fn drop(&mut self) { self.container.end_update(); }
}
