use std::collections::{linked_list::Iter, LinkedList};

use super::IndexAccess;
use crate::error::{ContainerError, Result};

// Positional edits split the list at `index` and splice it back.
impl<T> IndexAccess<T> for LinkedList<T> {
  type Iter<'a>
    = Iter<'a, T>
  where
    T: 'a;

  #[inline]
  fn len(&self) -> usize { LinkedList::len(self) }

  fn get(&self, index: usize) -> Option<&T> { LinkedList::iter(self).nth(index) }

  fn get_mut(&mut self, index: usize) -> Option<&mut T> { self.iter_mut().nth(index) }

  fn set(&mut self, index: usize, value: T) -> Result<T> {
    let len = LinkedList::len(self);
    match self.iter_mut().nth(index) {
      Some(slot) => Ok(std::mem::replace(slot, value)),
      None => Err(ContainerError::OutOfRange { index, len }),
    }
  }

  #[inline]
  fn push(&mut self, value: T) { self.push_back(value) }

  #[inline]
  fn pop(&mut self) -> Option<T> { self.pop_back() }

  fn insert(&mut self, index: usize, value: T) -> Result<()> {
    let len = LinkedList::len(self);
    if index > len {
      return Err(ContainerError::OutOfRange { index, len });
    }
    let mut tail = self.split_off(index);
    self.push_back(value);
    self.append(&mut tail);
    Ok(())
  }

  fn remove(&mut self, index: usize) -> Option<T> {
    if index >= LinkedList::len(self) {
      return None;
    }
    let mut tail = self.split_off(index);
    let removed = tail.pop_front();
    self.append(&mut tail);
    removed
  }

  #[inline]
  fn clear(&mut self) { LinkedList::clear(self) }

  #[inline]
  fn iter(&self) -> Self::Iter<'_> { LinkedList::iter(self) }
}
