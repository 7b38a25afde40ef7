use std::slice::Iter;

use super::IndexAccess;
use crate::error::{ContainerError, Result};

impl<T> IndexAccess<T> for Vec<T> {
  type Iter<'a>
    = Iter<'a, T>
  where
    T: 'a;

  #[inline]
  fn len(&self) -> usize { Vec::len(self) }

  #[inline]
  fn get(&self, index: usize) -> Option<&T> { self.as_slice().get(index) }

  #[inline]
  fn get_mut(&mut self, index: usize) -> Option<&mut T> { self.as_mut_slice().get_mut(index) }

  fn set(&mut self, index: usize, value: T) -> Result<T> {
    let len = Vec::len(self);
    match self.as_mut_slice().get_mut(index) {
      Some(slot) => Ok(std::mem::replace(slot, value)),
      None => Err(ContainerError::OutOfRange { index, len }),
    }
  }

  #[inline]
  fn push(&mut self, value: T) { Vec::push(self, value) }

  #[inline]
  fn pop(&mut self) -> Option<T> { Vec::pop(self) }

  fn insert(&mut self, index: usize, value: T) -> Result<()> {
    let len = Vec::len(self);
    if index > len {
      return Err(ContainerError::OutOfRange { index, len });
    }
    Vec::insert(self, index, value);
    Ok(())
  }

  fn remove(&mut self, index: usize) -> Option<T> {
    (index < Vec::len(self)).then(|| Vec::remove(self, index))
  }

  #[inline]
  fn clear(&mut self) { Vec::clear(self) }

  #[inline]
  fn iter(&self) -> Self::Iter<'_> { self.as_slice().iter() }
}
