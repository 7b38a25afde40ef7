//! Change events delivered to observers.

use std::fmt::{Display, Formatter};

/// What kind of change a [`ChangeEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
  ElementAdded,
  ElementRemoved,
  ElementModified,
  SizeChanged,
  /// Something changed while updates were batched, or the whole content was
  /// replaced. Carries no detail.
  BatchUpdate,
}

impl ChangeKind {
  /// Element-level kinds carry a position.
  #[inline]
  pub fn is_element_level(self) -> bool {
    matches!(self, Self::ElementAdded | Self::ElementRemoved | Self::ElementModified)
  }
}

impl Display for ChangeKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Self::ElementAdded => "ElementAdded",
      Self::ElementRemoved => "ElementRemoved",
      Self::ElementModified => "ElementModified",
      Self::SizeChanged => "SizeChanged",
      Self::BatchUpdate => "BatchUpdate",
    };
    f.write_str(name)
  }
}

/// An immutable description of one change to an observable container.
///
/// Fields are only populated where they mean something for the kind:
///
/// | kind | position | old_value | new_value | new_size |
/// |------|----------|-----------|-----------|----------|
/// | `ElementAdded` | yes | - | yes | - |
/// | `ElementRemoved` | yes | yes | - | - |
/// | `ElementModified` | yes | yes | yes | - |
/// | `SizeChanged` | - | - | - | yes |
/// | `BatchUpdate` | - | - | - | - |
///
/// Values are clones of what the container holds; observers never see
/// references into the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent<T> {
  kind: ChangeKind,
  position: Option<usize>,
  old_value: Option<T>,
  new_value: Option<T>,
  new_size: Option<usize>,
}

impl<T> ChangeEvent<T> {
  fn bare(kind: ChangeKind) -> Self {
    Self { kind, position: None, old_value: None, new_value: None, new_size: None }
  }

  pub fn added(position: usize, value: T) -> Self {
    Self { position: Some(position), new_value: Some(value), ..Self::bare(ChangeKind::ElementAdded) }
  }

  pub fn removed(position: usize, value: T) -> Self {
    Self {
      position: Some(position),
      old_value: Some(value),
      ..Self::bare(ChangeKind::ElementRemoved)
    }
  }

  pub fn modified(position: usize, old_value: T, new_value: T) -> Self {
    Self {
      position: Some(position),
      old_value: Some(old_value),
      new_value: Some(new_value),
      ..Self::bare(ChangeKind::ElementModified)
    }
  }

  pub fn size_changed(new_size: usize) -> Self {
    Self { new_size: Some(new_size), ..Self::bare(ChangeKind::SizeChanged) }
  }

  pub fn batch_update() -> Self { Self::bare(ChangeKind::BatchUpdate) }

  #[inline]
  pub fn kind(&self) -> ChangeKind { self.kind }

  #[inline]
  pub fn position(&self) -> Option<usize> { self.position }

  #[inline]
  pub fn old_value(&self) -> Option<&T> { self.old_value.as_ref() }

  #[inline]
  pub fn new_value(&self) -> Option<&T> { self.new_value.as_ref() }

  #[inline]
  pub fn new_size(&self) -> Option<usize> { self.new_size }

  /// Transform the carried values, keeping kind, position and size.
  pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> ChangeEvent<U> {
    ChangeEvent {
      kind: self.kind,
      position: self.position,
      old_value: self.old_value.map(&mut f),
      new_value: self.new_value.map(&mut f),
      new_size: self.new_size,
    }
  }
}
