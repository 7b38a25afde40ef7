//! Nested update scopes that defer and coalesce notifications.

use crate::event::ChangeKind;

/// Where the batching state machine currently stands.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BatchPhase {
  /// No open scope; events dispatch immediately.
  Idle,
  /// At least one open scope. `dirty` records whether a suppressed change
  /// happened since the outermost begin.
  Batching { depth: usize, dirty: bool },
}

/// Outcome of offering one event to the state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Admission {
  /// Dispatch the event now.
  Dispatch,
  /// The event was folded into the pending batch and must be dropped.
  Deferred,
}

/// Depth counter plus dirty flag.
///
/// `dirty` is only ever set while `depth > 0`, and it is consumed exactly
/// once when the outermost scope closes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchState {
  depth: usize,
  dirty: bool,
}

impl BatchState {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Open a scope. No notification side effect.
  #[inline]
  pub fn begin(&mut self) { self.depth += 1; }

  /// Close a scope.
  ///
  /// Returns `true` when this closed the outermost scope and something was
  /// suppressed inside it, meaning exactly one `BatchUpdate` must fire. An
  /// unbalanced call (depth already 0) does nothing and returns `false`.
  pub fn end(&mut self) -> bool {
    if self.depth == 0 {
      return false;
    }
    self.depth -= 1;
    if self.depth == 0 {
      std::mem::take(&mut self.dirty)
    } else {
      false
    }
  }

  /// `BatchUpdate` itself is never deferred; it is how deferred changes
  /// surface.
  #[inline]
  pub fn should_defer(&self, kind: ChangeKind) -> bool {
    kind != ChangeKind::BatchUpdate && self.depth > 0
  }

  /// Decide what happens to an event of `kind`, marking the batch dirty when
  /// it is deferred.
  pub fn admit(&mut self, kind: ChangeKind) -> Admission {
    if self.should_defer(kind) {
      self.dirty = true;
      Admission::Deferred
    } else {
      Admission::Dispatch
    }
  }

  /// Back to `Idle`, discarding any pending dirty flag.
  #[inline]
  pub fn reset(&mut self) { *self = Self::default(); }

  #[inline]
  pub fn depth(&self) -> usize { self.depth }

  #[inline]
  pub fn is_batching(&self) -> bool { self.depth > 0 }

  pub fn phase(&self) -> BatchPhase {
    match self.depth {
      0 => BatchPhase::Idle,
      depth => BatchPhase::Batching { depth, dirty: self.dirty },
    }
  }
}
