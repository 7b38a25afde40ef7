//! # observable-container
//!
//! A thread-safe sequence that tells observers what changed.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use observable_container::prelude::*;
//!
//! let container = ObservableContainer::<i32>::new();
//! let log = Arc::new(Mutex::new(vec![]));
//! let c_log = log.clone();
//! let handle = container.subscribe(move |e: &ChangeEvent<i32>| c_log.lock().unwrap().push(e.kind()));
//!
//! container.push(10);
//! container.batch(|c| {
//!   c.push(20);
//!   c.push(30);
//! });
//! container.unsubscribe(handle);
//! container.push(40);
//!
//! assert_eq!(
//!   *log.lock().unwrap(),
//!   vec![ChangeKind::ElementAdded, ChangeKind::SizeChanged, ChangeKind::BatchUpdate]
//! );
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ObservableContainer`] | The container; all operations take `&self` |
//! | [`ChangeEvent`] | Immutable description of one change |
//! | [`ObserverHandle`] | Token returned by `subscribe`, used to unsubscribe |
//! | [`UpdateScope`] | RAII batch scope coalescing changes into one `BatchUpdate` |
//! | [`IndexAccess`] | Backing storage strategy (`Vec<T>`, `LinkedList<T>`) |
//!
//! ## Feature Flags
//!
//! - **`stream`** (default): [`ChangeStream`], an async `Stream` of change
//!   events built on `futures`.
//!
//! [`ObservableContainer`]: container::ObservableContainer
//! [`ChangeEvent`]: event::ChangeEvent
//! [`ObserverHandle`]: observer::ObserverHandle
//! [`UpdateScope`]: container::UpdateScope
//! [`IndexAccess`]: storage::IndexAccess
//! [`ChangeStream`]: container::ChangeStream

pub mod batch;
pub mod container;
pub mod error;
pub mod event;
pub mod observer;
pub mod prelude;
pub mod storage;

pub use prelude::*;

// Bring README.md into Cargo-driven doctests.
#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
