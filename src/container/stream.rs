//! Consume change events as an async [`Stream`].

use std::{
  pin::Pin,
  sync::{Arc, Weak},
  task::{Context, Poll},
};

use futures::{
  channel::mpsc::{self, UnboundedReceiver},
  Stream,
};
use pin_project_lite::pin_project;

use super::ObservableContainer;
use crate::{event::ChangeEvent, observer::ObserverHandle};

pin_project! {
  /// A `Stream` of the events dispatched by one container.
  ///
  /// Created by [`ObservableContainer::changes`]. Events are buffered in an
  /// unbounded channel, so a slow consumer never blocks the mutating thread.
  /// Dropping the stream unsubscribes its observer. The stream ends once the
  /// container itself is dropped.
  pub struct ChangeStream<T, S> {
    #[pin]
    receiver: UnboundedReceiver<ChangeEvent<T>>,
    handle: ObserverHandle,
    container: Weak<ObservableContainer<T, S>>,
  }

  impl<T, S> PinnedDrop for ChangeStream<T, S> {
    fn drop(this: Pin<&mut Self>) {
      let this = this.project();
      if let Some(container) = this.container.upgrade() {
        container.unsubscribe(*this.handle);
      }
    }
  }
}

impl<T, S> ChangeStream<T, S> {
  /// Handle of the observer feeding this stream.
  #[inline]
  pub fn handle(&self) -> ObserverHandle { self.handle }
}

impl<T, S> Stream for ChangeStream<T, S> {
  type Item = ChangeEvent<T>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    self.project().receiver.poll_next(cx)
  }
}

impl<T, S> ObservableContainer<T, S>
where
  T: Clone + Send + 'static,
{
  /// Subscribe a channel-backed observer and return its events as a stream.
  ///
  /// ```rust
  /// use std::sync::Arc;
  ///
  /// use futures::{executor::block_on, StreamExt};
  /// use observable_container::prelude::*;
  ///
  /// let container = Arc::new(ObservableContainer::<i32>::new());
  /// let mut changes = container.changes();
  /// container.push(7);
  ///
  /// let first = block_on(changes.next()).unwrap();
  /// assert_eq!(first, ChangeEvent::added(0, 7));
  /// ```
  pub fn changes(self: &Arc<Self>) -> ChangeStream<T, S> {
    let (sender, receiver) = mpsc::unbounded();
    let handle = self.subscribe(move |event: &ChangeEvent<T>| {
      // The receiver may already be gone while its PinnedDrop is pending.
      let _ = sender.unbounded_send(event.clone());
    });
    ChangeStream { receiver, handle, container: Arc::downgrade(self) }
  }
}
