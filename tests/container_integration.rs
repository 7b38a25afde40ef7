//! Integration tests for observable-container
//!
//! Covers the per-operation event tables, batching, copy/move semantics and
//! threading behavior.

use std::{
  collections::LinkedList,
  sync::{Arc, Mutex},
  thread,
};

use observable_container::prelude::*;

type Log = Arc<Mutex<Vec<ChangeEvent<i32>>>>;

fn record<S>(container: &ObservableContainer<i32, S>) -> Log {
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  let c_log = log.clone();
  container.subscribe(move |event: &ChangeEvent<i32>| c_log.lock().unwrap().push(event.clone()));
  log
}

fn kinds(log: &Log) -> Vec<ChangeKind> { log.lock().unwrap().iter().map(|e| e.kind()).collect() }

#[test]
fn test_modify_scenario() {
  let container = ObservableContainer::from(vec![10, 20]);
  let log = record(&container);

  assert!(container.modify(0, 15));

  assert_eq!(container.to_vec(), vec![15, 20]);
  assert_eq!(*log.lock().unwrap(), vec![ChangeEvent::modified(0, 10, 15)]);
}

#[test]
fn test_modify_same_value_is_silent() {
  let container = ObservableContainer::from(vec![10, 20]);
  let log = record(&container);

  assert!(!container.modify(1, 20));
  assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_insert_scenario() {
  let container = ObservableContainer::from(vec![10, 20]);
  let log = record(&container);

  assert!(container.insert(1, 25));

  assert_eq!(container.to_vec(), vec![10, 25, 20]);
  assert_eq!(*log.lock().unwrap(), vec![ChangeEvent::added(1, 25), ChangeEvent::size_changed(3)]);
}

#[test]
fn test_remove_at_front() {
  let container = ObservableContainer::from(vec![15, 25, 20]);
  let log = record(&container);

  assert_eq!(container.remove(0), Some(15));

  assert_eq!(container.to_vec(), vec![25, 20]);
  assert_eq!(*log.lock().unwrap(), vec![ChangeEvent::removed(0, 15), ChangeEvent::size_changed(2)]);
}

#[test]
fn test_pop_until_empty() {
  let container = ObservableContainer::from(vec![10, 20, 30]);
  let log = record(&container);

  while container.pop().is_some() {}

  assert!(container.is_empty());
  assert_eq!(
    *log.lock().unwrap(),
    vec![
      ChangeEvent::removed(2, 30),
      ChangeEvent::size_changed(2),
      ChangeEvent::removed(1, 20),
      ChangeEvent::size_changed(1),
      ChangeEvent::removed(0, 10),
      ChangeEvent::size_changed(0),
    ]
  );
}

#[test]
fn test_string_elements() {
  let container = ObservableContainer::<String>::new();
  let log = Arc::new(Mutex::new(Vec::new()));
  let c_log = log.clone();
  container.subscribe(move |e: &ChangeEvent<String>| c_log.lock().unwrap().push(e.clone()));

  container.push("hello".to_owned());
  container.modify(0, "apple".to_owned());

  assert_eq!(container.get(0).as_deref(), Ok("apple"));
  assert_eq!(
    *log.lock().unwrap(),
    vec![
      ChangeEvent::added(0, "hello".to_owned()),
      ChangeEvent::size_changed(1),
      ChangeEvent::modified(0, "hello".to_owned(), "apple".to_owned()),
    ]
  );
}

#[test]
fn test_batch_coalesces_pushes() {
  let container = ObservableContainer::<i32>::new();
  let log = record(&container);

  container.begin_update();
  container.push(1);
  container.push(2);
  container.end_update();

  assert_eq!(*log.lock().unwrap(), vec![ChangeEvent::batch_update()]);
}

#[test]
fn test_empty_batch_emits_nothing() {
  let container = ObservableContainer::<i32>::new();
  let log = record(&container);

  container.begin_update();
  container.end_update();

  assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_batch_ignores_silent_operations() {
  let container = ObservableContainer::from(vec![1]);
  let log = record(&container);

  container.batch(|c| {
    c.set(0, 5).unwrap();
    c.modify(0, 5);
    c.modify(9, 1);
    c.pop();
    c.push(5);
  });

  // pop + push did change something, so exactly one BatchUpdate.
  assert_eq!(kinds(&log), vec![ChangeKind::BatchUpdate]);

  log.lock().unwrap().clear();
  container.batch(|c| {
    c.set(0, 6).unwrap();
    c.modify(0, 6);
  });
  assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_nested_batch() {
  let container = ObservableContainer::<i32>::new();
  let log = record(&container);

  container.begin_update();
  container.begin_update();
  container.push(1);
  container.end_update();
  assert!(log.lock().unwrap().is_empty());
  container.push(2);
  container.end_update();

  assert_eq!(kinds(&log), vec![ChangeKind::BatchUpdate]);
}

#[test]
fn test_unsubscribe_stops_only_that_observer() {
  let container = ObservableContainer::<i32>::new();
  let count_a = Arc::new(Mutex::new(0));
  let count_b = Arc::new(Mutex::new(0));
  let (c_a, c_b) = (count_a.clone(), count_b.clone());
  let a = container.subscribe(move |e: &ChangeEvent<i32>| {
    if e.kind() == ChangeKind::ElementAdded {
      *c_a.lock().unwrap() += 1;
    }
  });
  container.subscribe(move |e: &ChangeEvent<i32>| {
    if e.kind() == ChangeKind::ElementAdded {
      *c_b.lock().unwrap() += 1;
    }
  });

  container.push(1);
  assert!(container.unsubscribe(a));
  assert!(!container.unsubscribe(a));
  container.push(2);

  assert_eq!(*count_a.lock().unwrap(), 1);
  assert_eq!(*count_b.lock().unwrap(), 2);
}

#[test]
fn test_clone_copies_data_only() {
  let source = ObservableContainer::from(vec![1, 2, 3]);
  let source_log = record(&source);
  source.begin_update();

  let copy = source.clone();
  assert_eq!(copy.to_vec(), vec![1, 2, 3]);
  assert_eq!(copy.observer_count(), 0);
  assert_eq!(copy.update_depth(), 0);

  let copy_log = record(&copy);
  copy.push(4);
  assert_eq!(kinds(&copy_log), vec![ChangeKind::ElementAdded, ChangeKind::SizeChanged]);
  assert!(source_log.lock().unwrap().is_empty());
  assert_eq!(source.len(), 3);
}

#[test]
fn test_take_from_leaves_source_inert() {
  let source = ObservableContainer::from(vec![1, 2]);
  let source_log = record(&source);
  source.begin_update();

  let taken = ObservableContainer::take_from(&source);
  assert_eq!(taken.to_vec(), vec![1, 2]);
  assert_eq!(taken.observer_count(), 0);
  assert!(source.is_empty());
  assert!(source.is_moved_from());
  assert_eq!(source.update_depth(), 0);

  source.push(9);
  source.begin_update();
  source.push(10);
  source.end_update();
  assert_eq!(source.to_vec(), vec![9, 10]);
  assert!(source_log.lock().unwrap().is_empty());

  let taken_log = record(&taken);
  taken.push(3);
  assert_eq!(kinds(&taken_log), vec![ChangeKind::ElementAdded, ChangeKind::SizeChanged]);
}

#[test]
fn test_assign_from_clears_destination_observers() {
  let source = ObservableContainer::from(vec![1, 2]);
  let destination = ObservableContainer::from(vec![7]);
  let source_log = record(&source);
  let destination_log = record(&destination);

  destination.assign_from(&source);

  assert_eq!(destination.to_vec(), vec![1, 2]);
  assert_eq!(source.to_vec(), vec![1, 2]);
  assert_eq!(destination.observer_count(), 0);
  // The BatchUpdate went to the freshly cleared observer set.
  assert!(destination_log.lock().unwrap().is_empty());
  assert!(source_log.lock().unwrap().is_empty());
  assert_eq!(source.observer_count(), 1);
}

#[test]
fn test_assign_from_destination_accepts_new_observers() {
  let source = ObservableContainer::from(vec![1, 2]);
  let destination = ObservableContainer::from(vec![7]);
  destination.assign_from(&source);
  let log = record(&destination);
  destination.push(3);
  assert_eq!(kinds(&log), vec![ChangeKind::ElementAdded, ChangeKind::SizeChanged]);
}

#[test]
fn test_assign_from_equal_content_is_silent() {
  let source = ObservableContainer::from(vec![1, 2]);
  let destination = ObservableContainer::from(vec![1, 2]);
  destination.begin_update();
  destination.push(3);
  destination.assign_from(&source);
  assert_eq!(destination.update_depth(), 0);

  let log = record(&destination);
  destination.end_update();
  destination.assign_from(&source);
  assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_assign_from_by_always_changed_policy() {
  #[derive(Clone)]
  struct Opaque(u8);

  let source = ObservableContainer::from(vec![Opaque(1)]);
  let destination = ObservableContainer::from(vec![Opaque(1)]);
  assert!(destination.assign_from_by(&source, |_, _| false));
  assert!(!destination.assign_from_by(&source, |a, b| a.0 == b.0));

  // The data is copied even when the equality reports no change.
  let other = ObservableContainer::from(vec![Opaque(2)]);
  assert!(!destination.assign_from_by(&other, |_, _| true));
  assert_eq!(destination.with_storage(|data| data[0].0), 2);
}

#[test]
fn test_assign_take_keeps_observers_and_always_notifies() {
  let source = ObservableContainer::from(vec![1, 2]);
  let destination = ObservableContainer::from(vec![1, 2]);
  let source_log = record(&source);
  let destination_log = record(&destination);

  destination.assign_take(&source);

  assert_eq!(destination.to_vec(), vec![1, 2]);
  assert_eq!(*destination_log.lock().unwrap(), vec![ChangeEvent::batch_update()]);
  assert!(source.is_empty());
  assert!(source.is_moved_from());
  assert_eq!(source.observer_count(), 0);

  source.push(5);
  source.clear();
  assert!(source_log.lock().unwrap().is_empty());

  destination.push(3);
  assert_eq!(
    kinds(&destination_log),
    vec![ChangeKind::BatchUpdate, ChangeKind::ElementAdded, ChangeKind::SizeChanged]
  );
}

#[test]
fn test_moved_from_never_revives() {
  let source = ObservableContainer::from(vec![1]);
  let destination = ObservableContainer::<i32>::new();
  destination.assign_take(&source);

  let other = ObservableContainer::from(vec![4, 5]);
  source.assign_from(&other);
  let log = record(&source);
  source.assign_take(&other);
  source.push(6);

  assert!(source.is_moved_from());
  assert_eq!(source.to_vec(), vec![4, 5, 6]);
  assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_linked_list_storage_event_parity() {
  fn run<S: IndexAccess<i32> + Default>() -> Vec<ChangeEvent<i32>> {
    let container = ObservableContainer::<i32, S>::new();
    let log = record(&container);
    container.push(10);
    container.push(20);
    container.modify(0, 15);
    container.insert(1, 25);
    container.remove(0);
    container.pop();
    container.clear();
    let events = log.lock().unwrap().clone();
    events
  }

  assert_eq!(run::<Vec<i32>>(), run::<LinkedList<i32>>());
}

#[test]
fn test_reentrant_observer_does_not_deadlock() {
  let container = Arc::new(ObservableContainer::<i32>::new());
  let weak = Arc::downgrade(&container);
  let log = record(&container);

  container.subscribe(move |e: &ChangeEvent<i32>| {
    let Some(container) = weak.upgrade() else { return };
    if e.kind() == ChangeKind::ElementAdded && e.new_value() == Some(&1) {
      container.subscribe(|_| {});
      container.push(2);
    }
  });

  container.push(1);

  assert_eq!(container.to_vec(), vec![1, 2]);
  assert_eq!(container.observer_count(), 3);
  // The nested push is dispatched while the outer ElementAdded is still in
  // flight, so it lands before the outer SizeChanged.
  assert_eq!(
    *log.lock().unwrap(),
    vec![
      ChangeEvent::added(0, 1),
      ChangeEvent::added(1, 2),
      ChangeEvent::size_changed(2),
      ChangeEvent::size_changed(1),
    ]
  );
}

#[test]
fn test_self_unsubscribe_stops_remaining_events_of_same_mutation() {
  let container = Arc::new(ObservableContainer::<i32>::new());
  let weak = Arc::downgrade(&container);
  let log = record(&container);
  let received = Arc::new(Mutex::new(vec![]));
  let own_handle = Arc::new(Mutex::new(None::<ObserverHandle>));

  let c_received = received.clone();
  let c_own_handle = own_handle.clone();
  let handle = container.subscribe(move |e: &ChangeEvent<i32>| {
    c_received.lock().unwrap().push(e.kind());
    let Some(container) = weak.upgrade() else { return };
    if e.kind() == ChangeKind::ElementAdded {
      if let Some(handle) = *c_own_handle.lock().unwrap() {
        container.unsubscribe(handle);
      }
    }
  });
  *own_handle.lock().unwrap() = Some(handle);

  container.push(1);
  container.push(2);

  assert_eq!(*received.lock().unwrap(), vec![ChangeKind::ElementAdded]);
  assert_eq!(container.observer_count(), 1);
  assert_eq!(
    kinds(&log),
    vec![
      ChangeKind::ElementAdded,
      ChangeKind::SizeChanged,
      ChangeKind::ElementAdded,
      ChangeKind::SizeChanged,
    ]
  );
}

#[test]
fn test_observer_removed_by_peer_misses_later_events() {
  let container = Arc::new(ObservableContainer::from(vec![1, 2]));
  let weak = Arc::downgrade(&container);
  let victim = Arc::new(Mutex::new(None::<ObserverHandle>));

  let c_victim = victim.clone();
  container.subscribe(move |e: &ChangeEvent<i32>| {
    let Some(container) = weak.upgrade() else { return };
    if e.kind() == ChangeKind::ElementRemoved {
      if let Some(handle) = c_victim.lock().unwrap().take() {
        container.unsubscribe(handle);
      }
    }
  });
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  let c_log = log.clone();
  *victim.lock().unwrap() =
    Some(container.subscribe(move |e: &ChangeEvent<i32>| c_log.lock().unwrap().push(e.clone())));

  container.remove(0);

  // Removal happened during the first event's round, which still reached
  // the victim's snapshot entry.
  assert_eq!(*log.lock().unwrap(), vec![ChangeEvent::removed(0, 1)]);
}

#[test]
fn test_observer_panic_leaves_container_consistent() {
  let container = Arc::new(ObservableContainer::<i32>::new());
  let handle = container.subscribe(|e: &ChangeEvent<i32>| {
    if e.kind() == ChangeKind::ElementAdded {
      panic!("observer failure");
    }
  });

  let c_container = container.clone();
  let result = thread::spawn(move || c_container.push(1)).join();
  assert!(result.is_err());

  assert_eq!(container.to_vec(), vec![1]);
  assert!(container.unsubscribe(handle));
  container.push(2);
  assert_eq!(container.len(), 2);
}

#[test]
fn test_concurrent_pushes() {
  const THREADS: usize = 8;
  const PER_THREAD: usize = 250;

  let container = Arc::new(ObservableContainer::<usize>::new());
  let events = Arc::new(Mutex::new(0usize));
  let c_events = events.clone();
  container.subscribe(move |_| *c_events.lock().unwrap() += 1);

  let workers: Vec<_> = (0..THREADS)
    .map(|t| {
      let container = container.clone();
      thread::spawn(move || {
        for i in 0..PER_THREAD {
          container.push(t * PER_THREAD + i);
        }
      })
    })
    .collect();
  for worker in workers {
    worker.join().unwrap();
  }

  assert_eq!(container.len(), THREADS * PER_THREAD);
  assert_eq!(*events.lock().unwrap(), 2 * THREADS * PER_THREAD);
  let mut values = container.to_vec();
  values.sort_unstable();
  assert_eq!(values, (0..THREADS * PER_THREAD).collect::<Vec<_>>());
}

#[test]
fn test_concurrent_batches_fire_once_per_outermost_scope() {
  let container = Arc::new(ObservableContainer::<i32>::new());
  let log = record(&container);

  container.begin_update();
  let workers: Vec<_> = (0..4)
    .map(|i| {
      let container = container.clone();
      thread::spawn(move || container.batch(|c| c.push(i)))
    })
    .collect();
  for worker in workers {
    worker.join().unwrap();
  }
  assert!(log.lock().unwrap().is_empty());
  container.end_update();

  assert_eq!(container.len(), 4);
  assert_eq!(kinds(&log), vec![ChangeKind::BatchUpdate]);
}

#[cfg(feature = "stream")]
#[tokio::test(flavor = "multi_thread")]
async fn test_change_stream_across_threads() {
  use futures::StreamExt;

  let container = Arc::new(ObservableContainer::<i32>::new());
  let changes = container.changes();

  let producer = container.clone();
  tokio::task::spawn_blocking(move || {
    producer.push(1);
    producer.push(2);
  })
  .await
  .unwrap();

  let events: Vec<_> = changes.take(4).collect().await;
  assert_eq!(
    events,
    vec![
      ChangeEvent::added(0, 1),
      ChangeEvent::size_changed(1),
      ChangeEvent::added(1, 2),
      ChangeEvent::size_changed(2),
    ]
  );
}
