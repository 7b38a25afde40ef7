//! Example: Walkthrough
//!
//! Exercises every operation of the container with two printing observers,
//! then shows batching and the copy/move rules. Run with
//! `RUST_LOG=observable_container=debug` to see the library's own logging.

use std::fmt::Display;

use observable_container::prelude::*;
use tracing_subscriber::EnvFilter;

fn print_container<T: Clone + Display>(container: &ObservableContainer<T>, label: &str) {
  let items: Vec<String> = container.to_vec().iter().map(ToString::to_string).collect();
  println!("{label} (size: {}): [ {} ]", container.len(), items.join(" "));
}

fn printer(name: &'static str) -> impl Fn(&ChangeEvent<i32>) + Send + Sync + 'static {
  move |event: &ChangeEvent<i32>| {
    let mut line = format!("{name} detected: {}", event.kind());
    if let Some(pos) = event.position() {
      line.push_str(&format!(" at {pos}"));
    }
    if let Some(old) = event.old_value() {
      line.push_str(&format!(" old={old}"));
    }
    if let Some(new) = event.new_value() {
      line.push_str(&format!(" new={new}"));
    }
    if let Some(size) = event.new_size() {
      line.push_str(&format!(" size={size}"));
    }
    println!("{line}");
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // ==================================================================================
  // 1. Element operations
  // ==================================================================================

  let container = ObservableContainer::<i32>::new();
  container.subscribe(printer("Observer 1"));
  container.subscribe(printer("  Observer 2"));
  print_container(&container, "Initial state");

  println!("\n--- push(10), push(20) ---");
  container.push(10);
  container.push(20);
  print_container(&container, "Container");

  println!("\n--- modify(0, 15) ---");
  container.modify(0, 15);
  print_container(&container, "Container");

  println!("\n--- insert(1, 25) ---");
  container.insert(1, 25);
  print_container(&container, "Container");

  println!("\n--- remove(0) ---");
  container.remove(0);
  print_container(&container, "Container");

  println!("\n--- pop() ---");
  container.pop();
  print_container(&container, "Container");

  println!("\n--- set(0, 99): direct access, no notification ---");
  if let Err(err) = container.set(0, 99) {
    println!("set failed: {err}");
  }
  print_container(&container, "Container");
  if let Err(err) = container.get(5) {
    println!("get(5) failed: {err}");
  }

  // ==================================================================================
  // 2. Observer removal
  // ==================================================================================

  println!("\n--- Observer 3 joins for push(30) ---");
  let third = container.subscribe(printer("    Observer 3"));
  container.push(30);
  container.unsubscribe(third);
  println!("\n--- Observer 3 removed, push(40) ---");
  container.push(40);

  println!("\n--- clear() ---");
  container.clear();
  print_container(&container, "Container");

  // ==================================================================================
  // 3. Batching
  // ==================================================================================

  println!("\n--- Batch of three pushes ---");
  {
    let scope = container.update_scope();
    scope.push(1);
    scope.push(2);
    scope.push(3);
    println!("(scope still open, nothing reported yet)");
  }
  print_container(&container, "Container");

  // ==================================================================================
  // 4. Copy and move
  // ==================================================================================

  println!("\n--- Clone: data only ---");
  let copy = container.clone();
  copy.subscribe(printer("Copy observer"));
  copy.push(4);
  print_container(&copy, "copy");
  print_container(&container, "source");

  println!("\n--- assign_from: destination observers are cleared first ---");
  let destination = ObservableContainer::from(vec![7]);
  destination.subscribe(printer("Destination observer"));
  destination.assign_from(&container);
  print_container(&destination, "destination");

  println!("\n--- assign_take: destination observers stay, one BatchUpdate ---");
  let target = ObservableContainer::from(vec![0]);
  target.subscribe(printer("Target observer"));
  target.assign_take(&copy);
  print_container(&target, "target");
  println!("copy moved-from: {}", copy.is_moved_from());
  copy.push(5);
  println!("(copy is moved-from, its push above notified nobody)");
  print_container(&copy, "copy");

  println!("\n--- take_from ---");
  let taken = ObservableContainer::take_from(&target);
  print_container(&taken, "taken");
  print_container(&target, "target");
}
