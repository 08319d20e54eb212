//! One-shot notifications carried across a redirect.

use std::{
  collections::{HashMap, VecDeque},
  sync::Mutex,
};

/// Per-scope FIFO of pending toast messages.
#[derive(Default)]
pub struct Toaster {
  queues: Mutex<HashMap<String, VecDeque<String>>>,
}

impl Toaster {
  pub fn new() -> Self { Self::default() }

  pub fn push(&self, scope: &str, message: impl Into<String>) {
    let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
    queues
      .entry(scope.to_owned())
      .or_default()
      .push_back(message.into());
  }

  /// Take every pending message for `scope`, oldest first.
  pub fn drain(&self, scope: &str) -> Vec<String> {
    let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
    queues
      .remove(scope)
      .map(Vec::from)
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn drains_in_order_once() {
    let toaster = Toaster::new();
    toaster.push("a", "first");
    toaster.push("a", "second");
    toaster.push("b", "other");

    assert_eq!(toaster.drain("a"), vec!["first", "second"]);
    assert!(toaster.drain("a").is_empty());
    assert_eq!(toaster.drain("b"), vec!["other"]);
  }
}
