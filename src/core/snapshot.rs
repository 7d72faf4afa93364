//! Copy-on-write lists read by logger workers
//!
//! Readers take an `Arc` snapshot and keep using it for as long as they like;
//! writers build a new vector and swap it in. A fan-out that already loaded a
//! snapshot never observes a concurrent `push` or `remove`.

use arc_swap::ArcSwap;
use std::sync::Arc;

pub(crate) struct SnapshotList<T> {
    items: ArcSwap<Vec<T>>,
}

impl<T: Clone + PartialEq> SnapshotList<T> {
    pub(crate) fn new(items: Vec<T>) -> Self {
        Self {
            items: ArcSwap::from_pointee(items),
        }
    }

    pub(crate) fn load(&self) -> Arc<Vec<T>> {
        self.items.load_full()
    }

    pub(crate) fn push(&self, item: T) {
        self.items.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(item.clone());
            next
        });
    }

    /// Remove the first element equal to `item`. Returns whether one was found.
    pub(crate) fn remove(&self, item: &T) -> bool {
        let previous = self.items.rcu(|current| {
            let mut next: Vec<T> = current.iter().cloned().collect();
            if let Some(idx) = next.iter().position(|existing| existing == item) {
                next.remove(idx);
            }
            next
        });
        previous.iter().any(|existing| existing == item)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.items.load().len()
    }
}
