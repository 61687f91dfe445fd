//! Deferred task queue
//!
//! Work that must not run inline (viewport refresh after a measure, scroll,
//! or zoom) is scheduled here and drained later by the owner. Scheduling a
//! task that is already pending is a no-op, so a burst of scroll events
//! produces a single refresh.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// FIFO queue of coalescing tasks
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    queue: VecDeque<T>,
    pending: HashSet<T>,
}

impl<T: Copy + Eq + Hash> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            pending: HashSet::new(),
        }
    }

    /// Schedule a task. Returns false if the same task is already pending.
    pub fn schedule(&mut self, task: T) -> bool {
        if !self.pending.insert(task) {
            return false;
        }
        self.queue.push_back(task);
        true
    }

    /// Pop the oldest pending task
    pub fn pop(&mut self) -> Option<T> {
        let task = self.queue.pop_front()?;
        self.pending.remove(&task);
        Some(task)
    }

    pub fn is_pending(&self, task: &T) -> bool {
        self.pending.contains(task)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.clear();
    }
}

impl<T: Copy + Eq + Hash> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
