use std::collections::VecDeque;

use crate::entity::Entity;

/// Unbounded FIFO of entities waiting for a slot.
///
/// Arrivals are never rejected: backpressure shows up as a growing queue.
#[derive(Debug, Default)]
pub struct WaitQueue {
    queue: VecDeque<Entity>,
}

impl WaitQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the tail.
    #[inline]
    pub fn enqueue(&mut self, entity: Entity) {
        self.queue.push_back(entity);
    }

    /// Removes exactly `min(max_count, len())` entities from the head, oldest first.
    pub fn promote(&mut self, max_count: usize) -> Vec<Entity> {
        let n = max_count.min(self.queue.len());
        self.queue.drain(..n).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Iterates from head (next to be promoted) to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.queue.iter()
    }
}
