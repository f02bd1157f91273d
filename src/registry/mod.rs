//! # Registry: slot table + wait queue under one owner.
//!
//! The registry is the only place that mutates entities once they are
//! generated. It keeps the two collections disjoint and counts completions.
//!
//! ## Admission
//! ```text
//! add(entity)
//!   ├─ id already present ─────► Admission::Duplicate (ignored, logged)
//!   ├─ SlotTable::admit Ok ────► Admission::Assigned { slot }
//!   └─ CapacityError ──────────► WaitQueue::enqueue ─► Admission::Waiting { position }
//! ```
//!
//! ## Invariants
//! - An entity id is in at most one of {slot table, wait queue}.
//! - Promotion never takes more than `SlotTable::free_count()` entities.
//! - Completed entities leave both collections and are never re-admitted
//!   under a live id.

mod queue;
mod slots;

pub use queue::WaitQueue;
pub use slots::SlotTable;

use std::collections::HashSet;

use crate::entity::{Entity, EntityId, Tick};
use crate::error::InvariantError;

/// Outcome of [`Registry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Entity took a free slot.
    Assigned {
        /// Slot index it occupies.
        slot: usize,
    },
    /// No slot was free; entity is queued.
    Waiting {
        /// 0-based position in the queue (0 = next to be promoted).
        position: usize,
    },
    /// An entity with the same id is already waiting or assigned.
    Duplicate,
}

/// Bounded slot table and FIFO wait queue.
#[derive(Debug)]
pub struct Registry {
    slots: SlotTable,
    waiting: WaitQueue,
    /// Ids currently waiting or assigned.
    present: HashSet<EntityId>,
    completed_total: u64,
}

impl Registry {
    /// Creates an empty registry with `limit` slots.
    pub fn new(limit: usize) -> Self {
        Self {
            slots: SlotTable::new(limit),
            waiting: WaitQueue::new(),
            present: HashSet::new(),
            completed_total: 0,
        }
    }

    /// Accepts a new entity at `tick`.
    ///
    /// The entity is placed into a free slot if there is one, otherwise it is
    /// appended to the wait queue.
    pub fn add(&mut self, mut entity: Entity, tick: Tick) -> Admission {
        if !self.present.insert(entity.id) {
            tracing::warn!(id = %entity.id, "entity already registered; ignoring");
            return Admission::Duplicate;
        }

        entity.register(tick);
        match self.slots.admit(entity) {
            Ok(slot) => {
                if let Some(occupant) = self.slots.get_mut(slot) {
                    occupant.assign(tick);
                }
                Admission::Assigned { slot }
            }
            Err(full) => {
                self.waiting.enqueue(full.into_inner());
                Admission::Waiting {
                    position: self.waiting.len() - 1,
                }
            }
        }
    }

    /// Runs one processing step over all slots.
    ///
    /// Returns the entities that finished at `tick`, already stamped as completed.
    pub fn advance(&mut self, tick: Tick) -> Vec<Entity> {
        let mut finished = self.slots.advance();
        for entity in &mut finished {
            entity.complete(tick);
            self.present.remove(&entity.id);
        }
        self.completed_total += finished.len() as u64;
        finished
    }

    /// Moves waiting entities into free slots, oldest first.
    ///
    /// Returns how many were promoted. Running out of slots midway is an
    /// invariant violation, since the queue is asked for at most `free_count()`.
    pub fn promote(&mut self, tick: Tick) -> Result<usize, InvariantError> {
        let promoted = self.waiting.promote(self.slots.free_count());
        let count = promoted.len();
        for entity in promoted {
            match self.slots.admit(entity) {
                Ok(slot) => {
                    if let Some(occupant) = self.slots.get_mut(slot) {
                        occupant.assign(tick);
                    }
                }
                Err(full) => {
                    return Err(InvariantError::PromotionOverflow {
                        id: full.into_inner().id.get(),
                        limit: self.slots.limit(),
                    });
                }
            }
        }
        Ok(count)
    }

    /// Slot table capacity.
    #[inline]
    pub fn limit(&self) -> usize {
        self.slots.limit()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn assigned(&self) -> usize {
        self.slots.occupied()
    }

    /// Number of queued entities.
    #[inline]
    pub fn awaiting(&self) -> usize {
        self.waiting.len()
    }

    /// Entities completed since the registry was created.
    #[inline]
    pub fn completed_total(&self) -> u64 {
        self.completed_total
    }

    /// Read access to the slot table.
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Read access to the wait queue.
    pub fn queue(&self) -> &WaitQueue {
        &self.waiting
    }
}
