use crate::entity::Entity;
use crate::error::CapacityError;

/// Fixed-capacity table of processing slots.
///
/// Each slot is either empty or holds exactly one [`Entity`]. Free slots are
/// interchangeable: `admit` makes no promise about which index it picks.
///
/// ## Invariants
/// - `occupied() + free_count() == limit()`
/// - `occupied() <= limit()` (capacity never grows or shrinks)
#[derive(Debug)]
pub struct SlotTable {
    slots: Vec<Option<Entity>>,
    /// Stack of empty slot indices.
    free: Vec<usize>,
}

impl SlotTable {
    /// Creates a table with `limit` empty slots.
    ///
    /// `limit = 0` is allowed; every admission then fails.
    pub fn new(limit: usize) -> Self {
        Self {
            slots: (0..limit).map(|_| None).collect(),
            free: (0..limit).rev().collect(),
        }
    }

    /// Capacity of the table.
    #[inline]
    pub fn limit(&self) -> usize {
        self.slots.len()
    }

    /// Number of empty slots.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.limit() - self.free_count()
    }

    /// Places `entity` into any free slot and returns its index.
    ///
    /// Fails with [`CapacityError`] (handing the entity back) when the table is full.
    pub fn admit(&mut self, entity: Entity) -> Result<usize, CapacityError> {
        let Some(index) = self.free.pop() else {
            return Err(CapacityError(entity));
        };
        debug_assert!(self.slots[index].is_none(), "free slot {index} is occupied");
        self.slots[index] = Some(entity);
        Ok(index)
    }

    /// Decrements every occupant by one tick and vacates the ones that reach zero.
    ///
    /// Returns the finished entities in slot order. The number returned equals
    /// the number of slots vacated by this call.
    pub fn advance(&mut self) -> Vec<Entity> {
        let mut finished = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(entity) = slot else { continue };
            entity.remaining_time = entity.remaining_time.saturating_sub(1);
            if entity.remaining_time > 0 {
                continue;
            }
            if let Some(done) = slot.take() {
                finished.push(done);
                self.free.push(index);
            }
        }
        finished
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Iterates over occupied slots as `(index, entity)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|e| (index, e)))
    }
}
