//! # Entities flowing through the registry.
//!
//! An [`Entity`] is born in the [`Generator`](crate::Generator),
//! lives in the wait queue and/or a slot, and is counted into the completed
//! total when its remaining time reaches zero.
//!
//! ## Lifecycle
//! ```text
//! Unassigned ──add()──► Waiting ──promote()──► Assigned ──advance()──► Completed
//!      │                                          ▲
//!      └────────────── add() (free slot) ─────────┘
//! ```

use std::fmt;

/// Tick number, 1-based. Tick 0 means "before the run started".
pub type Tick = u64;

/// Globally unique, monotonically increasing entity identity.
///
/// Ids are never reused, even after the entity completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Wraps a raw sequence number.
    #[inline]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Returns the raw sequence number.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an entity is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Generated, not yet handed to the registry.
    Unassigned,
    /// Sitting in the wait queue.
    Waiting,
    /// Occupying a processing slot.
    Assigned,
    /// Finished processing.
    Completed,
}

impl Status {
    /// Returns a short stable label (snake_case) for use in logs and output.
    pub fn as_label(&self) -> &'static str {
        match self {
            Status::Unassigned => "unassigned",
            Status::Waiting => "waiting",
            Status::Assigned => "assigned",
            Status::Completed => "completed",
        }
    }
}

/// A person registering for processing.
///
/// `remaining_time` is the only field mutated while the entity sits in a slot;
/// status and tick stamps are set by the registry on transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Sequence identity.
    pub id: EntityId,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Contact address derived from name and surname.
    pub email: String,
    /// Processing time drawn at generation (never changes).
    pub processing_time: u32,
    /// Ticks left until completion.
    pub remaining_time: u32,
    /// Current lifecycle state.
    pub status: Status,
    /// Tick at which the registry accepted the entity.
    pub registered_at: Option<Tick>,
    /// Tick at which the entity entered a slot.
    pub assigned_at: Option<Tick>,
    /// Tick at which processing finished.
    pub completed_at: Option<Tick>,
}

impl Entity {
    /// Creates a new unassigned entity.
    ///
    /// The e-mail is `name.surname@domain`.
    pub fn new(
        seq: u64,
        name: impl Into<String>,
        surname: impl Into<String>,
        email_domain: &str,
        processing_time: u32,
    ) -> Self {
        let name = name.into();
        let surname = surname.into();
        let email = format!("{name}.{surname}@{email_domain}");
        Self {
            id: EntityId::new(seq),
            name,
            surname,
            email,
            processing_time,
            remaining_time: processing_time,
            status: Status::Unassigned,
            registered_at: None,
            assigned_at: None,
            completed_at: None,
        }
    }

    /// Marks the entity as accepted by the registry (first time only).
    pub(crate) fn register(&mut self, tick: Tick) {
        if self.registered_at.is_none() {
            self.registered_at = Some(tick);
        }
        self.status = Status::Waiting;
    }

    /// Marks the entity as occupying a slot.
    pub(crate) fn assign(&mut self, tick: Tick) {
        self.assigned_at = Some(tick);
        self.status = Status::Assigned;
    }

    /// Marks the entity as finished.
    pub(crate) fn complete(&mut self, tick: Tick) {
        self.completed_at = Some(tick);
        self.status = Status::Completed;
    }

    /// Ticks spent in the wait queue, once assigned.
    pub fn waited(&self) -> Option<Tick> {
        Some(self.assigned_at?.saturating_sub(self.registered_at?))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} <{}> status={} processing_time={}",
            self.id,
            self.name,
            self.surname,
            self.email,
            self.status.as_label(),
            self.processing_time,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_is_unassigned_with_full_time() {
        let e = Entity::new(1, "Jan", "Kowalski", "gmail.com", 4);
        assert_eq!(e.email, "Jan.Kowalski@gmail.com");
        assert_eq!(e.status, Status::Unassigned);
        assert_eq!(e.remaining_time, 4);
        assert_eq!(e.processing_time, 4);
        assert!(e.registered_at.is_none());
    }

    #[test]
    fn test_register_keeps_first_tick() {
        let mut e = Entity::new(1, "Jan", "Kowalski", "gmail.com", 4);
        e.register(2);
        e.register(5);
        assert_eq!(e.registered_at, Some(2));
        assert_eq!(e.status, Status::Waiting);
    }

    #[test]
    fn test_waited_ticks() {
        let mut e = Entity::new(1, "Jan", "Kowalski", "gmail.com", 4);
        assert_eq!(e.waited(), None);
        e.register(2);
        e.assign(6);
        assert_eq!(e.waited(), Some(4));
    }
}
