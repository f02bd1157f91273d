use std::fmt;

use crate::entity::{Entity, Tick};

/// Counters observed at the end of one tick.
///
/// `added`, `finished` and `promoted` are per tick; `assigned` and `awaiting`
/// are the state after the tick; `completed_total` is cumulative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// Tick number (1-based).
    pub tick: Tick,
    /// Entities accepted from the generator this tick.
    pub added: usize,
    /// Entities that completed this tick.
    pub finished: usize,
    /// Entities moved from the queue into slots this tick.
    pub promoted: usize,
    /// Occupied slots.
    pub assigned: usize,
    /// Slot capacity.
    pub limit: usize,
    /// Queue length.
    pub awaiting: usize,
    /// Completions since the run started.
    pub completed_total: u64,
}

impl fmt::Display for TickSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Users Added: {} | Users Finished: {} | Users Assigned: {}/{} | Users Awaiting: {} | Users Completed total: {}",
            self.added,
            self.finished,
            self.assigned,
            self.limit,
            self.awaiting,
            self.completed_total,
        )
    }
}

/// Everything one tick produced.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// Counters after the tick.
    pub summary: TickSummary,
    /// Entities that completed during the tick, stamped with `completed_at`.
    pub finished: Vec<Entity>,
}
