//! # Events emitted by the pipeline.
//!
//! The [`EventKind`] enum classifies what happened:
//! - **Run events**: start, shutdown request, finish
//! - **Tick events**: one per completed tick, carrying its summary and the
//!   entities that finished during it
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Subscribers receive events in publication order; use `seq`
//! when merging streams from several subscribers.
//!
//! ## Example
//! ```rust
//! use registrar::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RunFinished)
//!     .with_tick(12)
//!     .with_completed_total(40);
//!
//! assert_eq!(ev.kind, EventKind::RunFinished);
//! assert_eq!(ev.completed_total, Some(40));
//! assert!(ev.finished.is_empty());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::engine::{StopReason, TickOutcome, TickSummary};
use crate::entity::{Entity, Tick};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of pipeline events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Pipeline entered `Running`.
    ///
    /// Sets:
    /// - `limit`: slot capacity
    /// - `budget`: ticks to run
    RunStarted,

    /// One tick completed.
    ///
    /// Sets:
    /// - `tick`: tick number
    /// - `summary`: counters after the tick
    /// - `finished`: entities completed during the tick
    TickCompleted,

    /// Cancellation observed at a tick boundary.
    ///
    /// Sets:
    /// - `tick`: last completed tick
    ShutdownRequested,

    /// Pipeline reached `Stopped`.
    ///
    /// Sets:
    /// - `tick`: last completed tick
    /// - `completed_total`: completions over the whole run
    /// - `reason`: stop reason label
    RunFinished,
}

/// Pipeline event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Tick the event refers to.
    pub tick: Option<Tick>,
    /// Counters after a tick.
    pub summary: Option<TickSummary>,
    /// Entities completed during the tick (empty for non-tick events).
    pub finished: Arc<[Entity]>,
    /// Cumulative completions.
    pub completed_total: Option<u64>,
    /// Slot capacity.
    pub limit: Option<usize>,
    /// Tick budget of the run.
    pub budget: Option<u64>,
    /// Human-readable reason (stop reason, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            tick: None,
            summary: None,
            finished: Arc::from(Vec::new()),
            completed_total: None,
            limit: None,
            budget: None,
            reason: None,
        }
    }

    /// Builds a [`EventKind::TickCompleted`] event from a tick's outcome.
    pub fn tick_completed(outcome: TickOutcome) -> Self {
        let TickOutcome { summary, finished } = outcome;
        let mut ev = Event::new(EventKind::TickCompleted)
            .with_tick(summary.tick)
            .with_completed_total(summary.completed_total);
        ev.summary = Some(summary);
        ev.finished = Arc::from(finished);
        ev
    }

    /// Builds a [`EventKind::RunFinished`] event.
    pub fn run_finished(tick: Tick, completed_total: u64, reason: StopReason) -> Self {
        Event::new(EventKind::RunFinished)
            .with_tick(tick)
            .with_completed_total(completed_total)
            .with_reason(reason.as_label())
    }

    /// Attaches a tick number.
    #[inline]
    pub fn with_tick(mut self, tick: Tick) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Attaches the cumulative completion count.
    #[inline]
    pub fn with_completed_total(mut self, total: u64) -> Self {
        self.completed_total = Some(total);
        self
    }

    /// Attaches the slot capacity.
    #[inline]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attaches the tick budget.
    #[inline]
    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True if this run ended because of a cancellation.
    #[inline]
    pub fn is_cancelled_finish(&self) -> bool {
        self.kind == EventKind::RunFinished
            && self.reason.as_deref() == Some(StopReason::Cancelled.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::RunStarted);
        let b = Event::new(EventKind::RunStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_tick_completed_carries_outcome() {
        let summary = TickSummary {
            tick: 2,
            added: 1,
            finished: 1,
            promoted: 0,
            assigned: 1,
            limit: 1,
            awaiting: 0,
            completed_total: 1,
        };
        let done = Entity::new(1, "Ada", "Lovelace", "example.com", 1);
        let ev = Event::tick_completed(TickOutcome {
            summary,
            finished: vec![done],
        });
        assert_eq!(ev.kind, EventKind::TickCompleted);
        assert_eq!(ev.tick, Some(2));
        assert_eq!(ev.summary, Some(summary));
        assert_eq!(ev.finished.len(), 1);
    }

    #[test]
    fn test_run_finished_reason() {
        let ev = Event::run_finished(5, 3, StopReason::Cancelled);
        assert!(ev.is_cancelled_finish());
        let ev = Event::run_finished(5, 3, StopReason::BudgetExhausted);
        assert!(!ev.is_cancelled_finish());
        assert_eq!(ev.reason.as_deref(), Some("budget_exhausted"));
    }
}
