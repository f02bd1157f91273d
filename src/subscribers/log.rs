//! # LogWriter: per-tick progress through `tracing`.
//!
//! A subscriber that turns pipeline [`Event`]s into log lines.
//!
//! ## Example output
//! ```text
//! INFO run started limit=20 budget=100
//! INFO tick=1 Users Added: 3 | Users Finished: 0 | Users Assigned: 3/20 | Users Awaiting: 0 | Users Completed total: 0
//! INFO Simulation stopped by user
//! INFO Simulation finished. Total completed: 42
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Tracing-backed event writer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::RunStarted => {
                tracing::info!(limit = ?e.limit, budget = ?e.budget, "run started");
            }
            EventKind::TickCompleted => {
                if let Some(summary) = e.summary {
                    tracing::info!(tick = summary.tick, "{summary}");
                    for done in e.finished.iter() {
                        tracing::debug!(
                            tick = summary.tick,
                            id = done.id.get(),
                            waited = ?done.waited(),
                            "completed {done}"
                        );
                    }
                }
            }
            EventKind::ShutdownRequested => {
                tracing::info!(tick = ?e.tick, "Simulation stopped by user");
            }
            EventKind::RunFinished => {
                tracing::info!(
                    tick = ?e.tick,
                    reason = e.reason.as_deref().unwrap_or("unknown"),
                    "Simulation finished. Total completed: {}",
                    e.completed_total.unwrap_or(0)
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
