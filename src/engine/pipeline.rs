//! # Pipeline: drives the engine tick by tick.
//!
//! Owns an [`Engine`] and a [`SubscriberSet`], runs up to `budget` ticks
//! and publishes one event per tick. Cancellation is cooperative and only
//! observed at tick boundaries.
//!
//! ## Loop
//! ```text
//! publish RunStarted
//! loop {
//!   ├─► token cancelled?        → Cancelled
//!   ├─► budget == 0?            → BudgetExhausted
//!   ├─► engine.tick()           (Err → RuntimeError::Invariant)
//!   ├─► publish TickCompleted   (waits while a subscriber queue is full)
//!   ├─► budget -= 1
//!   └─► if budget > 0:
//!        select! { sleep(tick_delay), token.cancelled() }
//! }
//! publish [ShutdownRequested] + RunFinished
//! subscribers.shutdown()        (queues drained)
//! ```
//!
//! ## Rules
//! - A tick is never interrupted; a signal during a tick takes effect after it.
//! - Every tick's event reaches every subscriber; a slow subscriber slows the
//!   loop down at the tick boundary instead of losing events.
//! - No delay follows the last tick of the budget.
//! - Subscribers are drained on every exit path, including errors.

use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::entity::Tick;
use crate::error::RuntimeError;
use crate::events::{Event, EventKind};
use crate::generator::{Arrivals, Generator};
use crate::subscribers::SubscriberSet;

use super::core::Engine;
use super::state::{RunState, StopReason};

/// Result of a finished run.
pub struct RunReport<A = Generator> {
    /// Ticks executed.
    pub ticks: Tick,
    /// Entities completed over the run.
    pub completed_total: u64,
    /// Why the run stopped.
    pub reason: StopReason,
    /// Final engine state, for inspection.
    pub engine: Engine<A>,
}

/// Tick loop with reporting and cooperative cancellation.
pub struct Pipeline<A = Generator> {
    engine: Engine<A>,
    subs: SubscriberSet,
    budget: u64,
    tick_delay: Duration,
}

impl<A: Arrivals> Pipeline<A> {
    /// Creates a pipeline that runs `budget` ticks spaced by `tick_delay`.
    pub fn new(engine: Engine<A>, subs: SubscriberSet, budget: u64, tick_delay: Duration) -> Self {
        Self {
            engine,
            subs,
            budget,
            tick_delay,
        }
    }

    /// Runs until the budget is exhausted, `token` is cancelled or an
    /// invariant breaks.
    pub async fn run(mut self, token: CancellationToken) -> Result<RunReport<A>, RuntimeError> {
        self.subs
            .emit(
                Event::new(EventKind::RunStarted)
                    .with_limit(self.engine.registry().limit())
                    .with_budget(self.budget),
            )
            .await;

        let outcome = self.drive(&token).await;

        let tick = self.engine.current_tick();
        let completed_total = self.engine.completed_total();
        match &outcome {
            Ok(reason) => {
                if *reason == StopReason::Cancelled {
                    self.subs
                        .emit(Event::new(EventKind::ShutdownRequested).with_tick(tick))
                        .await;
                }
                self.subs
                    .emit(Event::run_finished(tick, completed_total, *reason))
                    .await;
            }
            Err(e) => {
                tracing::error!(tick, error = %e, label = e.as_label(), "run aborted");
            }
        }
        self.subs.shutdown().await;

        let reason = outcome?;
        Ok(RunReport {
            ticks: tick,
            completed_total,
            reason,
            engine: self.engine,
        })
    }

    async fn drive(&mut self, token: &CancellationToken) -> Result<StopReason, RuntimeError> {
        let mut remaining = self.budget;
        let mut state = RunState::Running;
        let mut reason = StopReason::BudgetExhausted;

        while state == RunState::Running {
            if token.is_cancelled() {
                reason = StopReason::Cancelled;
                state = RunState::Stopped;
                continue;
            }
            if remaining == 0 {
                state = RunState::Stopped;
                continue;
            }

            let outcome = self
                .engine
                .tick()
                .map_err(|source| RuntimeError::Invariant {
                    tick: self.engine.current_tick(),
                    source,
                })?;
            self.subs.emit(Event::tick_completed(outcome)).await;
            remaining -= 1;

            if remaining == 0 || token.is_cancelled() || self.tick_delay.is_zero() {
                continue;
            }
            let sleep = time::sleep(self.tick_delay);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => {}
            }
        }
        Ok(reason)
    }
}
