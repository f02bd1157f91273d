//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for reporters (log lines,
//! CSV records, metrics) attached to a [`Pipeline`](crate::Pipeline).
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs concurrently with the tick loop)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged)
//!
//! ## Rules
//! - Delivery is lossless: when a queue is full the tick loop waits at the
//!   next tick boundary until the worker catches up.
//! - Events are processed sequentially (FIFO) per subscriber.
//! - Errors (e.g. failed writes) are handled inside the subscriber; they never
//!   stop the simulation.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use registrar::{Event, EventKind, Subscribe};
//!
//! struct Backlog;
//!
//! #[async_trait]
//! impl Subscribe for Backlog {
//!     async fn on_event(&self, ev: &Event) {
//!         if let (EventKind::TickCompleted, Some(s)) = (ev.kind, ev.summary) {
//!             if s.awaiting > 100 {
//!                 // raise an alert, etc.
//!             }
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "backlog" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for pipeline observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the tick loop.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// This is how far the subscriber may lag behind the tick loop before
    /// the loop waits for it. The runtime clamps capacity to a minimum of 1.
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
