//! # Tick engine and its async driver.
//!
//! - [`Engine`] runs one synchronous tick over the registry.
//! - [`Pipeline`] repeats ticks on a timer, publishes events and honours
//!   cancellation.
//! - [`shutdown`] maps OS signals onto a cancellation token.

mod core;
mod pipeline;
pub mod shutdown;
mod state;
mod summary;

pub use core::Engine;
pub use pipeline::{Pipeline, RunReport};
pub use state::{RunState, StopReason};
pub use summary::{TickOutcome, TickSummary};
