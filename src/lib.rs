//! # registrar
//!
//! **Registrar** simulates a bounded-capacity registration desk in discrete
//! ticks. Each tick new entities arrive, take one of `limit` processing slots
//! if one is free, or wait in a FIFO queue until a slot frees up.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐
//!     │  Generator   │  (Arrivals: random batch per tick)
//!     └──────┬───────┘
//!            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Engine (one tick, synchronous)                                   │
//! │  - Registry                                                       │
//! │      ├─ SlotTable  (limit slots, remaining time per occupant)     │
//! │      └─ WaitQueue  (FIFO of entities without a slot)              │
//! │  - counters + invariant checks                                    │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Pipeline (async tick loop, CancellationToken, tick delay)        │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼ Event per tick
//!                       ┌────────────────────────┐
//!                       │     SubscriberSet      │
//!                       │   (per-sub queues)     │
//!                       └───┬────────────────┬───┘
//!                           ▼                ▼
//!                       LogWriter        CsvRecorder
//!                    (tracing lines)   (completed rows)
//! ```
//!
//! ### Tick
//! ```text
//! tick N:
//!   ├─► advance   remaining -= 1 in every slot; 0 → completed, slot freed
//!   ├─► promote   min(free, waiting) from queue head into slots
//!   ├─► arrivals  each: free slot → Assigned, otherwise → Waiting
//!   └─► summary   Users Added | Finished | Assigned | Awaiting | Completed total
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                  |
//! |-------------------|----------------------------------------------------------|-------------------------------------|
//! | **Registry**      | Slot table, wait queue, admission and promotion.         | [`Registry`], [`SlotTable`], [`WaitQueue`] |
//! | **Arrivals**      | Pluggable per-tick entity source.                        | [`Arrivals`], [`Generator`]         |
//! | **Engine**        | One tick plus invariant checks.                          | [`Engine`], [`TickSummary`]         |
//! | **Runner**        | Budgeted, cancellable tick loop.                         | [`Pipeline`], [`RunReport`]         |
//! | **Subscriber API**| Observe ticks (logging, CSV, custom reporters).          | [`Subscribe`], [`SubscriberSet`]    |
//! | **Configuration** | TOML settings with validation.                           | [`Config`]                          |
//! | **Errors**        | Typed errors for config, capacity and invariants.        | [`ConfigError`], [`RuntimeError`]   |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use registrar::{Config, Engine, Pipeline, SubscriberSet};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.generator.seed = Some(7);
//!
//!     let engine = Engine::from_config(&cfg)?;
//!     let pipeline = Pipeline::new(engine, SubscriberSet::empty(), 10, Duration::ZERO);
//!     let report = pipeline.run(CancellationToken::new()).await?;
//!
//!     assert_eq!(report.ticks, 10);
//!     Ok(())
//! }
//! ```
mod config;
mod engine;
mod entity;
mod error;
mod events;
mod generator;
mod registry;
mod subscribers;

// ---- Public re-exports ----

pub use config::{Config, FileConfig, GeneratorConfig, PipelineConfig, RegistryConfig};
pub use engine::{
    Engine, Pipeline, RunReport, RunState, StopReason, TickOutcome, TickSummary, shutdown,
};
pub use entity::{Entity, EntityId, Status, Tick};
pub use error::{CapacityError, ConfigError, InvariantError, RuntimeError};
pub use events::{Event, EventKind};
pub use generator::{Arrivals, Generator, NamePool};
pub use registry::{Admission, Registry, SlotTable, WaitQueue};
pub use subscribers::{CSV_HEADER, CsvRecorder, LogWriter, Subscribe, SubscriberSet, encode_row};
