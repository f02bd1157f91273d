//! Pipeline events.
//!
//! This module holds the event **data model** handed from the
//! [`Pipeline`](crate::Pipeline) to [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publisher**: `Pipeline::run` (single writer, one event per tick plus run markers).
//! - **Consumers**: `LogWriter` (per-tick log lines), `CsvRecorder` (completed rows),
//!   user subscribers.

mod event;

pub use event::{Event, EventKind};
