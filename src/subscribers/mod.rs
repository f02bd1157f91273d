//! # Reporting subscribers.
//!
//! Subscribers observe pipeline [`Event`](crate::Event)s off the tick path.
//! Each one runs in its own worker task behind a bounded queue owned by
//! [`SubscriberSet`].
//!
//! ## Contents
//! - [`Subscribe`] the extension trait
//! - [`SubscriberSet`] lossless fan-out with bounded queues
//! - [`LogWriter`] per-tick log lines and the final summary
//! - [`CsvRecorder`] completed entities persisted as CSV

mod csv;
mod log;
mod set;
mod subscriber;

pub use csv::{CsvRecorder, HEADER as CSV_HEADER, encode_row};
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
