//! Error types used by the registrar engine and its configuration layer.
//!
//! This module defines four error types:
//!
//! - [`ConfigError`]: invalid or unreadable configuration; fatal before the first tick.
//! - [`CapacityError`]: internal signal from [`SlotTable::admit`](crate::SlotTable::admit)
//!   when every slot is occupied; the orchestrator turns it into a queue append.
//! - [`InvariantError`]: the slot table or wait queue reached a state their contracts forbid.
//! - [`RuntimeError`]: errors that abort a running [`Pipeline`](crate::Pipeline).
//!
//! All of them provide `as_label` for logs.

use std::path::PathBuf;

use thiserror::Error;

use crate::entity::Entity;

/// # Errors produced while loading or validating configuration.
///
/// Raised before any tick runs; never mid-run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("cannot read config {path:?}: {source}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Configuration document is not valid TOML or misses required keys.
    #[error("config is not a valid document: {0}")]
    Parse(#[from] toml::de::Error),

    /// An inclusive range has `min > max`.
    #[error("{field}: min {min} is greater than max {max}")]
    InvertedRange {
        /// Range name, e.g. `generator.user_per_tick`.
        field: &'static str,
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },

    /// A value that must be strictly positive is zero.
    #[error("{field} must be positive")]
    NotPositive {
        /// Offending key.
        field: &'static str,
    },

    /// A name list is empty.
    #[error("{field} must contain at least one entry")]
    EmptyList {
        /// Offending key.
        field: &'static str,
    },

    /// The inter-tick delay is negative, NaN or too large for a `Duration`.
    #[error("pipeline.tick_time_interval must be a finite non-negative number of seconds, got {0}")]
    InvalidInterval(f64),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use registrar::ConfigError;
    ///
    /// let err = ConfigError::NotPositive { field: "registry.limit" };
    /// assert_eq!(err.as_label(), "config_not_positive");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "config_read",
            ConfigError::Parse(_) => "config_parse",
            ConfigError::InvertedRange { .. } => "config_inverted_range",
            ConfigError::NotPositive { .. } => "config_not_positive",
            ConfigError::EmptyList { .. } => "config_empty_list",
            ConfigError::InvalidInterval(_) => "config_invalid_interval",
        }
    }
}

/// Every slot is occupied.
///
/// Carries the rejected entity back to the caller so it can be queued instead.
#[derive(Error, Debug)]
#[error("no free slot for entity {}", .0.id)]
pub struct CapacityError(pub Entity);

impl CapacityError {
    /// Returns the entity that could not be admitted.
    pub fn into_inner(self) -> Entity {
        self.0
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        "capacity_full"
    }
}

/// # Internal-invariant violations.
///
/// These cannot happen while the slot table and wait queue honour their
/// contracts. Seeing one means the run state is corrupt.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// Promotion handed out more entities than there were free slots.
    #[error("promoted entity {id} found no free slot (limit {limit})")]
    PromotionOverflow {
        /// Entity that could not be placed.
        id: u64,
        /// Slot table capacity.
        limit: usize,
    },

    /// `generated != completed + assigned + awaiting`.
    #[error(
        "conservation broken: generated={generated} completed={completed} assigned={assigned} awaiting={awaiting}"
    )]
    Conservation {
        /// Entities ever produced by the generator.
        generated: u64,
        /// Entities that finished processing.
        completed: u64,
        /// Entities currently in slots.
        assigned: usize,
        /// Entities currently waiting.
        awaiting: usize,
    },
}

impl InvariantError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            InvariantError::PromotionOverflow { .. } => "invariant_promotion_overflow",
            InvariantError::Conservation { .. } => "invariant_conservation",
        }
    }
}

/// # Errors that abort a running pipeline.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Engine state broke an invariant during a tick.
    #[error("tick {tick} aborted: {source}")]
    Invariant {
        /// Tick during which the violation was detected.
        tick: u64,
        /// What broke.
        #[source]
        source: InvariantError,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Invariant { .. } => "runtime_invariant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_returns_entity() {
        let entity = Entity::new(7, "Ada", "Lovelace", "example.com", 3);
        let err = CapacityError(entity);
        assert_eq!(err.to_string(), "no free slot for entity #7");
        assert_eq!(err.as_label(), "capacity_full");
        assert_eq!(err.into_inner().id.get(), 7);
    }

    #[test]
    fn test_invariant_error_labels() {
        let overflow = InvariantError::PromotionOverflow { id: 4, limit: 2 };
        assert_eq!(overflow.as_label(), "invariant_promotion_overflow");

        let conservation = InvariantError::Conservation {
            generated: 5,
            completed: 1,
            assigned: 2,
            awaiting: 1,
        };
        assert_eq!(conservation.as_label(), "invariant_conservation");
    }

    #[test]
    fn test_inverted_range_message() {
        let err = ConfigError::InvertedRange {
            field: "generator.processing_time",
            min: 5,
            max: 2,
        };
        assert_eq!(
            err.to_string(),
            "generator.processing_time: min 5 is greater than max 2"
        );
        assert_eq!(err.as_label(), "config_inverted_range");
    }

    #[test]
    fn test_runtime_error_label() {
        let err = RuntimeError::Invariant {
            tick: 3,
            source: InvariantError::PromotionOverflow { id: 1, limit: 2 },
        };
        assert_eq!(err.as_label(), "runtime_invariant");
        assert!(err.to_string().starts_with("tick 3 aborted"));
    }
}
