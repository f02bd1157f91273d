//! # Arrival generation.
//!
//! [`Arrivals`] is the seam between the engine and whatever produces new
//! entities each tick. [`Generator`] is the random implementation driven by
//! [`GeneratorConfig`]; tests plug in scripted sources instead.
//!
//! ## Sampling
//! Per call to [`Arrivals::generate_batch`]:
//! - batch size `n ~ U[min_user_per_tick, max_user_per_tick]`
//! - per entity: name, surname `~ U(list)` with replacement,
//!   processing time `~ U[min_processing_time, max_processing_time]`
//!
//! Ranges are validated once at construction; sampling never fails.
//!
//! ## Example
//! ```rust
//! use rand::{SeedableRng, rngs::StdRng};
//! use registrar::{Arrivals, Config, Generator};
//!
//! let mut cfg = Config::default().generator;
//! cfg.min_user_per_tick = 3;
//! cfg.max_user_per_tick = 3;
//!
//! let mut generator = Generator::with_rng(&cfg, StdRng::seed_from_u64(1)).unwrap();
//! let batch = generator.generate_batch();
//! assert_eq!(batch.len(), 3);
//! assert!(batch.windows(2).all(|w| w[0].id < w[1].id));
//! ```

mod names;

pub use names::NamePool;

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GeneratorConfig;
use crate::entity::Entity;
use crate::error::ConfigError;

/// Source of new entities, polled once per tick after promotion.
pub trait Arrivals: Send {
    /// Produces this tick's arrivals.
    ///
    /// Ids must be unique and increasing across the whole run.
    fn generate_batch(&mut self) -> Vec<Entity>;
}

/// Random arrival generator with an injectable RNG.
pub struct Generator<R = StdRng> {
    users_per_tick: RangeInclusive<u32>,
    processing_time: RangeInclusive<u32>,
    pool: NamePool,
    email_domain: String,
    rng: R,
    /// Next id to hand out; never reused.
    next_seq: u64,
}

impl Generator<StdRng> {
    /// Builds a generator seeded from `cfg.seed`, or from the OS when unset.
    pub fn from_config(cfg: &GeneratorConfig) -> Result<Self, ConfigError> {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(cfg, rng)
    }
}

impl<R: Rng> Generator<R> {
    /// Builds a generator drawing from `rng`.
    ///
    /// Fails if `cfg` does not validate.
    pub fn with_rng(cfg: &GeneratorConfig, rng: R) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            users_per_tick: cfg.users_per_tick(),
            processing_time: cfg.processing_time(),
            pool: NamePool::new(cfg.names.clone(), cfg.surnames.clone())?,
            email_domain: cfg.email_domain.clone(),
            rng,
            next_seq: 1,
        })
    }

    /// Number of entities generated so far.
    #[inline]
    pub fn generated(&self) -> u64 {
        self.next_seq - 1
    }

    fn next_entity(&mut self) -> Entity {
        let seq = self.next_seq;
        self.next_seq += 1;

        let (name, surname) = self.pool.draw(&mut self.rng);
        let processing_time = self.rng.random_range(self.processing_time.clone());
        Entity::new(seq, name, surname, &self.email_domain, processing_time)
    }
}

impl<R: Rng + Send> Arrivals for Generator<R> {
    fn generate_batch(&mut self) -> Vec<Entity> {
        let count = self.rng.random_range(self.users_per_tick.clone());
        (0..count).map(|_| self.next_entity()).collect()
    }
}
