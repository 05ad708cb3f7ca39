//! Mutex-guarded book
//!
//! Every read and write takes the same `parking_lot::Mutex`. Simplest of the
//! three disciplines and always consistent; readers queue behind writers.

use super::{ConcurrentBook, SyncPolicy};
use crate::config::BookConfig;
use crate::core::{BookError, ConfigError, PriceLevel, Side};
use crate::orderbook::{Admission, BookSnapshot, LevelBook};
use parking_lot::Mutex;

pub struct ExclusiveBook {
    inner: Mutex<LevelBook>,
}

impl ExclusiveBook {
    pub fn new(precision: u32, depth: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Mutex::new(LevelBook::new(precision, depth)?),
        })
    }

    pub fn from_config(config: &BookConfig) -> Result<Self, ConfigError> {
        Self::new(config.precision, config.depth)
    }

    /// Consistent copy of both sides, taken under the lock
    pub fn snapshot(&self) -> BookSnapshot {
        self.inner.lock().snapshot()
    }

    /// Run `f` with the lock held
    pub fn with_book<R>(&self, f: impl FnOnce(&mut LevelBook) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl ConcurrentBook for ExclusiveBook {
    fn add_order(&self, level: PriceLevel, side: Side) -> Admission {
        self.inner.lock().add_order(level, side)
    }

    fn update_order(&self, level: PriceLevel, side: Side) -> Admission {
        self.inner.lock().update_order(level, side)
    }

    fn delete_order(&self, level: PriceLevel, side: Side) -> bool {
        self.inner.lock().delete_order(level, side)
    }

    fn best_bid(&self) -> Result<PriceLevel, BookError> {
        self.inner.lock().best_bid()
    }

    fn lowest_bid(&self) -> Result<PriceLevel, BookError> {
        self.inner.lock().lowest_bid()
    }

    fn best_offer(&self) -> Result<PriceLevel, BookError> {
        self.inner.lock().best_offer()
    }

    fn highest_offer(&self) -> Result<PriceLevel, BookError> {
        self.inner.lock().highest_offer()
    }

    fn policy(&self) -> SyncPolicy {
        SyncPolicy::Exclusive
    }
}
