//! Book with unlocked writes and lock-published anchors
//!
//! Slot writes go straight to an [`AtomicLevelBuffer`]. The occupied span of
//! each side is also published behind a `parking_lot::RwLock`; a writer takes
//! the write lock only when its write moved an anchor, so in-range updates
//! never touch the lock. Readers take the read lock just long enough to copy
//! the published span and then load the slot it points at.

use super::atomic::AtomicLevelBuffer;
use super::{ConcurrentBook, SyncPolicy};
use crate::config::BookConfig;
use crate::core::{BookError, ConfigError, PriceLevel, Side};
use crate::orderbook::{Admission, SlotRange};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Occupied spans as last published by each side's writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishedAnchors {
    pub bids: Option<SlotRange>,
    pub offers: Option<SlotRange>,
}

impl PublishedAnchors {
    #[inline(always)]
    fn get(&self, side: Side) -> Option<SlotRange> {
        match side {
            Side::Bid => self.bids,
            Side::Offer => self.offers,
        }
    }

    #[inline(always)]
    fn set(&mut self, side: Side, range: Option<SlotRange>) {
        match side {
            Side::Bid => self.bids = range,
            Side::Offer => self.offers = range,
        }
    }
}

pub struct SnapshotBook {
    bids: AtomicLevelBuffer,
    offers: AtomicLevelBuffer,
    published: RwLock<PublishedAnchors>,
    publishes: AtomicU64,
}

impl SnapshotBook {
    pub fn new(precision: u32, depth: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            bids: AtomicLevelBuffer::new(Side::Bid, precision, depth)?,
            offers: AtomicLevelBuffer::new(Side::Offer, precision, depth)?,
            published: RwLock::new(PublishedAnchors::default()),
            publishes: AtomicU64::new(0),
        })
    }

    pub fn from_config(config: &BookConfig) -> Result<Self, ConfigError> {
        Self::new(config.precision, config.depth)
    }

    #[inline(always)]
    fn buffer(&self, side: Side) -> &AtomicLevelBuffer {
        match side {
            Side::Bid => &self.bids,
            Side::Offer => &self.offers,
        }
    }

    /// Copy of the published spans
    pub fn anchors(&self) -> PublishedAnchors {
        *self.published.read()
    }

    /// Number of times a writer took the write lock
    pub fn publish_count(&self) -> u64 {
        self.publishes.load(Ordering::Relaxed)
    }

    /// Run a write and publish the new span if it changed
    fn write<R>(&self, side: Side, op: impl FnOnce(&AtomicLevelBuffer) -> R) -> R {
        let buffer = self.buffer(side);
        let before = buffer.range();
        let result = op(buffer);
        let after = buffer.range();

        if before != after {
            self.published.write().set(side, after);
            self.publishes.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    /// Load the best or worst level of `side` via the published span
    fn read(&self, side: Side, best: bool) -> Result<PriceLevel, BookError> {
        let range = self.published.read().get(side);
        let Some(range) = range else {
            return Err(BookError::EmptyBook { side });
        };

        let anchor = match (side, best) {
            (Side::Bid, true) | (Side::Offer, false) => range.high,
            _ => range.low,
        };

        let buffer = self.buffer(side);
        let level = buffer.slot(anchor.index);
        if !buffer.holds(anchor, &level) {
            // Published span is behind a delete or an invalidation
            return if best { buffer.best() } else { buffer.worst() };
        }
        Ok(level)
    }
}

impl ConcurrentBook for SnapshotBook {
    fn add_order(&self, level: PriceLevel, side: Side) -> Admission {
        self.write(side, |buffer| buffer.add_or_update(level))
    }

    fn update_order(&self, level: PriceLevel, side: Side) -> Admission {
        self.write(side, |buffer| buffer.add_or_update(level))
    }

    fn delete_order(&self, level: PriceLevel, side: Side) -> bool {
        self.write(side, |buffer| buffer.delete(level.price))
    }

    fn best_bid(&self) -> Result<PriceLevel, BookError> {
        self.read(Side::Bid, true)
    }

    fn lowest_bid(&self) -> Result<PriceLevel, BookError> {
        self.read(Side::Bid, false)
    }

    fn best_offer(&self) -> Result<PriceLevel, BookError> {
        self.read(Side::Offer, true)
    }

    fn highest_offer(&self) -> Result<PriceLevel, BookError> {
        self.read(Side::Offer, false)
    }

    fn policy(&self) -> SyncPolicy {
        SyncPolicy::Snapshot
    }
}
