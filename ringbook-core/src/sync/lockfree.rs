//! Book over atomic slots, no external lock
//!
//! Each side is an [`AtomicLevelBuffer`]. The cells are wider than native
//! atomics, so crossbeam guards each one with an internal seqlock held only
//! for the copy. A reader racing an anchor move may get a level that is one
//! write behind, but never `EmptyBook` for an occupied side.

use super::atomic::AtomicLevelBuffer;
use super::{ConcurrentBook, SyncPolicy};
use crate::config::BookConfig;
use crate::core::{BookError, ConfigError, PriceLevel, Side};
use crate::orderbook::Admission;

pub struct LockFreeBook {
    bids: AtomicLevelBuffer,
    offers: AtomicLevelBuffer,
}

impl LockFreeBook {
    pub fn new(precision: u32, depth: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            bids: AtomicLevelBuffer::new(Side::Bid, precision, depth)?,
            offers: AtomicLevelBuffer::new(Side::Offer, precision, depth)?,
        })
    }

    pub fn from_config(config: &BookConfig) -> Result<Self, ConfigError> {
        Self::new(config.precision, config.depth)
    }

    #[inline(always)]
    pub fn side(&self, side: Side) -> &AtomicLevelBuffer {
        match side {
            Side::Bid => &self.bids,
            Side::Offer => &self.offers,
        }
    }
}

impl ConcurrentBook for LockFreeBook {
    #[inline]
    fn add_order(&self, level: PriceLevel, side: Side) -> Admission {
        self.side(side).add_or_update(level)
    }

    #[inline]
    fn update_order(&self, level: PriceLevel, side: Side) -> Admission {
        self.side(side).add_or_update(level)
    }

    #[inline]
    fn delete_order(&self, level: PriceLevel, side: Side) -> bool {
        self.side(side).delete(level.price)
    }

    fn best_bid(&self) -> Result<PriceLevel, BookError> {
        self.bids.best()
    }

    fn lowest_bid(&self) -> Result<PriceLevel, BookError> {
        self.bids.worst()
    }

    fn best_offer(&self) -> Result<PriceLevel, BookError> {
        self.offers.best()
    }

    fn highest_offer(&self) -> Result<PriceLevel, BookError> {
        self.offers.worst()
    }

    fn policy(&self) -> SyncPolicy {
        SyncPolicy::LockFree
    }
}
