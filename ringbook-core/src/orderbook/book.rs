//! Two-sided level book: one [`SidedLevelBuffer`] per side
//!
//! Single-threaded facade. The shared variants in [`crate::sync`] wrap the
//! same operation set with a locking discipline.

use super::buffer::{Admission, SidedLevelBuffer};
use crate::config::BookConfig;
use crate::core::{BookError, ConfigError, PriceLevel, Side};
use crate::data::{Applied, BookEvent, UpdateAction};
use serde::Serialize;

/// Best `depth` bid and offer levels
#[derive(Debug, Clone)]
pub struct LevelBook {
    bids: SidedLevelBuffer,
    offers: SidedLevelBuffer,
}

impl LevelBook {
    /// Create an empty book
    ///
    /// `precision` is the number of decimal places per price and `depth` the
    /// number of levels kept per side; both are fixed for the book's lifetime.
    pub fn new(precision: u32, depth: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            bids: SidedLevelBuffer::new(Side::Bid, precision, depth)?,
            offers: SidedLevelBuffer::new(Side::Offer, precision, depth)?,
        })
    }

    pub fn from_config(config: &BookConfig) -> Result<Self, ConfigError> {
        Self::new(config.precision, config.depth)
    }

    #[inline(always)]
    pub fn side(&self, side: Side) -> &SidedLevelBuffer {
        match side {
            Side::Bid => &self.bids,
            Side::Offer => &self.offers,
        }
    }

    #[inline(always)]
    fn side_mut(&mut self, side: Side) -> &mut SidedLevelBuffer {
        match side {
            Side::Bid => &mut self.bids,
            Side::Offer => &mut self.offers,
        }
    }

    pub fn bids(&self) -> &SidedLevelBuffer {
        &self.bids
    }

    pub fn offers(&self) -> &SidedLevelBuffer {
        &self.offers
    }

    /// Add a level; silently dropped if the price is not admissible
    #[inline]
    pub fn add_order(&mut self, level: PriceLevel, side: Side) -> Admission {
        self.side_mut(side).add_or_update(level)
    }

    /// Overwrite the level at the same price
    ///
    /// Same admission rules as [`LevelBook::add_order`]: an update for a price
    /// outside the retained range is handled as a fresh level at that price.
    #[inline]
    pub fn update_order(&mut self, level: PriceLevel, side: Side) -> Admission {
        self.side_mut(side).add_or_update(level)
    }

    /// Remove the level at `level.price`; false if nothing was resident there
    #[inline]
    pub fn delete_order(&mut self, level: PriceLevel, side: Side) -> bool {
        self.side_mut(side).delete(level.price)
    }

    /// Dispatch one feed event
    pub fn apply(&mut self, event: &BookEvent) -> Applied {
        match event.action {
            UpdateAction::New => self.add_order(event.level, event.side).into(),
            UpdateAction::Change => self.update_order(event.level, event.side).into(),
            UpdateAction::Delete => {
                if self.delete_order(event.level, event.side) {
                    Applied::Removed
                } else {
                    Applied::NotResident
                }
            }
        }
    }

    #[inline]
    pub fn best_bid(&self) -> Result<PriceLevel, BookError> {
        self.bids.best()
    }

    #[inline]
    pub fn lowest_bid(&self) -> Result<PriceLevel, BookError> {
        self.bids.worst()
    }

    #[inline]
    pub fn best_offer(&self) -> Result<PriceLevel, BookError> {
        self.offers.best()
    }

    #[inline]
    pub fn highest_offer(&self) -> Result<PriceLevel, BookError> {
        self.offers.worst()
    }

    /// True if the best bid is at or above the best offer
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_offer()) {
            (Ok(bid), Ok(offer)) => bid.price >= offer.price,
            _ => false,
        }
    }

    /// Copy of every resident level, best first on each side
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            depth: self.bids.depth(),
            precision: self.bids.tick_size().precision(),
            bids: self.bids.levels().rev().collect(),
            offers: self.offers.levels().collect(),
        }
    }

    /// Drop every level on both sides
    pub fn clear(&mut self) {
        self.bids.clear();
        self.offers.clear();
    }
}

impl From<Admission> for Applied {
    fn from(admission: Admission) -> Self {
        match admission {
            Admission::Stored => Applied::Stored,
            Admission::Rejected => Applied::Rejected,
        }
    }
}

/// Point-in-time copy of a book, for printing and JSON dumps
#[derive(Debug, Clone, Serialize)]
pub struct BookSnapshot {
    pub depth: usize,
    pub precision: u32,
    /// Highest price first
    pub bids: Vec<PriceLevel>,
    /// Lowest price first
    pub offers: Vec<PriceLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn seeded_book() -> LevelBook {
        let mut book = LevelBook::new(2, 4).unwrap();
        book.add_order(PriceLevel::new(1, dec!(10.01), 100), Side::Bid);
        book.add_order(PriceLevel::new(2, dec!(10.02), 100), Side::Bid);
        book.add_order(PriceLevel::new(3, dec!(10.04), 100), Side::Offer);
        book.add_order(PriceLevel::new(4, dec!(10.05), 100), Side::Offer);
        book
    }

    #[test]
    fn test_sides_are_independent() {
        let book = seeded_book();

        assert_eq!(book.best_bid().unwrap().id, 2);
        assert_eq!(book.lowest_bid().unwrap().id, 1);
        assert_eq!(book.best_offer().unwrap().id, 3);
        assert_eq!(book.highest_offer().unwrap().id, 4);
        assert!(!book.is_crossed());
    }

    #[test]
    fn test_empty_book_queries() {
        let book = LevelBook::new(2, 4).unwrap();
        assert_eq!(book.best_bid(), Err(BookError::EmptyBook { side: Side::Bid }));
        assert_eq!(
            book.highest_offer(),
            Err(BookError::EmptyBook { side: Side::Offer })
        );
    }

    #[test]
    fn test_update_reflects_immediately() {
        let mut book = seeded_book();
        let updated = PriceLevel::new(2, dec!(10.02), 750);

        assert_eq!(book.update_order(updated, Side::Bid), Admission::Stored);
        assert_eq!(book.best_bid().unwrap().quantity, 750);
    }

    #[test]
    fn test_apply_dispatches_actions() {
        let mut book = LevelBook::new(2, 4).unwrap();
        let level = PriceLevel::new(1, dec!(10.01), 100);

        assert_eq!(book.apply(&BookEvent::add(Side::Bid, level)), Applied::Stored);
        assert_eq!(
            book.apply(&BookEvent::update(Side::Bid, PriceLevel { quantity: 5, ..level })),
            Applied::Stored
        );
        assert_eq!(book.best_bid().unwrap().quantity, 5);

        assert_eq!(book.apply(&BookEvent::delete(Side::Bid, level)), Applied::Removed);
        assert_eq!(book.apply(&BookEvent::delete(Side::Bid, level)), Applied::NotResident);
        assert!(book.best_bid().is_err());
    }

    #[test]
    fn test_apply_reports_rejection() {
        let mut book = LevelBook::new(2, 2).unwrap();
        book.add_order(PriceLevel::new(1, dec!(10.02), 1), Side::Bid);
        book.add_order(PriceLevel::new(2, dec!(10.03), 1), Side::Bid);

        let worse = PriceLevel::new(3, dec!(10.01), 1);
        assert_eq!(book.apply(&BookEvent::add(Side::Bid, worse)), Applied::Rejected);
    }

    #[test]
    fn test_snapshot_orders_best_first() {
        let snapshot = seeded_book().snapshot();

        let bids: Vec<u64> = snapshot.bids.iter().map(|l| l.id).collect();
        let offers: Vec<u64> = snapshot.offers.iter().map(|l| l.id).collect();
        assert_eq!(bids, vec![2, 1]);
        assert_eq!(offers, vec![3, 4]);
        assert_eq!(snapshot.depth, 4);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["bids"][0]["id"], 2);
    }

    #[test]
    fn test_crossed_detection() {
        let mut book = seeded_book();
        book.add_order(PriceLevel::new(9, dec!(10.04), 100), Side::Bid);
        assert!(book.is_crossed());
    }

    #[test]
    fn test_clear() {
        let mut book = seeded_book();
        book.clear();
        assert!(book.bids().is_empty());
        assert!(book.offers().is_empty());
    }
}
