//! Level buffer over atomic cells
//!
//! Same layout and placement rules as [`SidedLevelBuffer`], but every slot is
//! a `crossbeam::atomic::AtomicCell` and the mapper is published through
//! another cell, so writes and reads work through `&self`.
//!
//! Writers load the mapper and resolve on a local copy. The placed level is
//! stored first, the mapper is published next, and only then are the slots
//! it no longer covers cleared, so a published edge always names a resident
//! level. There is no compare-and-swap: two concurrent writers on the same
//! side are memory-safe but can lose each other's anchor moves. One writer
//! per side is assumed.
//!
//! `PriceLevel` and the mapper are wider than any native atomic, so
//! `AtomicCell` backs them with crossbeam's internal striped seqlocks. No
//! lock is held between calls and none is visible to callers.
//!
//! [`SidedLevelBuffer`]: crate::orderbook::SidedLevelBuffer

use crate::config::BookConfig;
use crate::core::{BookError, ConfigError, PriceLevel, Side, TickSize};
use crate::orderbook::{Admission, Anchor, PriceIndexMapper, SlotRange, Vacate};
use crossbeam::atomic::AtomicCell;
use crossbeam_utils::Backoff;
use rust_decimal::Decimal;
use tracing::debug;

pub struct AtomicLevelBuffer {
    slots: Box<[AtomicCell<PriceLevel>]>,
    mapper: AtomicCell<PriceIndexMapper>,
    ticks: TickSize,
    side: Side,
}

impl AtomicLevelBuffer {
    pub fn new(side: Side, precision: u32, depth: usize) -> Result<Self, ConfigError> {
        BookConfig::new(precision, depth).validate()?;

        debug!(%side, precision, depth, "allocating atomic level buffer");

        Ok(Self {
            slots: (0..depth).map(|_| AtomicCell::new(PriceLevel::EMPTY)).collect(),
            mapper: AtomicCell::new(PriceIndexMapper::new(side, depth)),
            ticks: TickSize::new(precision),
            side,
        })
    }

    #[inline(always)]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn tick_size(&self) -> TickSize {
        self.ticks
    }

    /// Currently published occupied span
    #[inline]
    pub fn range(&self) -> Option<SlotRange> {
        self.mapper.load().range()
    }

    #[inline(always)]
    fn is_vacant(&self, index: usize) -> bool {
        self.slots[index].load().is_empty()
    }

    pub fn add_or_update(&self, level: PriceLevel) -> Admission {
        let Some(tick) = self.ticks.to_ticks(level.price) else {
            return Admission::Rejected;
        };
        let mut mapper = self.mapper.load();
        let Some(placement) = mapper.resolve(tick) else {
            return Admission::Rejected;
        };

        self.slots[placement.index].store(level);
        if !placement.moved {
            return Admission::Stored;
        }

        let depth = self.slots.len();
        match placement.vacate {
            Vacate::Nothing => mapper.settle(|i| self.is_vacant(i)),
            Vacate::Span(span) => mapper.settle(|i| span.contains(i, depth) || self.is_vacant(i)),
            Vacate::All => mapper.settle(|i| i != placement.index),
        }
        self.mapper.store(mapper);

        match placement.vacate {
            Vacate::Nothing => {}
            Vacate::Span(span) => {
                for index in span.indices(depth) {
                    self.slots[index].store(PriceLevel::EMPTY);
                }
            }
            Vacate::All => {
                debug!(side = %self.side, price = %level.price, "price gap wider than buffer, level buffer invalidated");
                for (index, slot) in self.slots.iter().enumerate() {
                    if index != placement.index {
                        slot.store(PriceLevel::EMPTY);
                    }
                }
            }
        }

        Admission::Stored
    }

    pub fn delete(&self, price: Decimal) -> bool {
        let mut mapper = self.mapper.load();
        let Some(index) = self.ticks.to_ticks(price).and_then(|tick| mapper.locate(tick)) else {
            return false;
        };

        if self.is_vacant(index) {
            return false;
        }

        let at_edge = mapper
            .range()
            .is_some_and(|r| r.low.index == index || r.high.index == index);
        if at_edge {
            mapper.settle(|i| i == index || self.is_vacant(i));
            self.mapper.store(mapper);
        }
        self.slots[index].store(PriceLevel::EMPTY);

        true
    }

    /// True if `level` is what the slot under `anchor` should hold
    #[inline(always)]
    pub(crate) fn holds(&self, anchor: Anchor, level: &PriceLevel) -> bool {
        !level.is_empty() && self.ticks.to_ticks(level.price) == Some(anchor.tick)
    }

    /// Load the slot under `pick(mapper)`, retrying while a writer is mid-update
    ///
    /// A read is accepted once the mapper is unchanged across the slot load and
    /// the slot holds a level at the anchor's tick. Once the backoff completes
    /// the last such level seen is returned even if the mapper has since moved.
    /// `EmptyBook` only comes from a mapper with no occupied span.
    fn read_edge<F>(&self, pick: F) -> Result<PriceLevel, BookError>
    where
        F: Fn(&PriceIndexMapper) -> Option<Anchor>,
    {
        let backoff = Backoff::new();
        let mut last_seen = None;
        loop {
            let before = self.mapper.load();
            let Some(anchor) = pick(&before) else {
                return Err(BookError::EmptyBook { side: self.side });
            };
            let level = self.slots[anchor.index].load();

            if self.holds(anchor, &level) {
                if self.mapper.load() == before {
                    return Ok(level);
                }
                last_seen = Some(level);
            }

            if backoff.is_completed() {
                if let Some(level) = last_seen {
                    return Ok(level);
                }
            }
            backoff.snooze();
        }
    }

    #[inline]
    pub fn best(&self) -> Result<PriceLevel, BookError> {
        self.read_edge(PriceIndexMapper::best)
    }

    #[inline]
    pub fn worst(&self) -> Result<PriceLevel, BookError> {
        self.read_edge(PriceIndexMapper::worst)
    }

    /// Raw slot load, no consistency check against the mapper
    #[inline(always)]
    pub fn slot(&self, index: usize) -> PriceLevel {
        self.slots[index].load()
    }

    /// Resident levels in increasing price order, as seen by one mapper load
    pub fn levels(&self) -> Vec<PriceLevel> {
        let depth = self.slots.len();
        let Some(range) = self.range() else {
            return Vec::new();
        };

        (0..range.width())
            .map(|offset| self.slots[(range.low.index + offset) % depth].load())
            .filter(|level| !level.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn level(id: u64, price: Decimal) -> PriceLevel {
        PriceLevel::new(id, price, 100)
    }

    #[test]
    fn test_matches_plain_buffer_semantics() {
        let buffer = AtomicLevelBuffer::new(Side::Bid, 2, 3).unwrap();

        buffer.add_or_update(level(1, dec!(10.01)));
        buffer.add_or_update(level(2, dec!(10.03)));
        assert_eq!(buffer.best().unwrap().id, 2);
        assert_eq!(buffer.worst().unwrap().id, 1);

        // Span is full, a worse price has no room
        assert_eq!(buffer.add_or_update(level(3, dec!(10.00))), Admission::Rejected);

        // A better price evicts the worst level
        buffer.add_or_update(level(4, dec!(10.04)));
        assert_eq!(buffer.worst().unwrap().id, 2);
        assert_eq!(buffer.levels().len(), 2);
    }

    #[test]
    fn test_delete_repairs_edges() {
        let buffer = AtomicLevelBuffer::new(Side::Offer, 2, 4).unwrap();
        buffer.add_or_update(level(1, dec!(10.01)));
        buffer.add_or_update(level(2, dec!(10.03)));

        assert!(buffer.delete(dec!(10.01)));
        assert!(!buffer.delete(dec!(10.01)));
        assert_eq!(buffer.best().unwrap().id, 2);

        assert!(buffer.delete(dec!(10.03)));
        assert_eq!(buffer.best(), Err(BookError::EmptyBook { side: Side::Offer }));
        assert!(buffer.range().is_none());
    }

    #[test]
    fn test_gap_invalidates() {
        let buffer = AtomicLevelBuffer::new(Side::Bid, 2, 4).unwrap();
        buffer.add_or_update(level(1, dec!(10.01)));
        buffer.add_or_update(level(2, dec!(10.02)));

        buffer.add_or_update(level(3, dec!(11.00)));
        assert_eq!(buffer.levels().len(), 1);
        assert_eq!(buffer.worst().unwrap().id, 3);
    }

    #[test]
    fn test_readers_never_see_vacant_best() {
        let buffer = Arc::new(AtomicLevelBuffer::new(Side::Bid, 2, 16).unwrap());
        buffer.add_or_update(level(1, dec!(10.00)));

        let writer = {
            let buffer = Arc::clone(&buffer);
            std::thread::spawn(move || {
                for i in 0..5_000u64 {
                    let price = dec!(10.00) + Decimal::new((i % 32) as i64, 2);
                    buffer.add_or_update(level(i + 2, price));
                }
            })
        };

        let reader = {
            let buffer = Arc::clone(&buffer);
            std::thread::spawn(move || {
                let mut seen = 0;
                for _ in 0..5_000 {
                    if let Ok(best) = buffer.best() {
                        assert!(!best.is_empty());
                        seen += 1;
                    }
                }
                seen
            })
        };

        writer.join().unwrap();
        assert!(reader.join().unwrap() > 0);
        assert!(buffer.best().is_ok());
    }

    /// Run `write` on one thread while readers poll both edges; returns the
    /// number of `EmptyBook` answers they got
    fn empty_reads_during<W>(buffer: &Arc<AtomicLevelBuffer>, write: W) -> u64
    where
        W: FnOnce(&AtomicLevelBuffer) + Send + 'static,
    {
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let buffer = Arc::clone(buffer);
                let done = Arc::clone(&done);
                std::thread::spawn(move || {
                    let mut empty = 0u64;
                    while !done.load(Ordering::Acquire) {
                        empty += buffer.best().is_err() as u64;
                        empty += buffer.worst().is_err() as u64;
                    }
                    empty
                })
            })
            .collect();

        let writer = {
            let buffer = Arc::clone(buffer);
            std::thread::spawn(move || write(&buffer))
        };
        writer.join().unwrap();
        done.store(true, Ordering::Release);

        readers.into_iter().map(|r| r.join().unwrap()).sum()
    }

    #[test]
    fn test_occupied_side_never_reads_empty_across_deletes() {
        let buffer = Arc::new(AtomicLevelBuffer::new(Side::Bid, 2, 8).unwrap());
        buffer.add_or_update(level(1, dec!(10.00)));

        let empty = empty_reads_during(&buffer, |buffer| {
            for i in 0..200_000u64 {
                buffer.add_or_update(level(i + 2, dec!(10.03)));
                assert!(buffer.delete(dec!(10.03)));
            }
        });

        assert_eq!(empty, 0);
        assert_eq!(buffer.best().unwrap().id, 1);
        assert_eq!(buffer.worst().unwrap().id, 1);
    }

    #[test]
    fn test_occupied_side_never_reads_empty_across_gaps() {
        let buffer = Arc::new(AtomicLevelBuffer::new(Side::Offer, 2, 8).unwrap());
        buffer.add_or_update(level(1, dec!(5000.00)));

        // Every step improves by a full dollar, so every add resets the buffer
        let empty = empty_reads_during(&buffer, |buffer| {
            for i in 0..4_000u64 {
                let price = dec!(4999.00) - Decimal::from(i);
                assert_eq!(buffer.add_or_update(level(i + 2, price)), Admission::Stored);
            }
        });

        assert_eq!(empty, 0);
        assert_eq!(buffer.levels().len(), 1);
        assert_eq!(buffer.best().unwrap().price, dec!(1000.00));
    }
}
