//! Price-to-slot mapping for a fixed-capacity circular level buffer
//!
//! The buffer keeps at most `depth` consecutive ticks of one side. Two anchors
//! mark the occupied span: `low` (lowest resident tick) and `high` (highest
//! resident tick). Walking from `low.index` by `+1 mod depth` visits one tick
//! per step until `high.index`.
//!
//! ## Policy
//!
//! For bids the best edge is `high`; for offers it is `low`. An incoming tick:
//!
//! ```text
//!   empty buffer            -> anchor both edges at slot 0
//!   inside [low, high]      -> slot = low.index + (tick - low.tick)
//!   past the best edge      -> jump >= depth : invalidate everything, re-anchor at 0
//!                              otherwise     : move best edge, evict worst if span >= depth
//!   past the worst edge     -> span <  depth : move worst edge
//!                              otherwise     : reject (book already holds better levels)
//! ```
//!
//! Whenever an edge moves by more than one tick, the slots for the skipped
//! ticks are handed back to the caller for vacating, so a recycled slot never
//! exposes a level from before the gap.
//!
//! The mapper only touches integers. It is `Copy` so the atomic buffer can
//! keep it in an `AtomicCell` and run the same code on a local copy.

use crate::core::Side;
use tracing::trace;

/// One edge of the occupied span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Slot index in `[0, depth)`
    pub index: usize,
    /// Tick held at that slot
    pub tick: i64,
}

impl Anchor {
    #[inline(always)]
    fn forward(self, steps: usize, depth: usize) -> Self {
        Self {
            index: (self.index + steps) % depth,
            tick: self.tick + steps as i64,
        }
    }

    #[inline(always)]
    fn backward(self, steps: usize, depth: usize) -> Self {
        Self {
            index: (self.index + depth - steps) % depth,
            tick: self.tick - steps as i64,
        }
    }
}

/// Occupied span of the buffer, `low.tick <= high.tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub low: Anchor,
    pub high: Anchor,
}

impl SlotRange {
    #[inline(always)]
    fn single(index: usize, tick: i64) -> Self {
        let anchor = Anchor { index, tick };
        Self {
            low: anchor,
            high: anchor,
        }
    }

    /// Number of ticks covered, inclusive of both edges
    #[inline(always)]
    pub fn width(&self) -> usize {
        (self.high.tick - self.low.tick) as usize + 1
    }

    #[inline(always)]
    pub fn contains(&self, tick: i64) -> bool {
        self.low.tick <= tick && tick <= self.high.tick
    }

    #[inline(always)]
    fn index_of(&self, tick: i64, depth: usize) -> usize {
        (self.low.index + (tick - self.low.tick) as usize) % depth
    }
}

/// Contiguous run of slots (wrapping) to reset before a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpan {
    pub start: usize,
    pub len: usize,
}

impl SlotSpan {
    /// Slot indices covered by this span, wrapping at `depth`
    pub fn indices(self, depth: usize) -> impl Iterator<Item = usize> {
        (0..self.len).map(move |offset| (self.start + offset) % depth)
    }

    #[inline]
    pub fn contains(self, index: usize, depth: usize) -> bool {
        (index + depth - self.start) % depth < self.len
    }
}

/// Slots the caller must vacate before writing the placed level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vacate {
    Nothing,
    /// Skipped ticks between the old edge and the new one
    Span(SlotSpan),
    /// Full invalidation after a jump of a whole buffer or more
    All,
}

/// Where an admitted level goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub vacate: Vacate,
    /// True if an anchor moved; the caller should [`PriceIndexMapper::settle`]
    pub moved: bool,
}

impl Placement {
    #[inline(always)]
    fn resident(index: usize) -> Self {
        Self {
            index,
            vacate: Vacate::Nothing,
            moved: false,
        }
    }
}

/// Maps ticks onto slots of one side's circular buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceIndexMapper {
    depth: usize,
    side: Side,
    range: Option<SlotRange>,
}

impl PriceIndexMapper {
    /// `depth` must be at least 1 (validated by the owning buffer)
    pub fn new(side: Side, depth: usize) -> Self {
        debug_assert!(depth > 0, "depth must be positive");
        Self {
            depth,
            side,
            range: None,
        }
    }

    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline(always)]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Current occupied span, None while empty
    #[inline(always)]
    pub fn range(&self) -> Option<SlotRange> {
        self.range
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    /// Slot holding the best price of this side
    #[inline]
    pub fn best(&self) -> Option<Anchor> {
        self.range.map(|r| match self.side {
            Side::Bid => r.high,
            Side::Offer => r.low,
        })
    }

    /// Slot holding the worst price of this side
    #[inline]
    pub fn worst(&self) -> Option<Anchor> {
        self.range.map(|r| match self.side {
            Side::Bid => r.low,
            Side::Offer => r.high,
        })
    }

    /// Forget every anchor
    pub fn reset(&mut self) {
        self.range = None;
    }

    /// Read-only lookup: slot of `tick` if it lies inside the occupied span
    #[inline]
    pub fn locate(&self, tick: i64) -> Option<usize> {
        let range = self.range?;
        range
            .contains(tick)
            .then(|| range.index_of(tick, self.depth))
    }

    /// Resolve the slot for `tick`, moving anchors as needed
    ///
    /// Returns None when the tick is past the worst edge and the book has no
    /// room left for it. The buffer is untouched in that case.
    pub fn resolve(&mut self, tick: i64) -> Option<Placement> {
        let Some(range) = self.range else {
            self.range = Some(SlotRange::single(0, tick));
            return Some(Placement {
                index: 0,
                vacate: Vacate::Nothing,
                moved: true,
            });
        };

        if range.contains(tick) {
            return Some(Placement::resident(range.index_of(tick, self.depth)));
        }

        let above = tick > range.high.tick;
        let toward_best = match self.side {
            Side::Bid => above,
            Side::Offer => !above,
        };

        // Distance from the nearer edge, and the span the book would need
        let (jump, span) = if above {
            (
                tick.saturating_sub(range.high.tick),
                tick.saturating_sub(range.low.tick),
            )
        } else {
            (
                range.low.tick.saturating_sub(tick),
                range.high.tick.saturating_sub(tick),
            )
        };
        let depth = self.depth as i64;

        if toward_best {
            if jump >= depth {
                trace!(side = %self.side, tick, jump, "gap of a full buffer, invalidating");
                self.range = Some(SlotRange::single(0, tick));
                return Some(Placement {
                    index: 0,
                    vacate: Vacate::All,
                    moved: true,
                });
            }
        } else if span >= depth {
            return None;
        }

        // 0 < jump < depth from here on
        let jump = jump as usize;
        let excess = (span - depth + 1).max(0) as usize;
        let vacate = if jump > 1 {
            Vacate::Span(SlotSpan {
                start: 0,
                len: jump - 1,
            })
        } else {
            Vacate::Nothing
        };

        let (index, vacate, next) = if above {
            let high = range.high.forward(jump, self.depth);
            let low = range.low.forward(excess, self.depth);
            let vacate = with_start(vacate, (range.high.index + 1) % self.depth);
            (high.index, vacate, SlotRange { low, high })
        } else {
            let low = range.low.backward(jump, self.depth);
            let high = range.high.backward(excess, self.depth);
            let vacate = with_start(vacate, (low.index + 1) % self.depth);
            (low.index, vacate, SlotRange { low, high })
        };

        if excess > 0 {
            trace!(side = %self.side, tick, evicted = excess, "shifted past worst levels");
        }

        self.range = Some(next);
        Some(Placement {
            index,
            vacate,
            moved: true,
        })
    }

    /// Pull edges resting on vacant slots inward to the nearest resident slot
    ///
    /// Clears the range when no resident slot is left.
    pub fn settle<F>(&mut self, is_vacant: F)
    where
        F: Fn(usize) -> bool,
    {
        let Some(mut range) = self.range else {
            return;
        };

        while range.low.tick < range.high.tick && is_vacant(range.low.index) {
            range.low = range.low.forward(1, self.depth);
        }
        while range.high.tick > range.low.tick && is_vacant(range.high.index) {
            range.high = range.high.backward(1, self.depth);
        }

        self.range = if is_vacant(range.low.index) {
            None
        } else {
            Some(range)
        };
    }
}

#[inline(always)]
fn with_start(vacate: Vacate, start: usize) -> Vacate {
    match vacate {
        Vacate::Span(span) => Vacate::Span(SlotSpan { start, ..span }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper_with(side: Side, depth: usize, ticks: &[i64]) -> PriceIndexMapper {
        let mut mapper = PriceIndexMapper::new(side, depth);
        for &tick in ticks {
            mapper.resolve(tick).expect("setup tick rejected");
        }
        mapper
    }

    fn edges(mapper: &PriceIndexMapper) -> (i64, i64) {
        let range = mapper.range().unwrap();
        (range.low.tick, range.high.tick)
    }

    #[test]
    fn test_empty_buffer_anchors_at_zero() {
        let mut mapper = PriceIndexMapper::new(Side::Bid, 4);
        let placement = mapper.resolve(2_950_021).unwrap();

        assert_eq!(placement.index, 0);
        assert_eq!(placement.vacate, Vacate::Nothing);
        assert_eq!(edges(&mapper), (2_950_021, 2_950_021));
    }

    #[test]
    fn test_in_range_keeps_anchors() {
        let mut mapper = mapper_with(Side::Bid, 4, &[21, 24]);
        let before = mapper.range();

        let placement = mapper.resolve(23).unwrap();
        assert_eq!(placement.index, 2);
        assert!(!placement.moved);
        assert_eq!(mapper.range(), before);
    }

    #[test]
    fn test_span_membership_wraps() {
        let span = SlotSpan { start: 3, len: 2 };
        let covered: Vec<usize> = span.indices(4).collect();
        assert_eq!(covered, vec![3, 0]);

        assert!(span.contains(3, 4));
        assert!(span.contains(0, 4));
        assert!(!span.contains(1, 4));
        assert!(!span.contains(2, 4));
    }

    #[test]
    fn test_extension_wraps_modulo_depth() {
        // 22 is anchored at slot 0, so 21 lands on the last slot
        let mut mapper = mapper_with(Side::Bid, 4, &[22]);
        let placement = mapper.resolve(21).unwrap();

        assert_eq!(placement.index, 3);
        let range = mapper.range().unwrap();
        assert_eq!(range.low, Anchor { index: 3, tick: 21 });
        assert_eq!(range.high, Anchor { index: 0, tick: 22 });
    }

    #[test]
    fn test_bid_below_full_book_rejected() {
        let mut mapper = mapper_with(Side::Bid, 4, &[21, 22, 23, 24]);
        let before = mapper;

        assert!(mapper.resolve(20).is_none());
        assert!(mapper.resolve(1).is_none());
        assert_eq!(mapper, before);
    }

    #[test]
    fn test_offer_above_full_book_rejected() {
        let mut mapper = mapper_with(Side::Offer, 4, &[21, 22, 23, 24]);
        assert!(mapper.resolve(25).is_none());
        assert_eq!(edges(&mapper), (21, 24));
    }

    #[test]
    fn test_bid_one_tick_above_evicts_worst() {
        let mut mapper = mapper_with(Side::Bid, 4, &[21, 22, 23, 24]);
        let placement = mapper.resolve(25).unwrap();

        // Slot of 21 is recycled for 25
        assert_eq!(placement.index, 0);
        assert_eq!(placement.vacate, Vacate::Nothing);
        assert_eq!(edges(&mapper), (22, 25));
    }

    #[test]
    fn test_bid_gap_vacates_skipped_ticks() {
        let mut mapper = mapper_with(Side::Bid, 4, &[21, 22, 23, 24]);
        let placement = mapper.resolve(27).unwrap();

        // 25 and 26 reuse the slots of 21 and 22
        assert_eq!(placement.index, 2);
        assert_eq!(
            placement.vacate,
            Vacate::Span(SlotSpan { start: 0, len: 2 })
        );
        assert_eq!(edges(&mapper), (24, 27));
    }

    #[test]
    fn test_offer_gap_down_vacates_skipped_ticks() {
        let mut mapper = mapper_with(Side::Offer, 4, &[21, 22, 23, 24]);
        let placement = mapper.resolve(18).unwrap();

        // 18 at slot 1, skipped 19 and 20 at slots 2 and 3
        assert_eq!(placement.index, 1);
        assert_eq!(
            placement.vacate,
            Vacate::Span(SlotSpan { start: 2, len: 2 })
        );
        assert_eq!(edges(&mapper), (18, 21));
    }

    #[test]
    fn test_jump_of_full_buffer_resets() {
        let mut mapper = mapper_with(Side::Bid, 4, &[21, 22, 23, 24]);
        let placement = mapper.resolve(30).unwrap();

        assert_eq!(placement.index, 0);
        assert_eq!(placement.vacate, Vacate::All);
        assert_eq!(edges(&mapper), (30, 30));

        let mut mapper = mapper_with(Side::Offer, 4, &[21, 22, 23]);
        let placement = mapper.resolve(15).unwrap();
        assert_eq!(placement.vacate, Vacate::All);
        assert_eq!(edges(&mapper), (15, 15));
    }

    #[test]
    fn test_worst_side_extension_within_capacity() {
        let mut mapper = mapper_with(Side::Bid, 10, &[24]);
        let placement = mapper.resolve(21).unwrap();

        assert_eq!(
            placement.vacate,
            Vacate::Span(SlotSpan { start: 8, len: 2 })
        );
        assert_eq!(placement.index, 7);
        assert_eq!(edges(&mapper), (21, 24));
    }

    #[test]
    fn test_locate_is_read_only() {
        let mapper = mapper_with(Side::Offer, 4, &[21, 23]);
        let before = mapper;

        assert_eq!(mapper.locate(22), Some(1));
        assert_eq!(mapper.locate(25), None);
        assert_eq!(mapper.locate(20), None);
        assert_eq!(mapper, before);
        assert_eq!(PriceIndexMapper::new(Side::Bid, 4).locate(1), None);
    }

    #[test]
    fn test_best_and_worst_are_mirrored() {
        let bids = mapper_with(Side::Bid, 4, &[21, 24]);
        assert_eq!(bids.best().unwrap().tick, 24);
        assert_eq!(bids.worst().unwrap().tick, 21);

        let offers = mapper_with(Side::Offer, 4, &[21, 24]);
        assert_eq!(offers.best().unwrap().tick, 21);
        assert_eq!(offers.worst().unwrap().tick, 24);
    }

    #[test]
    fn test_settle_walks_edges_inward() {
        let mut mapper = mapper_with(Side::Bid, 8, &[10, 15]);
        // Only slot of tick 12 and 13 are resident
        mapper.settle(|index| !(index == 2 || index == 3));
        assert_eq!(edges(&mapper), (12, 13));

        mapper.settle(|_| true);
        assert!(mapper.is_empty());
    }

    #[test]
    fn test_extreme_ticks_do_not_overflow() {
        let mut mapper = mapper_with(Side::Bid, 4, &[i64::MIN + 1]);
        let placement = mapper.resolve(i64::MAX).unwrap();
        assert_eq!(placement.vacate, Vacate::All);

        assert!(mapper.resolve(i64::MIN).is_none());
    }
}
