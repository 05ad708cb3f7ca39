//! Fixed-capacity, price-indexed level buffer for one side of the book
//!
//! Slots are allocated once at construction and overwritten in place. Every
//! mutation goes through [`PriceIndexMapper`], so insert, update, delete and
//! best/worst lookups are O(1) apart from vacating skipped ticks after a gap
//! and repairing an anchor after its level is deleted (both bounded by
//! `depth`).

use super::mapper::{PriceIndexMapper, Vacate};
use crate::config::BookConfig;
use crate::core::{BookError, ConfigError, PriceLevel, Side, TickSize};
use rust_decimal::Decimal;
use tracing::debug;

/// Outcome of an add or update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Written to its slot
    Stored,
    /// Dropped by admission control: worse than every retained level with no
    /// room left, or a price that cannot be expressed in ticks
    Rejected,
}

impl Admission {
    #[inline(always)]
    pub fn is_stored(self) -> bool {
        matches!(self, Admission::Stored)
    }
}

/// Best `depth` price levels of one side, stored in a circular array
#[derive(Debug, Clone)]
pub struct SidedLevelBuffer {
    slots: Box<[PriceLevel]>,
    mapper: PriceIndexMapper,
    ticks: TickSize,
}

impl SidedLevelBuffer {
    /// Create an empty buffer
    ///
    /// Fails fast on a depth or precision outside the supported range.
    pub fn new(side: Side, precision: u32, depth: usize) -> Result<Self, ConfigError> {
        BookConfig::new(precision, depth).validate()?;

        debug!(%side, precision, depth, "allocating level buffer");

        Ok(Self {
            slots: vec![PriceLevel::EMPTY; depth].into_boxed_slice(),
            mapper: PriceIndexMapper::new(side, depth),
            ticks: TickSize::new(precision),
        })
    }

    #[inline(always)]
    pub fn side(&self) -> Side {
        self.mapper.side()
    }

    /// Capacity in price levels
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub fn tick_size(&self) -> TickSize {
        self.ticks
    }

    /// Current anchor state
    #[inline(always)]
    pub fn mapper(&self) -> &PriceIndexMapper {
        &self.mapper
    }

    /// True if no level is resident
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.mapper.is_empty()
    }

    /// Insert a level or overwrite the one at the same tick
    pub fn add_or_update(&mut self, level: PriceLevel) -> Admission {
        let Some(tick) = self.ticks.to_ticks(level.price) else {
            return Admission::Rejected;
        };
        let Some(placement) = self.mapper.resolve(tick) else {
            return Admission::Rejected;
        };

        match placement.vacate {
            Vacate::Nothing => {}
            Vacate::Span(span) => {
                for index in span.indices(self.slots.len()) {
                    self.slots[index].reset();
                }
            }
            Vacate::All => {
                debug!(side = %self.side(), price = %level.price, "price gap wider than buffer, level buffer invalidated");
                self.slots.fill(PriceLevel::EMPTY);
            }
        }

        self.slots[placement.index] = level;

        if placement.moved {
            let slots = &self.slots;
            self.mapper.settle(|index| slots[index].is_empty());
        }

        Admission::Stored
    }

    /// Vacate the slot holding `price`
    ///
    /// Returns false if no level is resident at that price. Deleting an edge
    /// level moves the anchor to the next resident level, so `best()` and
    /// `worst()` never return a deleted level.
    pub fn delete(&mut self, price: Decimal) -> bool {
        let Some(index) = self
            .ticks
            .to_ticks(price)
            .and_then(|tick| self.mapper.locate(tick))
        else {
            return false;
        };

        if self.slots[index].is_empty() {
            return false;
        }
        self.slots[index].reset();

        let at_edge = self
            .mapper
            .range()
            .is_some_and(|r| r.low.index == index || r.high.index == index);
        if at_edge {
            let slots = &self.slots;
            self.mapper.settle(|i| slots[i].is_empty());
        }

        true
    }

    /// Level at the best price (highest bid / lowest offer)
    #[inline]
    pub fn best(&self) -> Result<PriceLevel, BookError> {
        self.mapper
            .best()
            .map(|anchor| self.slots[anchor.index])
            .ok_or(BookError::EmptyBook { side: self.side() })
    }

    /// Level at the worst retained price (lowest bid / highest offer)
    #[inline]
    pub fn worst(&self) -> Result<PriceLevel, BookError> {
        self.mapper
            .worst()
            .map(|anchor| self.slots[anchor.index])
            .ok_or(BookError::EmptyBook { side: self.side() })
    }

    /// Resident level at `price`, if any
    pub fn get(&self, price: Decimal) -> Option<PriceLevel> {
        let index = self.mapper.locate(self.ticks.to_ticks(price)?)?;
        let level = self.slots[index];
        (!level.is_empty()).then_some(level)
    }

    /// Resident levels in increasing price order
    pub fn levels(&self) -> impl DoubleEndedIterator<Item = PriceLevel> + '_ {
        let depth = self.slots.len();
        let (start, width) = self
            .mapper
            .range()
            .map_or((0, 0), |r| (r.low.index, r.width()));

        (0..width)
            .map(move |offset| self.slots[(start + offset) % depth])
            .filter(|level| !level.is_empty())
    }

    /// Number of resident levels
    pub fn len(&self) -> usize {
        self.levels().count()
    }

    /// Drop every level
    pub fn clear(&mut self) {
        self.slots.fill(PriceLevel::EMPTY);
        self.mapper.reset();
    }

    /// Raw slot contents, index order
    pub fn slots(&self) -> &[PriceLevel] {
        &self.slots
    }
}
