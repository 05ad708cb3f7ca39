//! Zero-overhead value types for the level buffers
//!
//! All types in this module are designed for:
//! - Zero heap allocations
//! - Copy semantics (slots are overwritten in place)
//! - Minimal memory footprint

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single resident price level: one order per tick
///
/// Equality and ordering look at `price` only; `id` and `quantity` are payload.
/// The all-zero value is the vacancy sentinel (see [`PriceLevel::EMPTY`]).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Order identifier assigned by the feed
    pub id: u64,
    /// Limit price
    pub price: Decimal,
    /// Resting quantity
    pub quantity: u64,
}

impl PriceLevel {
    /// Vacant slot marker
    ///
    /// A real order with id 0, price 0 and quantity 0 cannot be told apart
    /// from a vacancy.
    pub const EMPTY: PriceLevel = PriceLevel {
        id: 0,
        price: Decimal::ZERO,
        quantity: 0,
    };

    /// Create a new price level
    #[inline(always)]
    pub const fn new(id: u64, price: Decimal, quantity: u64) -> Self {
        Self {
            id,
            price,
            quantity,
        }
    }

    /// Restore the vacancy sentinel
    #[inline(always)]
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    /// True if this slot holds the vacancy sentinel
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.id == 0 && self.quantity == 0 && self.price.is_zero()
    }
}

impl PartialEq for PriceLevel {
    fn eq(&self, other: &Self) -> bool {
        self.price == other.price
    }
}

impl Eq for PriceLevel {}

impl PartialOrd for PriceLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price.cmp(&other.price)
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "<empty>")
        } else {
            write!(f, "#{} {} x {}", self.id, self.price, self.quantity)
        }
    }
}

/// Book side
///
/// Single byte enum for minimal size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    Bid = 0,
    Offer = 1,
}

impl Side {
    /// Convert from the feed's `is_bid` flag
    #[inline(always)]
    pub const fn from_is_bid(is_bid: bool) -> Self {
        if is_bid {
            Side::Bid
        } else {
            Side::Offer
        }
    }

    #[inline(always)]
    pub const fn is_bid(self) -> bool {
        matches!(self, Side::Bid)
    }

    /// The other side of the book
    #[inline(always)]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Offer,
            Side::Offer => Side::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Offer => write!(f, "OFFER"),
        }
    }
}

/// Converts decimal prices to integer tick counts
///
/// One tick is `10^-precision`. All buffer arithmetic happens in ticks so the
/// slot mapping never touches floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSize {
    precision: u32,
    scale: Decimal,
}

impl TickSize {
    /// Create a tick size for `precision` decimal places
    ///
    /// `precision` must not exceed [`crate::config::MAX_PRECISION`]; callers go
    /// through [`crate::config::BookConfig::validate`] first.
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            scale: Decimal::from_i128_with_scale(10_i128.pow(precision), 0),
        }
    }

    #[inline(always)]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Size of one tick as a decimal (e.g. 0.01 for precision 2)
    #[inline]
    pub fn value(&self) -> Decimal {
        Decimal::new(1, self.precision)
    }

    /// Price to ticks, rounding to the nearest tick (midpoint away from zero)
    ///
    /// Returns None if the price does not fit in i64 ticks.
    #[inline]
    pub fn to_ticks(&self, price: Decimal) -> Option<i64> {
        price
            .checked_mul(self.scale)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// Ticks back to a decimal price
    #[inline]
    pub fn to_price(&self, ticks: i64) -> Decimal {
        Decimal::new(ticks, self.precision)
    }
}
