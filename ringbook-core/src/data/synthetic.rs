//! Synthetic market data for replay, benchmarks and tests
//!
//! Generates a random walk of the mid price with occasional gaps and emits
//! New / Change / Delete events around it. Seeded, so every run with the same
//! config produces the same event stream.

use super::event::{BookEvent, UpdateAction};
use crate::core::{PriceLevel, Side, TickSize};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Synthetic feed parameters
#[derive(Debug, Clone)]
pub struct SyntheticFeedConfig {
    /// RNG seed
    pub seed: u64,
    /// Starting mid price
    pub base_price: Decimal,
    /// Decimal places per price
    pub precision: u32,
    /// Distance between best bid and best offer, in ticks
    pub spread_ticks: i64,
    /// Orders land up to this many ticks behind the touch
    pub levels: i64,
    /// Chance per event that the mid moves by one tick
    pub drift_probability: f64,
    /// Chance per event of a multi-tick jump
    pub gap_probability: f64,
    /// Largest jump in ticks
    pub max_gap_ticks: i64,
    /// Share of Change events
    pub change_probability: f64,
    /// Share of Delete events
    pub delete_probability: f64,
    /// Restrict output to one side
    pub side: Option<Side>,
    /// Stop after this many events (None = endless)
    pub limit: Option<u64>,
}

impl Default for SyntheticFeedConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            base_price: dec!(10.00),
            precision: 2,
            spread_ticks: 2,
            levels: 40,
            drift_probability: 0.10,
            gap_probability: 0.001,
            max_gap_ticks: 80,
            change_probability: 0.30,
            delete_probability: 0.20,
            side: None,
            limit: None,
        }
    }
}

impl SyntheticFeedConfig {
    /// Same stream parameters, one side only, with its own seed
    pub fn for_side(&self, side: Side) -> Self {
        Self {
            side: Some(side),
            seed: self.seed.wrapping_add(side as u64 + 1),
            ..self.clone()
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Seeded random-walk event generator
pub struct SyntheticFeed {
    rng: StdRng,
    config: SyntheticFeedConfig,
    ticks: TickSize,
    mid: i64,
    next_id: u64,
    emitted: u64,
}

impl SyntheticFeed {
    pub fn new(config: SyntheticFeedConfig) -> Self {
        let ticks = TickSize::new(config.precision);
        let mid = ticks.to_ticks(config.base_price).unwrap_or(0);

        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            ticks,
            mid,
            next_id: 1,
            emitted: 0,
        }
    }

    /// Current mid price
    pub fn mid_price(&self) -> Decimal {
        self.ticks.to_price(self.mid)
    }

    /// Number of events produced so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn step_mid(&mut self) {
        let cfg = &self.config;
        if self.rng.gen_bool(cfg.gap_probability) {
            let jump = self.rng.gen_range(2..=cfg.max_gap_ticks.max(2));
            self.mid += if self.rng.gen_bool(0.5) { jump } else { -jump };
        } else if self.rng.gen_bool(cfg.drift_probability) {
            self.mid += if self.rng.gen_bool(0.5) { 1 } else { -1 };
        }

        // Keep prices positive
        let floor = cfg.spread_ticks + cfg.levels + 1;
        self.mid = self.mid.max(floor);
    }
}

impl Iterator for SyntheticFeed {
    type Item = BookEvent;

    fn next(&mut self) -> Option<BookEvent> {
        if self.config.limit.is_some_and(|limit| self.emitted >= limit) {
            return None;
        }

        self.step_mid();

        let side = match self.config.side {
            Some(side) => side,
            None => Side::from_is_bid(self.rng.gen_bool(0.5)),
        };

        let half_spread = (self.config.spread_ticks / 2).max(1);
        let offset = self.rng.gen_range(0..self.config.levels.max(1));
        let tick = match side {
            Side::Bid => self.mid - half_spread - offset,
            Side::Offer => self.mid + half_spread + offset,
        };

        let roll: f64 = self.rng.gen();
        let action = if roll < self.config.delete_probability {
            UpdateAction::Delete
        } else if roll < self.config.delete_probability + self.config.change_probability {
            UpdateAction::Change
        } else {
            UpdateAction::New
        };

        let id = self.next_id;
        self.next_id += 1;
        self.emitted += 1;

        let level = PriceLevel::new(id, self.ticks.to_price(tick), self.rng.gen_range(1..=1_000));
        Some(BookEvent::new(action, side, level))
    }
}

/// `count` New events one tick apart, starting at `start` and moving upward
///
/// Ids run from 1, quantity is 100.
pub fn ladder(side: Side, start: Decimal, precision: u32, count: usize) -> Vec<BookEvent> {
    let ticks = TickSize::new(precision);
    let first = ticks.to_ticks(start).unwrap_or(0);

    (0..count)
        .map(|i| {
            let level = PriceLevel::new(i as u64 + 1, ticks.to_price(first + i as i64), 100);
            BookEvent::add(side, level)
        })
        .collect()
}
