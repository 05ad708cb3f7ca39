//! Property-based tests for the level buffer
//!
//! Random add / delete sequences are applied to a [`SidedLevelBuffer`] and to
//! a `BTreeMap` model of the same retention rules; the two must agree after
//! every step.

use super::buffer::{Admission, SidedLevelBuffer};
use crate::core::{PriceLevel, Side, TickSize};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

const PRECISION: u32 = 2;
const BASE_TICKS: i64 = 1_000_000;

#[derive(Debug, Clone, Copy)]
enum Op {
    Add { offset: i64, id: u64 },
    Delete { offset: i64 },
}

fn op_strategy(spread: i64) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-spread..=spread, 1..10_000u64).prop_map(|(offset, id)| Op::Add { offset, id }),
        1 => (-spread..=spread).prop_map(|offset| Op::Delete { offset }),
    ]
}

/// Reference model: resident levels keyed by tick
struct Model {
    side: Side,
    depth: i64,
    levels: BTreeMap<i64, u64>,
}

impl Model {
    fn new(side: Side, depth: usize) -> Self {
        Self {
            side,
            depth: depth as i64,
            levels: BTreeMap::new(),
        }
    }

    fn add(&mut self, tick: i64, id: u64) -> Admission {
        let (Some(&min), Some(&max)) = (self.levels.keys().next(), self.levels.keys().last())
        else {
            self.levels.insert(tick, id);
            return Admission::Stored;
        };

        match self.side {
            Side::Bid if tick > max => {
                self.levels.retain(|&t, _| t > tick - self.depth);
            }
            Side::Bid if tick < min && max - tick >= self.depth => return Admission::Rejected,
            Side::Offer if tick < min => {
                self.levels.retain(|&t, _| t < tick + self.depth);
            }
            Side::Offer if tick > max && tick - min >= self.depth => return Admission::Rejected,
            _ => {}
        }

        self.levels.insert(tick, id);
        Admission::Stored
    }

    fn best(&self) -> Option<u64> {
        match self.side {
            Side::Bid => self.levels.values().last().copied(),
            Side::Offer => self.levels.values().next().copied(),
        }
    }

    fn worst(&self) -> Option<u64> {
        match self.side {
            Side::Bid => self.levels.values().next().copied(),
            Side::Offer => self.levels.values().last().copied(),
        }
    }
}

fn price(ticks: &TickSize, tick: i64) -> Decimal {
    ticks.to_price(tick)
}

fn check(buffer: &SidedLevelBuffer, model: &Model) -> Result<(), TestCaseError> {
    let ids: Vec<u64> = buffer.levels().map(|l| l.id).collect();
    let expected: Vec<u64> = model.levels.values().copied().collect();
    prop_assert_eq!(&ids, &expected);

    prop_assert!(buffer.len() <= buffer.depth());
    prop_assert_eq!(buffer.best().ok().map(|l| l.id), model.best());
    prop_assert_eq!(buffer.worst().ok().map(|l| l.id), model.worst());

    // Strictly increasing prices in iteration order
    let prices: Vec<Decimal> = buffer.levels().map(|l| l.price).collect();
    prop_assert!(prices.windows(2).all(|w| w[0] < w[1]));

    // Slots outside the occupied span hold nothing
    let depth = buffer.depth();
    let occupied: Vec<usize> = match buffer.mapper().range() {
        Some(range) => (0..range.width())
            .map(|offset| (range.low.index + offset) % depth)
            .collect(),
        None => Vec::new(),
    };
    for (index, slot) in buffer.slots().iter().enumerate() {
        if !occupied.contains(&index) {
            prop_assert!(slot.is_empty(), "slot {} outside span holds {}", index, slot);
        }
    }

    Ok(())
}

fn run(side: Side, depth: usize, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let ticks = TickSize::new(PRECISION);
    let mut buffer = SidedLevelBuffer::new(side, PRECISION, depth).unwrap();
    let mut model = Model::new(side, depth);

    for op in ops {
        match op {
            Op::Add { offset, id } => {
                let tick = BASE_TICKS + offset;
                let level = PriceLevel::new(id, price(&ticks, tick), 100);
                let got = buffer.add_or_update(level);
                let want = model.add(tick, id);
                prop_assert_eq!(got, want, "add at offset {}", offset);
            }
            Op::Delete { offset } => {
                let tick = BASE_TICKS + offset;
                let got = buffer.delete(price(&ticks, tick));
                let want = model.levels.remove(&tick).is_some();
                prop_assert_eq!(got, want, "delete at offset {}", offset);
            }
        }
        check(&buffer, &model)?;
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: bid buffer agrees with the model over random traffic
    #[test]
    fn prop_bids_match_model(
        depth in 1usize..12,
        ops in prop::collection::vec(op_strategy(20), 1..200),
    ) {
        run(Side::Bid, depth, ops)?;
    }

    /// Property: offer buffer agrees with the model over random traffic
    #[test]
    fn prop_offers_match_model(
        depth in 1usize..12,
        ops in prop::collection::vec(op_strategy(20), 1..200),
    ) {
        run(Side::Offer, depth, ops)?;
    }

    /// Property: wide gaps reset the buffer instead of corrupting it
    #[test]
    fn prop_wide_gaps(
        side in prop_oneof![Just(Side::Bid), Just(Side::Offer)],
        ops in prop::collection::vec(op_strategy(500), 1..100),
    ) {
        run(side, 8, ops)?;
    }

    /// Property: a best-side insert is never rejected
    #[test]
    fn prop_better_price_always_admitted(
        depth in 1usize..12,
        offsets in prop::collection::vec(0i64..30, 1..50),
    ) {
        let ticks = TickSize::new(PRECISION);
        let mut buffer = SidedLevelBuffer::new(Side::Bid, PRECISION, depth).unwrap();
        let mut top = BASE_TICKS;

        for (i, offset) in offsets.into_iter().enumerate() {
            top += offset + 1;
            let level = PriceLevel::new(i as u64 + 1, price(&ticks, top), 1);
            prop_assert_eq!(buffer.add_or_update(level), Admission::Stored);
            prop_assert_eq!(buffer.best().unwrap().id, i as u64 + 1);
        }
    }
}
