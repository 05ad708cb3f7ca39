//! Bounded, price-indexed level books
//!
//! - `mapper`: tick to slot arithmetic and anchor maintenance
//! - `buffer`: one side of the book in a fixed circular array
//! - `book`: bid and offer buffers behind one facade
//!
//! Each side keeps at most `depth` levels at consecutive tick offsets from its
//! best price. Better prices always win; a worse price is admitted only while
//! the span from best to worst is still narrower than `depth`.

pub mod book;
pub mod buffer;
pub mod mapper;

#[cfg(test)]
mod buffer_proptest;

pub use book::{BookSnapshot, LevelBook};
pub use buffer::{Admission, SidedLevelBuffer};
pub use mapper::{Anchor, Placement, PriceIndexMapper, SlotRange, SlotSpan, Vacate};
