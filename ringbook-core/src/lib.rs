//! Ringbook Core - Bounded, price-indexed limit order book
//!
//! Keeps the best `depth` price levels per side in a fixed circular array
//! addressed by integer tick offsets from the best price. Built for market
//! data handlers that need O(1) updates and best-price queries without
//! per-update allocation.
//!
//! ## Architecture
//! - **Preallocated** slot arrays, overwritten in place
//! - **Integer ticks** derived from `rust_decimal` prices at a fixed precision
//! - **Better prices always win**: a new best shifts the window and evicts the
//!   worst levels; a worse price is dropped once the window is full
//! - **Three sync disciplines** selected at construction
//!
//! ## Core Modules
//! - `core`: `PriceLevel`, `Side`, `TickSize`, error types
//! - `config`: construction parameters, profiles, env overrides
//! - `data`: feed events and a synthetic feed
//! - `orderbook`: index mapper, sided buffer, two-sided `LevelBook`
//! - `sync`: `ExclusiveBook`, `SnapshotBook`, `LockFreeBook`
//! - `utils`: logger setup

pub mod config;
pub mod core;
pub mod data;
pub mod orderbook;
pub mod sync;
pub mod utils;

// Re-export core types
pub use crate::core::{BookError, ConfigError, PriceLevel, Side, TickSize};

pub use crate::config::{BookConfig, ConfigProfile};
pub use crate::data::{Applied, BookEvent, SyntheticFeed, SyntheticFeedConfig, UpdateAction};
pub use crate::orderbook::{Admission, BookSnapshot, LevelBook, PriceIndexMapper, SidedLevelBuffer};
pub use crate::sync::{ConcurrentBook, ExclusiveBook, LockFreeBook, SnapshotBook, SyncPolicy};

// Re-export error types
pub use anyhow::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    // Core types
    pub use crate::core::{BookError, PriceLevel, Side, TickSize};

    // Books
    pub use crate::orderbook::{Admission, LevelBook};
    pub use crate::sync::{build, ConcurrentBook, SyncPolicy};

    // Configuration and data
    pub use crate::config::BookConfig;
    pub use crate::data::{BookEvent, UpdateAction};

    // Error types
    pub use crate::{Error, Result};
}
