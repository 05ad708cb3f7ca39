//! Shared books for concurrent writers and readers
//!
//! Three interchangeable disciplines behind one trait:
//!
//! | Policy      | Writes                              | Reads                      |
//! |-------------|-------------------------------------|----------------------------|
//! | `Exclusive` | `Mutex<LevelBook>`                  | same mutex                 |
//! | `Snapshot`  | unlocked; write lock on anchor move | read lock, then slot load  |
//! | `LockFree`  | `AtomicCell` slots and mapper       | cell loads, no book lock   |
//!
//! `Snapshot` and `LockFree` are memory-safe with any number of threads but
//! assume one writer per side for logical consistency. Readers of either may
//! see a best level that is one write behind the slot contents. `LockFree`
//! takes no lock of its own; `AtomicCell` falls back to crossbeam's striped
//! seqlocks for its wide slot and mapper values.

pub mod atomic;
pub mod exclusive;
pub mod lockfree;
pub mod snapshot;

pub use atomic::AtomicLevelBuffer;
pub use exclusive::ExclusiveBook;
pub use lockfree::LockFreeBook;
pub use snapshot::SnapshotBook;

use crate::config::BookConfig;
use crate::core::{BookError, ConfigError, PriceLevel, Side};
use crate::data::{Applied, BookEvent, UpdateAction};
use crate::orderbook::Admission;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Book operations callable through a shared reference
pub trait ConcurrentBook: Send + Sync {
    fn add_order(&self, level: PriceLevel, side: Side) -> Admission;

    fn update_order(&self, level: PriceLevel, side: Side) -> Admission;

    fn delete_order(&self, level: PriceLevel, side: Side) -> bool;

    fn best_bid(&self) -> Result<PriceLevel, BookError>;

    fn lowest_bid(&self) -> Result<PriceLevel, BookError>;

    fn best_offer(&self) -> Result<PriceLevel, BookError>;

    fn highest_offer(&self) -> Result<PriceLevel, BookError>;

    /// Which discipline this book uses
    fn policy(&self) -> SyncPolicy;

    fn apply(&self, event: &BookEvent) -> Applied {
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

    fn best(&self, side: Side) -> Result<PriceLevel, BookError> {
        match side {
            Side::Bid => self.best_bid(),
            Side::Offer => self.best_offer(),
        }
    }
}

/// Synchronization discipline, chosen at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolicy {
    #[default]
    Exclusive,
    Snapshot,
    LockFree,
}

impl SyncPolicy {
    pub const ALL: [SyncPolicy; 3] = [SyncPolicy::Exclusive, SyncPolicy::Snapshot, SyncPolicy::LockFree];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPolicy::Exclusive => "exclusive",
            SyncPolicy::Snapshot => "snapshot",
            SyncPolicy::LockFree => "lockfree",
        }
    }
}

impl fmt::Display for SyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exclusive" | "mutex" => Ok(SyncPolicy::Exclusive),
            "snapshot" => Ok(SyncPolicy::Snapshot),
            "lockfree" | "lock-free" | "lock_free" => Ok(SyncPolicy::LockFree),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Build an empty shared book with the given discipline
pub fn build(policy: SyncPolicy, config: &BookConfig) -> Result<Arc<dyn ConcurrentBook>, ConfigError> {
    let book: Arc<dyn ConcurrentBook> = match policy {
        SyncPolicy::Exclusive => Arc::new(ExclusiveBook::from_config(config)?),
        SyncPolicy::Snapshot => Arc::new(SnapshotBook::from_config(config)?),
        SyncPolicy::LockFree => Arc::new(LockFreeBook::from_config(config)?),
    };
    Ok(book)
}
