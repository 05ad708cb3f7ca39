//! Market data events consumed by the books
//!
//! A feed decoder (FIX incremental refresh, exchange binary protocol, ...)
//! turns each book entry into one [`BookEvent`]. Decoding itself lives outside
//! this crate.

use crate::core::{PriceLevel, Side};
use serde::{Deserialize, Serialize};

/// What the feed asks the book to do with an entry
///
/// Mirrors the New / Change / Delete update actions of incremental refresh
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum UpdateAction {
    New = 0,
    Change = 1,
    Delete = 2,
}

/// One add, update or delete for one side of the book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookEvent {
    pub action: UpdateAction,
    pub side: Side,
    pub level: PriceLevel,
}

impl BookEvent {
    #[inline(always)]
    pub const fn new(action: UpdateAction, side: Side, level: PriceLevel) -> Self {
        Self {
            action,
            side,
            level,
        }
    }

    #[inline(always)]
    pub const fn add(side: Side, level: PriceLevel) -> Self {
        Self::new(UpdateAction::New, side, level)
    }

    #[inline(always)]
    pub const fn update(side: Side, level: PriceLevel) -> Self {
        Self::new(UpdateAction::Change, side, level)
    }

    #[inline(always)]
    pub const fn delete(side: Side, level: PriceLevel) -> Self {
        Self::new(UpdateAction::Delete, side, level)
    }
}

/// Result of applying one event to a single-threaded book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// New or Change written to its slot
    Stored,
    /// New or Change dropped by admission control
    Rejected,
    /// Delete vacated a resident level
    Removed,
    /// Delete for a price that was not resident
    NotResident,
}
