//! Domain-specific error types for the level buffers
//!
//! Rejected orders are not errors: dropping a price outside the admissible
//! range is the buffer's admission policy and is reported through
//! [`crate::orderbook::Admission`] instead.

use crate::core::types::Side;
use thiserror::Error;

/// Errors raised by book queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookError {
    /// The queried side holds no resident level
    #[error("{side} side of the book is empty")]
    EmptyBook {
        /// Side that was queried
        side: Side,
    },
}

/// Errors raised while validating book construction parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Depth outside `1..=max`
    #[error("invalid depth {depth}: must be between 1 and {max}")]
    InvalidDepth { depth: usize, max: usize },

    /// Precision outside `1..=max`
    #[error("invalid precision {precision}: must be between 1 and {max}")]
    InvalidPrecision { precision: u32, max: u32 },

    /// Unrecognised synchronization policy name
    #[error("unknown sync policy '{0}', expected exclusive, snapshot or lockfree")]
    UnknownPolicy(String),
}
