//! Core zero-overhead types
//!
//! This module provides the fundamental building blocks shared by every book:
//! - `PriceLevel`: Copy value stored in each slot, with a vacancy sentinel
//! - `Side`: bid or offer
//! - `TickSize`: decimal price to integer tick conversion
//! - Error types for queries and construction

pub mod errors;
pub mod types;

// Re-export commonly used types
pub use errors::{BookError, ConfigError};
pub use types::{PriceLevel, Side, TickSize};
