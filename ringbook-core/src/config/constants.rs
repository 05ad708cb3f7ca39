//! Centralized limits and defaults for book construction
//!
//! Depth and precision are fixed for the lifetime of a buffer, so these are
//! plain compile-time constants.

// ===== DEFAULTS =====

/// Default decimal places per price (tick = 0.01)
pub const DEFAULT_PRECISION: u32 = 2;

/// Default number of price levels kept per side
pub const DEFAULT_DEPTH: usize = 50;

// ===== LIMITS =====

/// Largest supported precision
///
/// Ticks are i64, so at precision 9 prices up to about 9.2 billion still
/// convert. Each extra decimal place divides that ceiling by ten.
pub const MAX_PRECISION: u32 = 9;

/// Largest supported depth per side
///
/// Slots are allocated up front, so this bounds the memory of one book
/// (two sides of 1M levels each).
pub const MAX_DEPTH: usize = 1 << 20;

// ===== ENVIRONMENT OVERRIDES =====

/// Overrides `precision` when loading a config file
pub const ENV_PRECISION: &str = "RINGBOOK_PRECISION";

/// Overrides `depth` when loading a config file
pub const ENV_DEPTH: &str = "RINGBOOK_DEPTH";

/// Overrides `policy` when loading a config file
pub const ENV_POLICY: &str = "RINGBOOK_POLICY";
