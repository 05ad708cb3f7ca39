use super::constants::{DEFAULT_DEPTH, DEFAULT_PRECISION};
use crate::sync::SyncPolicy;
use serde::{Deserialize, Serialize};

/// Book construction parameters
///
/// Immutable once a book is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookConfig {
    /// Decimal places per price; one tick is 10^-precision
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Maximum number of distinct price levels kept per side
    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Synchronization discipline for shared books
    #[serde(default)]
    pub policy: SyncPolicy,
}

impl BookConfig {
    pub fn new(precision: u32, depth: usize) -> Self {
        Self {
            precision,
            depth,
            policy: SyncPolicy::default(),
        }
    }

    /// Same parameters with a different sync policy
    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self::new(default_precision(), default_depth())
    }
}

// Default value functions
fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

fn default_depth() -> usize {
    DEFAULT_DEPTH
}
