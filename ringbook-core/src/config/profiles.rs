//! Configuration profiles for common book sizes
//!
//! Provides pre-configured profiles for:
//! - Compact: top 10 levels, cheapest to scan on delete repair
//! - Standard: 50 levels, the default
//! - Deep: 1000 levels for wide, slow-moving books

use super::constants::DEFAULT_PRECISION;
use super::types::BookConfig;

/// Configuration profile name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileName {
    Compact,
    Standard,
    Deep,
}

impl ProfileName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Standard => "standard",
            Self::Deep => "deep",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "compact" | "small" => Some(Self::Compact),
            "standard" | "default" => Some(Self::Standard),
            "deep" | "wide" => Some(Self::Deep),
            _ => None,
        }
    }
}

/// Configuration profile with size-specific defaults
pub struct ConfigProfile;

impl ConfigProfile {
    /// 10 levels per side
    pub fn compact() -> BookConfig {
        BookConfig::new(DEFAULT_PRECISION, 10)
    }

    /// 50 levels per side
    pub fn standard() -> BookConfig {
        BookConfig::default()
    }

    /// 1000 levels per side
    pub fn deep() -> BookConfig {
        BookConfig::new(DEFAULT_PRECISION, 1000)
    }

    /// Get configuration for a profile name
    pub fn from_name(name: ProfileName) -> BookConfig {
        match name {
            ProfileName::Compact => Self::compact(),
            ProfileName::Standard => Self::standard(),
            ProfileName::Deep => Self::deep(),
        }
    }
}
