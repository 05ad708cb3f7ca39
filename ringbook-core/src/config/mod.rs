pub mod constants;
pub mod profiles;
pub mod types;

pub use constants::*;
pub use profiles::{ConfigProfile, ProfileName};
pub use types::BookConfig;

use crate::core::ConfigError;
use crate::sync::SyncPolicy;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

impl BookConfig {
    /// Load configuration from a JSON file with environment variable overrides
    ///
    /// Missing fields fall back to defaults. `RINGBOOK_PRECISION`,
    /// `RINGBOOK_DEPTH` and `RINGBOOK_POLICY` win over the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();

        let raw = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        let mut cfg: BookConfig =
            serde_json::from_str(&raw).context("Failed to deserialize configuration")?;

        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;

        debug!(
            "Loaded book config from {}: precision={}, depth={}, policy={}",
            config_path.display(),
            cfg.precision,
            cfg.depth,
            cfg.policy
        );

        Ok(cfg)
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PRECISION) {
            self.precision = value
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid precision: '{}'", ENV_PRECISION, value))?;
        }

        if let Some(value) = lookup(ENV_DEPTH) {
            self.depth = value
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid depth: '{}'", ENV_DEPTH, value))?;
        }

        if let Some(value) = lookup(ENV_POLICY) {
            self.policy = value.trim().parse::<SyncPolicy>()?;
        }

        Ok(())
    }

    /// Validate construction parameters
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(ConfigError::InvalidDepth {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }

        if self.precision == 0 || self.precision > MAX_PRECISION {
            return Err(ConfigError::InvalidPrecision {
                precision: self.precision,
                max: MAX_PRECISION,
            });
        }

        Ok(())
    }
}
