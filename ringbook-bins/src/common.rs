//! Common utilities for all binaries
//!
//! Shared initialization, CLI parsing, and setup code.

use anyhow::Result;
use clap::Args;
use ringbook_core::config::ConfigProfile;
use ringbook_core::data::SyntheticFeedConfig;
use ringbook_core::sync::SyncPolicy;
use ringbook_core::utils::init_logger;
use ringbook_core::BookConfig;
use std::path::PathBuf;
use tracing::info;

/// Common CLI arguments for all binaries
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// JSON config file (precision, depth, policy)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Named size profile: compact, standard, deep
    #[arg(long, conflicts_with = "config")]
    pub profile: Option<String>,

    /// Override decimal places per price
    #[arg(short, long)]
    pub precision: Option<u32>,

    /// Override levels kept per side
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Sync policy: exclusive, snapshot, lockfree
    #[arg(long)]
    pub policy: Option<SyncPolicy>,

    /// Synthetic feed seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl CommonArgs {
    /// Resolve the book config: file or profile first, then CLI overrides
    pub fn book_config(&self) -> Result<BookConfig> {
        let mut config = match (&self.config, &self.profile) {
            (Some(path), _) => BookConfig::load(path)?,
            (None, Some(name)) => {
                let name = ringbook_core::config::ProfileName::parse(name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown profile '{}'", name))?;
                ConfigProfile::from_name(name)
            }
            (None, None) => BookConfig::default(),
        };

        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        config.validate()?;

        Ok(config)
    }

    /// Synthetic feed matching the book's precision
    pub fn feed_config(&self, config: &BookConfig) -> SyntheticFeedConfig {
        SyntheticFeedConfig {
            seed: self.seed,
            precision: config.precision,
            ..SyntheticFeedConfig::default()
        }
    }
}

/// Install logging and log the resolved config
pub fn setup(args: &CommonArgs) -> Result<BookConfig> {
    init_logger(&args.log_level, args.json_logs)?;

    let config = args.book_config()?;
    info!(
        precision = config.precision,
        depth = config.depth,
        policy = %config.policy,
        "book configured"
    );

    Ok(config)
}
