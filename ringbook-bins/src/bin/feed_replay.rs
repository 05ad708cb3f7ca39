//! Synthetic Feed Replay
//!
//! Drives a shared book with one writer thread per side and a pool of reader
//! threads polling the touch, then reports throughput per policy.
//!
//! ## Usage
//!
//! ```bash
//! # 1M events per side into a depth-50 book under the lockfree policy
//! ringbook-feed-replay --policy lockfree --events 1000000
//!
//! # Snapshot policy, 8 readers, config from file
//! ringbook-feed-replay --config book.json --policy snapshot --readers 8
//! ```

use anyhow::{anyhow, Result};
use clap::Parser;
use ringbook_bins::common::{setup, CommonArgs};
use ringbook_core::data::SyntheticFeed;
use ringbook_core::sync::{build, ConcurrentBook};
use ringbook_core::{Applied, Side};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ringbook-feed-replay")]
#[command(about = "Replay a synthetic feed into a shared book", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Events per side (0 = run until Ctrl-C)
    #[arg(short, long, default_value = "1000000")]
    events: u64,

    /// Reader threads polling best bid and offer
    #[arg(short, long, default_value = "2")]
    readers: usize,
}

/// Per-writer outcome counts
#[derive(Debug, Default, Clone, Copy)]
struct WriterStats {
    events: u64,
    stored: u64,
    rejected: u64,
    removed: u64,
    not_resident: u64,
}

impl WriterStats {
    fn record(&mut self, applied: Applied) {
        self.events += 1;
        match applied {
            Applied::Stored => self.stored += 1,
            Applied::Rejected => self.rejected += 1,
            Applied::Removed => self.removed += 1,
            Applied::NotResident => self.not_resident += 1,
        }
    }

    fn merge(self, other: WriterStats) -> WriterStats {
        WriterStats {
            events: self.events + other.events,
            stored: self.stored + other.stored,
            rejected: self.rejected + other.rejected,
            removed: self.removed + other.removed,
            not_resident: self.not_resident + other.not_resident,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = setup(&cli.common)?;

    info!("=== Ringbook: Synthetic Feed Replay ===");

    let book = build(config.policy, &config)?;
    let running = Arc::new(AtomicBool::new(true));

    let running_ctrlc = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || {
        warn!("Received Ctrl+C, stopping writers...");
        running_ctrlc.store(false, Ordering::Release);
    }) {
        warn!("Failed to set Ctrl-C handler: {}. Run stops at the event limit only.", e);
    }

    let mut feed = cli.common.feed_config(&config);
    if cli.events > 0 {
        feed = feed.with_limit(cli.events);
    }

    let reads = Arc::new(AtomicU64::new(0));
    let empty_reads = Arc::new(AtomicU64::new(0));
    let writers_done = Arc::new(AtomicBool::new(false));

    let start = Instant::now();

    let reader_handles: Vec<_> = (0..cli.readers)
        .map(|_| {
            let book = Arc::clone(&book);
            let done = Arc::clone(&writers_done);
            let reads = Arc::clone(&reads);
            let empty_reads = Arc::clone(&empty_reads);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    for side in [Side::Bid, Side::Offer] {
                        if book.best(side).is_err() {
                            empty_reads.fetch_add(1, Ordering::Relaxed);
                        }
                        reads.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    let writer_handles: Vec<_> = [Side::Bid, Side::Offer]
        .into_iter()
        .map(|side| {
            let book: Arc<dyn ConcurrentBook> = Arc::clone(&book);
            let running = Arc::clone(&running);
            let events = SyntheticFeed::new(feed.for_side(side));
            thread::Builder::new()
                .name(format!("writer-{}", side))
                .spawn(move || {
                    let mut stats = WriterStats::default();
                    for event in events {
                        if !running.load(Ordering::Acquire) {
                            break;
                        }
                        stats.record(book.apply(&event));
                    }
                    stats
                })
        })
        .collect::<std::io::Result<_>>()?;

    let mut total = WriterStats::default();
    for handle in writer_handles {
        let stats = handle
            .join()
            .map_err(|_| anyhow!("Writer thread panicked"))?;
        total = total.merge(stats);
    }
    let elapsed = start.elapsed();

    writers_done.store(true, Ordering::Release);
    for handle in reader_handles {
        handle
            .join()
            .map_err(|_| anyhow!("Reader thread panicked"))?;
    }

    print_stats(&total, elapsed.as_secs_f64(), reads.load(Ordering::Relaxed), empty_reads.load(Ordering::Relaxed));

    match (book.best_bid(), book.best_offer()) {
        (Ok(bid), Ok(offer)) => info!("Final touch: {} / {}", bid, offer),
        (bid, offer) => info!("Final touch: bid={:?} offer={:?}", bid.ok(), offer.ok()),
    }

    Ok(())
}

fn print_stats(stats: &WriterStats, seconds: f64, reads: u64, empty_reads: u64) {
    info!("=== Final Statistics ===");
    info!("Events applied: {}", stats.events);
    info!("Stored: {}  Rejected: {}", stats.stored, stats.rejected);
    info!("Removed: {}  Not resident: {}", stats.removed, stats.not_resident);
    info!("Reads: {} ({} on an empty side)", reads, empty_reads);

    if seconds > 0.0 {
        info!("Write throughput: {:.0} events/s", stats.events as f64 / seconds);
        info!("Read throughput: {:.0} reads/s", reads as f64 / seconds);
    }

    if stats.events > 0 {
        let rejection_rate = (stats.rejected as f64 / stats.events as f64) * 100.0;
        info!("Rejection rate: {:.2}%", rejection_rate);
    }
}
