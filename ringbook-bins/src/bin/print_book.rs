//! Book Snapshot Printer
//!
//! Replays a synthetic feed into a single-threaded book and prints the
//! result. Useful for eyeballing eviction and gap behaviour.
//!
//! ## Usage
//!
//! ```bash
//! # Top 5 levels after 10k events
//! ringbook-print-book
//!
//! # Top 10 levels of a compact book
//! ringbook-print-book --profile compact --levels 10
//!
//! # JSON output
//! ringbook-print-book --format json
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use ringbook_bins::common::{setup, CommonArgs};
use ringbook_core::data::SyntheticFeed;
use ringbook_core::orderbook::BookSnapshot;
use ringbook_core::{LevelBook, PriceLevel};
use rust_decimal::Decimal;
use serde_json::json;

#[derive(Parser)]
#[command(name = "ringbook-print-book")]
#[command(about = "Print a replayed book", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Events to replay before printing
    #[arg(short, long, default_value = "10000")]
    events: u64,

    /// Number of levels to display per side
    #[arg(long, default_value = "5")]
    levels: usize,

    /// Output format (pretty, compact, json)
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = setup(&cli.common)?;

    let mut book = LevelBook::from_config(&config)?;
    let feed = SyntheticFeed::new(cli.common.feed_config(&config).with_limit(cli.events));
    for event in feed {
        book.apply(&event);
    }

    let snapshot = book.snapshot();
    match cli.format.as_str() {
        "json" => print_json(&snapshot, cli.levels)?,
        "compact" => print_compact(&snapshot, cli.levels),
        "pretty" => print_pretty(&snapshot, cli.levels),
        other => bail!("Unknown format '{}', expected pretty, compact or json", other),
    }

    Ok(())
}

fn spread(snapshot: &BookSnapshot) -> Option<Decimal> {
    Some(snapshot.offers.first()?.price - snapshot.bids.first()?.price)
}

fn print_pretty(snapshot: &BookSnapshot, max_levels: usize) {
    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  RINGBOOK  │  depth {:>5}  │  precision {:>2}              ║", snapshot.depth, snapshot.precision);
    println!("║  resident  │  bids {:>5}   │  offers {:>5}              ║", snapshot.bids.len(), snapshot.offers.len());
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    let shown = |levels: &[PriceLevel]| levels.iter().take(max_levels).copied().collect::<Vec<_>>();
    let offers = shown(&snapshot.offers);
    let bids = shown(&snapshot.bids);
    let max_qty = offers
        .iter()
        .chain(bids.iter())
        .map(|l| l.quantity)
        .max()
        .unwrap_or(1);

    // Offers (highest first, so the touch sits next to the bids)
    println!("        OFFERS        QTY        ID   BAR");
    println!("    ══════════════════════════════════════════════");
    for level in offers.iter().rev() {
        print_row(level, max_qty);
    }

    println!();
    println!("    ──────────────────────────────────────────────");
    match spread(snapshot) {
        Some(spread) => println!("     SPREAD: {}", spread),
        None => println!("     SPREAD: n/a (one side empty)"),
    }
    println!("    ──────────────────────────────────────────────");
    println!();

    println!("         BIDS         QTY        ID   BAR");
    println!("    ══════════════════════════════════════════════");
    for level in &bids {
        print_row(level, max_qty);
    }
    println!();
}

fn print_row(level: &PriceLevel, max_qty: u64) {
    let bar = create_ascii_bar(level.quantity, max_qty, 15);
    println!("    {:>12}  {:>6}  {:>8}   {}", level.price, level.quantity, level.id, bar);
}

fn print_compact(snapshot: &BookSnapshot, max_levels: usize) {
    println!(
        "Depth: {}  Resident: {}x{}  Spread: {}",
        snapshot.depth,
        snapshot.bids.len(),
        snapshot.offers.len(),
        spread(snapshot).map_or_else(|| "n/a".to_string(), |s| s.to_string())
    );

    for level in snapshot.offers.iter().take(max_levels).rev() {
        println!("OFFER  {:>12}  {:>6}", level.price, level.quantity);
    }
    for level in snapshot.bids.iter().take(max_levels) {
        println!("BID    {:>12}  {:>6}", level.price, level.quantity);
    }
}

fn print_json(snapshot: &BookSnapshot, max_levels: usize) -> Result<()> {
    let output = json!({
        "depth": snapshot.depth,
        "precision": snapshot.precision,
        "spread": spread(snapshot),
        "bids": snapshot.bids.iter().take(max_levels).collect::<Vec<_>>(),
        "offers": snapshot.offers.iter().take(max_levels).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn create_ascii_bar(size: u64, max_size: u64, width: usize) -> String {
    if max_size == 0 {
        return " ".repeat(width);
    }

    let filled = ((size as f64 / max_size as f64) * width as f64) as usize;
    let filled = filled.min(width);

    "█".repeat(filled) + &"░".repeat(width - filled)
}
