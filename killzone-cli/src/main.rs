//! KillZone CLI — run the decision core against local files.
//!
//! Commands:
//! - `levels` — print the psychological level map around a price
//! - `plan` — build a heuristic entry plan from a snapshot CSV
//! - `neighbors` — rank journaled trades by similarity to a target trade
//!
//! All output is JSON on stdout; advisory notes and skipped-row counts go to
//! stderr so pipelines stay clean.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use killzone_core::domain::{DailySnapshot, TradeSample};
use killzone_core::journal::{extract_features, nearest_neighbors, summarize};
use killzone_core::levels;
use killzone_core::planner::{build_entry_plan, PlanParams};

#[derive(Parser)]
#[command(
    name = "killzone",
    about = "KillZone CLI — session signal engine, entry plans, trade similarity"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the psychological level map around a price.
    Levels {
        /// Reference price.
        #[arg(long)]
        price: f64,

        /// Explicit rounding step (defaults to the price-band inference).
        #[arg(long)]
        step: Option<f64>,
    },
    /// Build a heuristic entry plan from a snapshot CSV.
    Plan {
        /// CSV with columns: trade_date, open, and optional h1_high, h1_low,
        /// h1_close, h3_high, h3_low, h3_close, atr14.
        #[arg(long)]
        snapshots: PathBuf,

        /// Live reference price.
        #[arg(long)]
        price: f64,

        /// Round-number grid step.
        #[arg(long, default_value_t = 10.0)]
        step: f64,

        /// Proximity tolerance for the round-number cohort.
        #[arg(long, default_value_t = 1.5)]
        proximity: f64,

        /// Minimum risk:reward for the bracket.
        #[arg(long, default_value_t = 1.0)]
        min_rr: f64,

        /// Account balance for sizing (requires --risk-pct).
        #[arg(long)]
        balance: Option<f64>,

        /// Risk percent per trade for sizing (requires --balance).
        #[arg(long)]
        risk_pct: Option<f64>,

        /// Units per lot.
        #[arg(long, default_value_t = 100.0)]
        contract_size: f64,
    },
    /// Rank journaled trades by similarity to a target trade.
    Neighbors {
        /// JSON array of trade samples.
        #[arg(long)]
        journal: PathBuf,

        /// Trade id to rank against.
        #[arg(long)]
        target: String,

        /// Neighbors to return.
        #[arg(long, default_value_t = 8)]
        k: usize,

        /// Default round step for trades without a level annotation.
        #[arg(long, default_value_t = 10.0)]
        step: f64,

        /// Also print a journal summary to stderr.
        #[arg(long, default_value_t = false)]
        summary: bool,
    },
}

/// One CSV row of the snapshot schema. Blank optional cells deserialize to
/// None rather than failing the import.
#[derive(Debug, Deserialize)]
struct SnapshotRow {
    trade_date: NaiveDate,
    open: f64,
    #[serde(default)]
    h1_high: Option<f64>,
    #[serde(default)]
    h1_low: Option<f64>,
    #[serde(default)]
    h1_close: Option<f64>,
    #[serde(default)]
    h3_high: Option<f64>,
    #[serde(default)]
    h3_low: Option<f64>,
    #[serde(default)]
    h3_close: Option<f64>,
    #[serde(default)]
    atr14: Option<f64>,
}

impl From<SnapshotRow> for DailySnapshot {
    fn from(row: SnapshotRow) -> Self {
        DailySnapshot {
            trade_date: row.trade_date,
            open_ts_utc: None,
            open: row.open,
            h1_high: row.h1_high,
            h1_low: row.h1_low,
            h1_close: row.h1_close,
            h3_high: row.h3_high,
            h3_low: row.h3_low,
            h3_close: row.h3_close,
            atr14: row.atr14,
            source: Some("csv".into()),
        }
    }
}

fn load_snapshots(path: &Path) -> Result<Vec<DailySnapshot>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cannot open snapshot CSV {}", path.display()))?;
    let mut snapshots = Vec::new();
    for (i, record) in reader.deserialize::<SnapshotRow>().enumerate() {
        let row = record.with_context(|| format!("bad snapshot row {}", i + 2))?;
        snapshots.push(row.into());
    }
    Ok(snapshots)
}

fn load_journal(path: &Path) -> Result<Vec<TradeSample>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read journal {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("bad journal JSON {}", path.display()))
}

fn run_levels(price: f64, step: Option<f64>) -> Result<()> {
    if price <= 0.0 {
        bail!("--price must be positive");
    }
    let generated = levels::generate(price, step);
    println!("{}", serde_json::to_string_pretty(&generated)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_plan(
    snapshots: PathBuf,
    price: f64,
    step: f64,
    proximity: f64,
    min_rr: f64,
    balance: Option<f64>,
    risk_pct: Option<f64>,
    contract_size: f64,
) -> Result<()> {
    if price <= 0.0 {
        bail!("--price must be positive");
    }
    let history = load_snapshots(&snapshots)?;
    eprintln!("loaded {} snapshots", history.len());

    let params = PlanParams {
        reference_price: price,
        round_step: step,
        round_proximity: proximity,
        min_rr,
        account_balance: balance,
        risk_percent: risk_pct,
        contract_size,
    };
    let plan = build_entry_plan(&history, &params);
    for note in &plan.notes {
        eprintln!("note: {note}");
    }
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn run_neighbors(
    journal: PathBuf,
    target: String,
    k: usize,
    step: f64,
    summary: bool,
) -> Result<()> {
    let trades = load_journal(&journal)?;
    let extraction = extract_features(&trades, step);
    if extraction.skipped > 0 {
        eprintln!(
            "skipped {} trades with invalid entry/sl/tp",
            extraction.skipped
        );
    }
    if summary {
        eprintln!(
            "summary: {}",
            serde_json::to_string(&summarize(&extraction.features))?
        );
    }

    let neighbors = nearest_neighbors(&extraction.features, &target, k, None);
    if neighbors.is_empty() {
        bail!("trade id {target:?} not found in journal (or journal has no other trades)");
    }
    println!("{}", serde_json::to_string_pretty(&neighbors)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Levels { price, step } => run_levels(price, step),
        Commands::Plan {
            snapshots,
            price,
            step,
            proximity,
            min_rr,
            balance,
            risk_pct,
            contract_size,
        } => run_plan(
            snapshots,
            price,
            step,
            proximity,
            min_rr,
            balance,
            risk_pct,
            contract_size,
        ),
        Commands::Neighbors {
            journal,
            target,
            k,
            step,
            summary,
        } => run_neighbors(journal, target, k, step, summary),
    }
}
