//! Ledger inflation command line tool
//!
//! Runs stake-voted inflation rounds over JSON account snapshots and prints
//! the outcome as JSON on stdout.

mod input;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use input::SnapshotFile;
use ledger_inflation::{
    parse_fee_pool, rank_candidates, select_winners, tally_votes, AccountLedger, InflationEngine,
    LedgerClock, ManualClock, SequenceGuard, SystemClock,
};
use ledger_types::LedgerAmount;
use serde_json::json;
use settings::{init_logging, AppConfig};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "inflate")]
#[command(about = "Stake-voted ledger inflation rounds")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overrides the configured level (RUST_LOG still wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply one inflation round to a snapshot
    Run {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Fees collected since the last round, in whole units (e.g. 0.000288)
        #[arg(long, default_value = "0")]
        fee_pool: String,

        /// Sequence number of this round
        #[arg(long)]
        sequence: u64,

        /// Last sequence already applied to this ledger
        #[arg(long, default_value_t = 0)]
        last_applied: u64,

        /// Close time of the last applied round, in unix seconds
        #[arg(long)]
        last_applied_at: Option<u64>,

        /// Pin the ledger close time instead of reading the system clock
        #[arg(long)]
        now: Option<u64>,

        /// Write the outcome here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the vote tally and who would win, without minting
    Tally {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Apply consecutive rounds and print the supply history and audit
    Simulate {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Number of rounds to apply
        #[arg(short, long, default_value_t = 52)]
        rounds: u64,
    },

    /// Print the effective configuration as TOML
    Params,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app_config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        app_config.log_level = level;
    }
    init_logging(&app_config)?;

    match cli.command {
        Commands::Run {
            snapshot,
            fee_pool,
            sequence,
            last_applied,
            last_applied_at,
            now,
            output,
        } => {
            let fee_pool =
                parse_fee_pool(&fee_pool, &app_config.params).context("Invalid --fee-pool")?;
            let clock: Arc<dyn LedgerClock> = match now {
                Some(now) => Arc::new(ManualClock::new(now)),
                None => Arc::new(SystemClock),
            };
            let ledger = SnapshotFile::read(&snapshot)?.into_ledger(&fee_pool)?;
            let engine = InflationEngine::resume(
                app_config.params.clone(),
                Box::new(ledger),
                clock,
                SequenceGuard::resume(last_applied, last_applied_at),
            )?;

            let outcome = engine
                .run_from_ledger(fee_pool, sequence)
                .with_context(|| format!("Round {sequence} rejected"))?;
            let rendered = serde_json::to_string_pretty(&outcome)?;

            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Outcome written to {}", path.display());
                }
                None => println!("{rendered}"),
            }
        }
        Commands::Tally { snapshot } => {
            let input = SnapshotFile::read(&snapshot)?;
            let accounts = input.snapshot()?;
            let total_supply = input
                .total_supply
                .clone()
                .unwrap_or_else(|| accounts.total_balance());

            let tally = tally_votes(&accounts);
            let winners = select_winners(&tally, &total_supply, &app_config.params);
            let report = json!({
                "total_supply": total_supply,
                "min_votes": winners.min_votes,
                "rule": winners.rule,
                "winners": winners.winners,
                "candidates": rank_candidates(&tally),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Simulate { snapshot, rounds } => {
            let ledger = SnapshotFile::read(&snapshot)?.into_ledger(&LedgerAmount::zero())?;
            let start_supply = ledger.total_supply();
            let engine = InflationEngine::with_clock(
                app_config.params.clone(),
                Box::new(ledger),
                Arc::new(ManualClock::new(0)),
            )?;

            for sequence in 1..=rounds {
                engine.run_from_ledger(LedgerAmount::zero(), sequence)?;
            }

            let history = engine.supply_history();
            let audit = engine.audit_supply();
            let report = json!({
                "start_supply": start_supply,
                "end_supply": engine.total_supply(),
                "rounds": history.history_range(1, rounds).collect::<Vec<_>>(),
                "total_rounding_loss": history.total_rounding_loss(),
                "audit": audit,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Params => {
            print!("{}", toml::to_string_pretty(&app_config)?);
        }
    }

    Ok(())
}
