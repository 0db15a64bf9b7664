//! Command-line interface for the pyggpot coin-pot ledger
//!
//! Adds coins to a pot, shakes coins out of it and lists what is left.
//! Results go to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pyggpot_core::{Coins, LedgerStore, PotId};
use pyggpot_effects::{FileLedgerHandler, MemoryLedgerHandler, SeededRandomHandler};
use pyggpot_ledger::CoinLedger;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::CoinsListResponse;
use config::{LedgerBackend, PyggpotConfig};

#[derive(Parser)]
#[command(name = "pyggpot")]
#[command(about = "pyggpot - coin pots with proportional random removal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".pyggpot/config.toml")]
    config: PathBuf,

    /// Ledger file, overrides `ledger.path`
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Random seed, overrides `random.seed`
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add coin entries to a pot
    Add {
        /// Pot identifier
        #[arg(long)]
        pot: u64,

        /// Entries as KIND=COUNT, e.g. gold=3 bronze=8
        #[arg(value_parser = commands::parse_coins, allow_hyphen_values = true)]
        entries: Vec<Coins>,
    },

    /// Shake coins out of a pot
    Remove {
        /// Pot identifier
        #[arg(long)]
        pot: u64,

        /// Number of coins to remove
        #[arg(long)]
        count: u64,
    },

    /// List every row of a pot
    List {
        /// Pot identifier
        #[arg(long)]
        pot: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let log_level = if config.logging.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let random = match config.random.seed {
        Some(seed) => SeededRandomHandler::with_seed(seed),
        None => SeededRandomHandler::from_time(),
    };
    info!(seed = random.seed(), "random source ready");

    let response = match config.ledger.backend {
        LedgerBackend::File => {
            let store = FileLedgerHandler::open(&config.ledger.path).with_context(|| {
                format!("Failed to open ledger {}", config.ledger.path.display())
            })?;
            info!(path = %config.ledger.path.display(), "using file ledger");
            run(&CoinLedger::new(store, random), cli.command)?
        }
        LedgerBackend::Memory => {
            info!("using in-memory ledger; nothing will be persisted");
            run(&CoinLedger::new(MemoryLedgerHandler::new(), random), cli.command)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(cli: &Cli) -> Result<PyggpotConfig> {
    let mut config = PyggpotConfig::load_from_file(&cli.config)?;
    config.merge_with_env()?;
    config.apply_flags(cli.ledger.clone(), cli.seed, cli.verbose);
    config.validate()?;
    Ok(config)
}

fn run<S: LedgerStore>(
    ledger: &CoinLedger<S, SeededRandomHandler>,
    command: Commands,
) -> Result<CoinsListResponse> {
    match command {
        Commands::Add { pot, entries } => commands::add(ledger, PotId(pot), &entries),
        Commands::Remove { pot, count } => commands::remove(ledger, PotId(pot), count),
        Commands::List { pot } => commands::list(ledger, PotId(pot)),
    }
}
