// CLI - Command line interface for the bunker console
// Principle: Simple, clear, composable commands

pub mod config;
pub mod runner;

use clap::{Parser, Subcommand};

/// Bunker console - off-grid crypto bunker simulation
#[derive(Parser, Debug)]
#[command(name = "bunker-console")]
#[command(author = "Bunker Terminal Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Off-grid crypto bunker simulation console")]
#[command(long_about = r#"
Drives the bunker session: the transmission queue, emergency protocols,
proof-of-delay mining and system vitals, all on their own periodic ticks.

Run with live ticks and periodic summaries:
  bunker-console run

Replayable session from a fixed seed, streaming JSON snapshots:
  bunker-console run --seed 42 --json

One-shot snapshot after a burst of synchronous ticks:
  bunker-console snapshot --seed 42 --ticks 100 --pretty
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", env = "BUNKER_LOG")]
    pub log_level: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a live session
    Run(RunCmd),

    /// Print one snapshot after a burst of synchronous ticks
    Snapshot(SnapshotCmd),
}

/// Run a live session
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// RNG seed for a replayable session (OS entropy if omitted)
    #[arg(long, env = "BUNKER_SEED")]
    pub seed: Option<u64>,

    /// RF panel tick interval in milliseconds
    #[arg(long, default_value = "2500")]
    pub rf_tick_ms: u64,

    /// Emergency panel tick interval in milliseconds
    #[arg(long, default_value = "2500")]
    pub emergency_tick_ms: u64,

    /// Mining panel tick interval in milliseconds
    #[arg(long, default_value = "1500")]
    pub mining_tick_ms: u64,

    /// Vitals panel tick interval in milliseconds
    #[arg(long, default_value = "3000")]
    pub vitals_tick_ms: u64,

    /// Seconds between state summaries
    #[arg(long, default_value = "10")]
    pub stats_secs: u64,

    /// Stream full snapshots as JSON lines instead of summaries
    #[arg(long)]
    pub json: bool,

    /// Seconds between demo transfers through the mock wallet (0 disables)
    #[arg(long, default_value = "20")]
    pub auto_send_secs: u64,

    /// Skip connecting the wallet collaborator
    #[arg(long)]
    pub no_wallet: bool,

    /// Stop automatically after this many seconds
    #[arg(long)]
    pub duration_secs: Option<u64>,
}

/// One-shot snapshot
#[derive(Parser, Debug)]
pub struct SnapshotCmd {
    /// RNG seed (OS entropy if omitted)
    #[arg(long, env = "BUNKER_SEED")]
    pub seed: Option<u64>,

    /// Synchronous ticks of every panel before the snapshot
    #[arg(long, default_value = "40")]
    pub ticks: u32,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}
