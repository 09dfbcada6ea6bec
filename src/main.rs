// Bunker Console - Entry point
// Principle: The engine is synchronous and replayable; the binary just
// gives it clocks and a terminal

#![allow(dead_code)]

mod cli;
mod sim;
mod types;
mod wallet;

#[cfg(test)]
mod tests;

use clap::Parser;
use cli::config::RunnerConfig;
use cli::runner::run_session;
use cli::{Cli, Commands};
use sim::{BunkerSession, SessionConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_filter = if cli.verbose {
        "debug"
    } else {
        &cli.log_level
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter)),
        )
        .init();

    print_banner();

    match cli.command {
        Commands::Run(cmd) => {
            let config = RunnerConfig::from_run_cmd(&cmd).map_err(|e| {
                error!("Configuration error: {}", e);
                anyhow::anyhow!("Configuration error: {}", e)
            })?;

            run_session(config).await;
        }

        Commands::Snapshot(cmd) => {
            let mut session = BunkerSession::new(SessionConfig {
                seed: cmd.seed,
                ..Default::default()
            });

            for _ in 0..cmd.ticks {
                session.tick_rf();
                session.tick_emergency();
                session.tick_mining();
                session.tick_vitals();
            }

            let snapshot = session.snapshot();
            let output = if cmd.pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{}", output);
        }
    }

    Ok(())
}

/// Print the console banner
fn print_banner() {
    println!(
        r#"
    ╔═══════════════════════════════════════════════════════════╗
    ║                                                           ║
    ║   ██████╗ ██╗   ██╗███╗   ██╗██╗  ██╗███████╗██████╗      ║
    ║   ██╔══██╗██║   ██║████╗  ██║██║ ██╔╝██╔════╝██╔══██╗     ║
    ║   ██████╔╝██║   ██║██╔██╗ ██║█████╔╝ █████╗  ██████╔╝     ║
    ║   ██╔══██╗██║   ██║██║╚██╗██║██╔═██╗ ██╔══╝  ██╔══██╗     ║
    ║   ██████╔╝╚██████╔╝██║ ╚████║██║  ██╗███████╗██║  ██║     ║
    ║   ╚═════╝  ╚═════╝ ╚═╝  ╚═══╝╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝     ║
    ║                                                           ║
    ║            Off-Grid • Shortwave • Proof-of-Delay          ║
    ║                  Crypto Operations Console                ║
    ║                                                           ║
    ╚═══════════════════════════════════════════════════════════╝
    "#
    );
    println!("    Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
}
