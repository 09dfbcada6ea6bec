// Runner - drives a live session on periodic ticks
// Principle: One writer, four clocks, deterministic teardown

use crate::cli::config::RunnerConfig;
use crate::sim::{BunkerSession, SessionSnapshot, WalletEvent};
use crate::types::{Address, UNITS_PER_BNKR};
use crate::wallet::{MockWallet, MockWalletConfig, Wallet};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Well-known demo recipients for auto-sent transfers
const DEMO_RECIPIENTS: [&str; 3] = [
    "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
    "4Nd1mYbSrxCbq4c9rFQpYvNyC2s7pXkQ2pGHhZ1kQ2pG",
    "7cVfgArCheMR6Cs4t6vz5rfnqd56vZq4ndaBrY5xkxXy",
];

/// Run a session until ctrl-c or the configured duration elapses
///
/// All state mutation happens inside this loop; when it exits the intervals
/// and the event channel are dropped, so no scheduled work can fire after
/// teardown.
pub async fn run_session(config: RunnerConfig) {
    info!("🚀 Starting bunker session");
    match config.session.seed {
        Some(seed) => info!("🎲 Seed: {} (replayable)", seed),
        None => info!("🎲 Seed: OS entropy"),
    }

    let mut session = BunkerSession::new(config.session.clone());

    let wallet: Arc<dyn Wallet> = Arc::new(MockWallet::new(MockWalletConfig {
        seed: config.session.seed.unwrap_or(0xB0B5),
        ..Default::default()
    }));

    // Wallet completions re-enter the loop as events; the ticks never block
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<WalletEvent>();

    if config.connect_wallet {
        let wallet = Arc::clone(&wallet);
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            match wallet.connect().await {
                Ok(wallet_info) => {
                    let _ = event_tx.send(WalletEvent::Connected(wallet_info));
                }
                Err(e) => {
                    let _ = event_tx.send(WalletEvent::ConnectFailed(e.to_string()));
                }
            }
        });
    } else {
        info!("👛 Wallet connection skipped (--no-wallet)");
    }

    let mut rf_interval = tokio::time::interval(config.rf_tick);
    let mut emergency_interval = tokio::time::interval(config.emergency_tick);
    let mut mining_interval = tokio::time::interval(config.mining_tick);
    let mut vitals_interval = tokio::time::interval(config.vitals_tick);
    let mut stats_interval = tokio::time::interval(config.stats_interval);

    let auto_send_enabled = config.auto_send.is_some();
    let mut auto_send_interval = tokio::time::interval(
        config.auto_send.unwrap_or(std::time::Duration::from_secs(3600)),
    );
    // The first interval tick fires immediately; skip the burst transfer
    auto_send_interval.tick().await;
    let mut demo_counter: u64 = 0;

    let deadline = async {
        match config.run_for {
            Some(run_for) => tokio::time::sleep(run_for).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    info!(
        "⏱️  Ticks: rf {:?} | emergency {:?} | mining {:?} | vitals {:?}",
        config.rf_tick, config.emergency_tick, config.mining_tick, config.vitals_tick
    );

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("⚠️  Ctrl+C received, shutting down...");
                break;
            }

            _ = &mut deadline => {
                info!("⏲️  Run duration elapsed, shutting down...");
                break;
            }

            _ = rf_interval.tick() => {
                session.tick_rf();
            }

            _ = emergency_interval.tick() => {
                session.tick_emergency();
            }

            _ = mining_interval.tick() => {
                session.tick_mining();
            }

            _ = vitals_interval.tick() => {
                session.tick_vitals();
            }

            _ = stats_interval.tick() => {
                emit_state(&session, config.json);
            }

            _ = auto_send_interval.tick(), if auto_send_enabled => {
                demo_counter += 1;
                start_demo_transfer(&mut session, &wallet, &event_tx, demo_counter);
            }

            Some(event) = event_rx.recv() => {
                session.apply_wallet_event(event);
            }
        }
    }

    info!("👋 Session stopped; all timers cancelled");
}

/// Emit either a JSON snapshot line or a human summary
fn emit_state(session: &BunkerSession, json: bool) {
    let snapshot = session.snapshot();

    if json {
        match serde_json::to_string(&snapshot) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("snapshot serialization failed: {}", e),
        }
        return;
    }

    log_summary(&snapshot);
}

fn log_summary(snapshot: &SessionSnapshot) {
    let confirmed = snapshot
        .transmissions
        .iter()
        .filter(|r| r.stage == crate::types::TransmissionStage::Confirmed)
        .count();

    info!(
        "📊 protocol {} | 📡 {} [{}] | 📻 {} queued / {} confirmed | ⛏️  {} proofs | 🏚️  {}",
        snapshot.protocol_level,
        snapshot.environment.connectivity,
        snapshot.environment.satellite_uplink,
        snapshot.transmissions.len(),
        confirmed,
        snapshot.mining.proofs_generated,
        snapshot.vitals.overall_status,
    );
}

/// Kick off a demo transfer through the wallet collaborator
///
/// The submit runs in its own task; success or failure comes back through
/// the event channel as a one-shot callback.
fn start_demo_transfer(
    session: &mut BunkerSession,
    wallet: &Arc<dyn Wallet>,
    event_tx: &mpsc::UnboundedSender<WalletEvent>,
    counter: u64,
) {
    if !session.wallet_connected() {
        // Unmet precondition, not a fault: surfaced inline and dropped
        session.apply_wallet_event(WalletEvent::TransferFailed(
            "no wallet connected".to_string(),
        ));
        return;
    }

    let recipient = DEMO_RECIPIENTS[(counter as usize) % DEMO_RECIPIENTS.len()];
    let amount = (1 + counter % 5) * (UNITS_PER_BNKR / 10);

    let recipient = match Address::parse(recipient) {
        Ok(addr) => addr,
        Err(e) => {
            warn!("demo recipient rejected: {}", e);
            return;
        }
    };

    let wallet = Arc::clone(wallet);
    let event_tx = event_tx.clone();
    tokio::spawn(async move {
        match wallet.submit_transfer(&recipient, amount).await {
            Ok(signature) => {
                // Pull the full entry back out of the wallet's history
                let entry = wallet.query_history().await.ok().and_then(|history| {
                    history.into_iter().find(|t| t.signature == signature)
                });
                match entry {
                    Some(tx) => {
                        let _ = event_tx.send(WalletEvent::TransferSubmitted(tx));
                    }
                    None => {
                        let _ = event_tx.send(WalletEvent::TransferFailed(
                            "submitted transaction missing from history".to_string(),
                        ));
                    }
                }
            }
            Err(e) => {
                let _ = event_tx.send(WalletEvent::TransferFailed(e.to_string()));
            }
        }
    });
}
