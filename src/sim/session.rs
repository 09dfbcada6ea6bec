// Bunker session - owns every engine and publishes snapshots
//
// One session per run, one logical writer. All engines share the session's
// seeded generator, every tick method is synchronous and applies all derived
// fields before returning, and the presentation layer only ever sees the
// immutable snapshot taken afterwards.

use super::activity::ActivityLog;
use super::environment::{EnvironmentConfig, EnvironmentEngine};
use super::mining::{MiningConfig, MiningEngine};
use super::protocol::resolve_protocol_level;
use super::queue::{QueueConfig, TransmissionQueue};
use super::rng::SimRng;
use super::vitals::{VitalsConfig, VitalsEngine};
use crate::types::{
    Balance, EnvironmentalState, MiningState, Proof, ProtocolLevel, ReceptionRecord,
    SystemAlert, SystemVitals, TransmissionRecord, WalletInfo, WalletTransaction, format_bnkr,
};
use serde::Serialize;
use tracing::{info, warn};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Aggregate configuration for a session's engines
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Explicit RNG seed; None draws from OS entropy
    pub seed: Option<u64>,

    pub environment: EnvironmentConfig,
    pub queue: QueueConfig,
    pub mining: MiningConfig,
    pub vitals: VitalsConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            environment: EnvironmentConfig::default(),
            queue: QueueConfig::default(),
            mining: MiningConfig::default(),
            vitals: VitalsConfig::default(),
        }
    }
}

// =============================================================================
// WALLET EVENTS
// =============================================================================

/// Completion callback from the asynchronous wallet collaborator
///
/// The runner submits wallet calls off the tick path and feeds their
/// outcomes back through these events, so the session itself never blocks.
#[derive(Debug, Clone)]
pub enum WalletEvent {
    Connected(WalletInfo),
    ConnectFailed(String),
    Disconnected,
    TransferSubmitted(WalletTransaction),
    TransferFailed(String),
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Read-only view of the whole session after a tick
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub environment: EnvironmentalState,
    pub protocol_level: ProtocolLevel,
    pub emergency_mode: bool,
    pub transmissions: Vec<TransmissionRecord>,
    pub receptions: Vec<ReceptionRecord>,
    pub mining: MiningState,
    pub proofs: Vec<Proof>,
    pub vitals: SystemVitals,
    pub alerts: Vec<SystemAlert>,
    pub wallet: WalletSnapshot,
    pub rf_log: Vec<String>,
    pub emergency_log: Vec<String>,
    pub mining_log: Vec<String>,
    pub diagnostics_log: Vec<String>,
    pub wallet_log: Vec<String>,
}

/// Wallet state as mirrored by the session
#[derive(Debug, Clone, Serialize)]
pub struct WalletSnapshot {
    pub connected: bool,
    pub public_key: Option<String>,
    pub balance: Balance,
    pub history: Vec<WalletTransaction>,
}

// =============================================================================
// SESSION
// =============================================================================

/// The per-run state container
pub struct BunkerSession {
    rng: SimRng,
    environment: EnvironmentEngine,
    queue: TransmissionQueue,
    mining: MiningEngine,
    vitals: VitalsEngine,

    /// Derived every emergency tick, never patched incrementally
    protocol_level: ProtocolLevel,

    /// Mirrored wallet connection state
    wallet_info: Option<WalletInfo>,

    /// Mirrored wallet history, newest first
    wallet_history: Vec<WalletTransaction>,

    wallet_log: ActivityLog,
}

impl BunkerSession {
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SimRng::seeded(seed),
            None => SimRng::from_entropy(),
        };

        let environment = EnvironmentEngine::new(config.environment);
        let protocol_level = resolve_protocol_level(environment.state());

        Self {
            rng,
            environment,
            queue: TransmissionQueue::new(config.queue),
            mining: MiningEngine::new(config.mining),
            vitals: VitalsEngine::new(config.vitals),
            protocol_level,
            wallet_info: None,
            wallet_history: Vec::new(),
            wallet_log: ActivityLog::with_lines(
                8,
                ["> WALLET SYSTEM INITIALIZED", "> AWAITING WALLET CONNECTION..."],
            ),
        }
    }

    // -------------------------------------------------------------------------
    // Ticks
    // -------------------------------------------------------------------------

    /// RF tick: antenna/signal evolution plus the transmission pipeline
    pub fn tick_rf(&mut self) {
        self.environment.tick_rf_signals(&mut self.rng);
        self.queue.tick(&mut self.rng, self.environment.state());
    }

    /// Emergency tick: link evolution, protocol level, bunker-block arrivals
    pub fn tick_emergency(&mut self) {
        self.environment.tick_link_state(&mut self.rng);
        self.protocol_level = resolve_protocol_level(self.environment.state());
        self.environment.observe(&mut self.rng, self.protocol_level);

        let block_chance = self.queue.config().bunker_block_chance;
        if self.rng.chance(block_chance) {
            self.queue.enqueue_bunker_block(&mut self.rng);
        }
    }

    /// Mining tick: the proof-of-delay pipeline
    pub fn tick_mining(&mut self) {
        self.mining.tick(&mut self.rng);
    }

    /// Vitals tick: bunker health readings and alerts
    pub fn tick_vitals(&mut self) {
        self.vitals.tick(&mut self.rng);
    }

    // -------------------------------------------------------------------------
    // User actions
    // -------------------------------------------------------------------------

    /// Queue an emergency beacon and latch emergency mode
    pub fn trigger_emergency_broadcast(&mut self) -> TransmissionRecord {
        warn!("emergency broadcast triggered");
        self.queue.enqueue_emergency(&mut self.rng)
    }

    /// Apply a wallet completion event
    pub fn apply_wallet_event(&mut self, event: WalletEvent) {
        match event {
            WalletEvent::Connected(wallet_info) => {
                info!("wallet connected: {}", wallet_info.public_key);
                self.wallet_log.push(format!(
                    "> WALLET CONNECTED: {}...",
                    &wallet_info.public_key[..8.min(wallet_info.public_key.len())]
                ));
                self.wallet_log
                    .push(format!("> BALANCE: {}", format_bnkr(wallet_info.balance)));
                self.wallet_log.push("> TRANSACTION MONITORING ACTIVE");
                self.wallet_info = Some(wallet_info);
            }

            WalletEvent::ConnectFailed(reason) => {
                warn!("wallet connection failed: {}", reason);
                self.wallet_log
                    .push(format!("> WALLET CONNECTION FAILED: {}", reason));
            }

            WalletEvent::Disconnected => {
                self.wallet_info = None;
                self.wallet_log.push("> CONNECTION STATUS: DISCONNECTED");
                self.wallet_log.push("> AWAITING WALLET CONNECTION...");
            }

            WalletEvent::TransferSubmitted(tx) => {
                self.wallet_log.push(format!(
                    "> TRANSACTION INITIATED: {}",
                    tx.signature.truncated()
                ));
                self.wallet_log
                    .push(format!("> AMOUNT: {}", format_bnkr(tx.amount)));

                // Mirror the balance the wallet already deducted
                if let Some(info) = self.wallet_info.as_mut() {
                    info.balance = info.balance.saturating_sub(tx.amount);
                }

                self.queue.enqueue(&tx, &mut self.rng);
                self.wallet_history.insert(0, tx);
            }

            WalletEvent::TransferFailed(reason) => {
                // Recoverable by design: surfaced inline, no record created
                self.wallet_log
                    .push(format!("> TRANSACTION FAILED: {}", reason));
            }
        }
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    pub fn protocol_level(&self) -> ProtocolLevel {
        self.protocol_level
    }

    pub fn emergency_mode(&self) -> bool {
        self.queue.emergency_mode()
    }

    pub fn wallet_connected(&self) -> bool {
        self.wallet_info.is_some()
    }

    pub fn environment(&self) -> &EnvironmentalState {
        self.environment.state()
    }

    pub fn mining_state(&self) -> &MiningState {
        self.mining.state()
    }

    /// Immutable view of everything the presentation layer renders
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            environment: self.environment.state().clone(),
            protocol_level: self.protocol_level,
            emergency_mode: self.queue.emergency_mode(),
            transmissions: self.queue.records(),
            receptions: self.queue.receptions(),
            mining: self.mining.state().clone(),
            proofs: self.mining.proofs(),
            vitals: self.vitals.vitals().clone(),
            alerts: self.vitals.alerts(),
            wallet: WalletSnapshot {
                connected: self.wallet_info.is_some(),
                public_key: self.wallet_info.as_ref().map(|i| i.public_key.clone()),
                balance: self.wallet_info.as_ref().map(|i| i.balance).unwrap_or(0),
                history: self.wallet_history.clone(),
            },
            rf_log: self.queue.log().lines(),
            emergency_log: self.environment.log().lines(),
            mining_log: self.mining.log().lines(),
            diagnostics_log: self.vitals.log().lines(),
            wallet_log: self.wallet_log.lines(),
        }
    }

    // -------------------------------------------------------------------------
    // Test hooks
    // -------------------------------------------------------------------------

    /// Force link conditions for scenario tests
    #[cfg(test)]
    pub fn force_link_state(
        &mut self,
        connectivity: crate::types::Connectivity,
        uplink: crate::types::SatelliteUplink,
    ) {
        self.environment.set_link_state(connectivity, uplink);
        self.protocol_level = resolve_protocol_level(self.environment.state());
    }

    /// Force the mesh node count for scenario tests
    #[cfg(test)]
    pub fn force_mesh_node_count(&mut self, count: u8) {
        self.environment.set_mesh_node_count(count);
        self.protocol_level = resolve_protocol_level(self.environment.state());
    }

    /// Direct access to the mining engine for scenario tests
    #[cfg(test)]
    pub fn mining_mut(&mut self) -> &mut MiningEngine {
        &mut self.mining
    }
}

// =============================================================================
// TESTS
// =============================================================================
