// Lifecycle scenarios - end-to-end paths through a whole session

use crate::sim::{BunkerSession, QueueConfig, SessionConfig, WalletEvent};
use crate::types::{
    Address, Connectivity, ProtocolLevel, SatelliteUplink, TransactionId, TransactionKind,
    TransactionStatus, TransmissionCategory, TransmissionStage, WalletTransaction,
    EMERGENCY_FREQUENCY_MHZ, UNITS_PER_BNKR,
};
use crate::wallet::{MockWallet, MockWalletConfig, Wallet, WalletError};
use chrono::Utc;
use std::time::Duration;

const RECIPIENT: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

/// Session config with link randomness and spontaneous arrivals disabled
fn pinned_config(seed: u64) -> SessionConfig {
    let mut config = SessionConfig {
        seed: Some(seed),
        ..Default::default()
    };
    config.environment.connectivity_resample_chance = 0.0;
    config.environment.uplink_resample_chance = 0.0;
    config.queue.heartbeat_chance = 0.0;
    config.queue.bunker_block_chance = 0.0;
    config.queue.reception_chance = 0.0;
    config
}

fn transfer(amount: u64) -> WalletTransaction {
    WalletTransaction {
        signature: TransactionId("2fJ8kQpW9xM3nR5tV7yB4cD6gH1sL0zA".to_string()),
        kind: TransactionKind::Send,
        amount,
        status: TransactionStatus::Pending,
        timestamp: Utc::now(),
        from: None,
        to: Address::parse(RECIPIENT).ok(),
    }
}

#[test]
fn test_transaction_walks_every_stage_in_order() {
    let mut config = pinned_config(1);
    config.queue = QueueConfig {
        heartbeat_chance: 0.0,
        bunker_block_chance: 0.0,
        reception_chance: 0.0,
        log_chance: 0.0,
        ..QueueConfig::certain()
    };
    let mut session = BunkerSession::new(config);

    session.apply_wallet_event(WalletEvent::TransferSubmitted(transfer(UNITS_PER_BNKR)));
    assert_eq!(
        session.snapshot().transmissions[0].stage,
        TransmissionStage::Queued
    );

    let expected = [
        TransmissionStage::Encoding,
        TransmissionStage::Transmitting,
        TransmissionStage::Transmitted,
        TransmissionStage::Confirmed,
    ];
    for stage in expected {
        session.tick_rf();
        assert_eq!(session.snapshot().transmissions[0].stage, stage);
    }
}

#[test]
fn test_protocol_level_follows_link_degradation() {
    let mut session = BunkerSession::new(pinned_config(2));

    // Healthy: online with a populated mesh
    session.force_link_state(Connectivity::Online, SatelliteUplink::Connected);
    session.force_mesh_node_count(5);
    session.tick_emergency();
    assert_eq!(session.protocol_level(), ProtocolLevel::Green);

    // Link wobbles
    session.force_link_state(Connectivity::Unstable, SatelliteUplink::Connected);
    session.tick_emergency();
    assert_eq!(session.protocol_level(), ProtocolLevel::Yellow);

    // Total loss dominates regardless of the mesh
    for mesh in [0, 4, 8] {
        session.force_link_state(Connectivity::Offline, SatelliteUplink::Disconnected);
        session.force_mesh_node_count(mesh);
        session.tick_emergency();
        assert_eq!(session.protocol_level(), ProtocolLevel::Red);
    }
}

#[test]
fn test_emergency_broadcast_inserts_one_critical_record() {
    let mut session = BunkerSession::new(pinned_config(3));

    let before = session.snapshot().transmissions.len();
    session.trigger_emergency_broadcast();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.transmissions.len(), before + 1);

    let record = &snapshot.transmissions[0];
    assert_eq!(record.category, TransmissionCategory::Emergency);
    assert_eq!(record.frequency_mhz, EMERGENCY_FREQUENCY_MHZ);
    assert!(snapshot.emergency_mode);

    // Dwell elapses with no re-trigger
    for _ in 0..4 {
        session.tick_rf();
    }
    assert!(!session.snapshot().emergency_mode);
}

#[test]
fn test_mining_completion_through_session() {
    let mut config = pinned_config(4);
    config.mining.power_resample_chance = 0.0;
    config.mining.difficulty_step_chance = 0.0;
    let mut session = BunkerSession::new(config);

    session.mining_mut().set_power(40.0);
    session.mining_mut().set_progress(99.5);
    session.tick_mining();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.mining.proofs_generated, 1);
    assert_eq!(snapshot.proofs.len(), 1);
    assert_eq!(snapshot.mining.delay_progress_pct, 0.0);
}

#[tokio::test]
async fn test_wallet_submission_feeds_the_queue() {
    let wallet = MockWallet::new(MockWalletConfig {
        submit_latency: Duration::ZERO,
        confirm_delay: Duration::from_millis(5),
        ..Default::default()
    });
    let mut session = BunkerSession::new(pinned_config(5));

    // Connect, mirroring what the runner does with the completion
    let wallet_info = wallet.connect().await.unwrap();
    session.apply_wallet_event(WalletEvent::Connected(wallet_info));
    assert!(session.wallet_connected());

    // Submit through the collaborator, then deliver the callback
    let recipient = Address::parse(RECIPIENT).unwrap();
    let signature = wallet
        .submit_transfer(&recipient, 2 * UNITS_PER_BNKR)
        .await
        .unwrap();
    let history = wallet.query_history().await.unwrap();
    let entry = history
        .into_iter()
        .find(|t| t.signature == signature)
        .unwrap();
    session.apply_wallet_event(WalletEvent::TransferSubmitted(entry));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.transmissions.len(), 1);
    assert_eq!(
        snapshot.transmissions[0].category,
        TransmissionCategory::Transaction
    );
    assert!(snapshot.transmissions[0].payload_bytes >= 256);
    assert_eq!(snapshot.wallet.history.len(), 1);
    assert_eq!(snapshot.wallet.balance, 12_500_000_000 - 2 * UNITS_PER_BNKR);
}

#[tokio::test]
async fn test_failed_submission_surfaces_without_a_record() {
    let wallet = MockWallet::new(MockWalletConfig {
        submit_latency: Duration::ZERO,
        ..Default::default()
    });
    let mut session = BunkerSession::new(pinned_config(6));

    let wallet_info = wallet.connect().await.unwrap();
    session.apply_wallet_event(WalletEvent::Connected(wallet_info));

    // Way past the mock's balance
    let recipient = Address::parse(RECIPIENT).unwrap();
    let result = wallet
        .submit_transfer(&recipient, 1_000 * UNITS_PER_BNKR)
        .await;
    let err = match result {
        Err(e) => e,
        Ok(_) => panic!("oversized transfer should fail"),
    };
    assert!(matches!(err, WalletError::InsufficientBalance { .. }));

    session.apply_wallet_event(WalletEvent::TransferFailed(err.to_string()));

    let snapshot = session.snapshot();
    assert!(snapshot.transmissions.is_empty());
    assert!(snapshot.wallet.history.is_empty());
    assert!(snapshot
        .wallet_log
        .iter()
        .any(|l| l.contains("TRANSACTION FAILED")));
}

#[test]
fn test_long_mixed_run_keeps_all_panels_consistent() {
    let mut session = BunkerSession::new(SessionConfig {
        seed: Some(7),
        ..Default::default()
    });

    // Interleave the four clocks the way the runner would, roughly honoring
    // their relative rates (mining faster, vitals slower)
    for tick in 0u32..1_000 {
        session.tick_mining();
        if tick % 2 == 0 {
            session.tick_rf();
            session.tick_emergency();
        }
        if tick % 3 == 0 {
            session.tick_vitals();
        }
        if tick % 97 == 0 {
            session.trigger_emergency_broadcast();
        }

        let snapshot = session.snapshot();
        assert!(snapshot.transmissions.len() <= 10);
        assert!(snapshot.receptions.len() <= 10);
        assert!(snapshot.proofs.len() <= 5);
        assert!(snapshot.alerts.len() <= 5);
        assert!(snapshot.rf_log.len() <= 8);
        assert!(snapshot.emergency_log.len() <= 6);
        assert!(snapshot.mining_log.len() <= 6);
        assert!(snapshot.diagnostics_log.len() <= 6);
    }
}
