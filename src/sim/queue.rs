// Transmission queue - staged records moving through the RF pipeline
//
// Newest records sit at the front; capacity eviction drops from the back.
// Stage advancement is one independent roll per record per tick through
// the shared staged-record plan.

use super::activity::ActivityLog;
use super::rng::SimRng;
use super::staged::StagePlan;
use crate::types::{
    EnvironmentalState, ReceptionRecord, ReceptionSource, TransmissionCategory,
    TransmissionPriority, TransmissionRecord, TransmissionStage, WalletTransaction,
    EMERGENCY_FREQUENCY_MHZ, NORMAL_FREQUENCY_MHZ,
};
use chrono::Utc;
use std::collections::VecDeque;
use tracing::debug;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Minimum RF payload for an encoded wallet transaction
const MIN_TRANSACTION_PAYLOAD_BYTES: u32 = 256;

/// Fixed payload of an emergency beacon
const EMERGENCY_PAYLOAD_BYTES: u32 = 128;

/// Fixed payload of a heartbeat beacon
const HEARTBEAT_PAYLOAD_BYTES: u32 = 64;

/// Tuning for the transmission queue
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Retained transmission records (oldest evicted beyond this)
    pub capacity: usize,

    /// Retained reception records
    pub reception_capacity: usize,

    /// Per-tick stage probabilities
    pub encode_chance: f64,
    pub transmit_chance: f64,
    pub complete_chance: f64,
    pub confirm_chance: f64,

    /// Alternative Transmitting -> Failed exit probability
    pub failure_chance: f64,

    /// Per-tick chance of a spontaneous heartbeat transmission
    pub heartbeat_chance: f64,

    /// Per emergency-tick chance of a relayed bunker block arriving
    pub bunker_block_chance: f64,

    /// Per-tick chance of an incoming reception
    pub reception_chance: f64,

    /// Per-tick chance of one RF activity log line
    pub log_chance: f64,

    /// RF activity log capacity
    pub log_capacity: usize,

    /// RF ticks the emergency-mode flag stays latched after a trigger
    pub emergency_dwell_ticks: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            reception_capacity: 10,
            encode_chance: 0.30,
            transmit_chance: 0.40,
            complete_chance: 0.50,
            confirm_chance: 0.20,
            failure_chance: 0.05,
            heartbeat_chance: 0.05,
            bunker_block_chance: 0.10,
            reception_chance: 0.10,
            log_chance: 0.20,
            log_capacity: 8,
            // 10 seconds at the 2.5s RF tick
            emergency_dwell_ticks: 4,
        }
    }
}

impl QueueConfig {
    /// Build the stage plan these probabilities describe
    pub fn stage_plan(&self) -> StagePlan<TransmissionStage> {
        StagePlan::new()
            .step(
                TransmissionStage::Queued,
                TransmissionStage::Encoding,
                self.encode_chance,
            )
            .step(
                TransmissionStage::Encoding,
                TransmissionStage::Transmitting,
                self.transmit_chance,
            )
            .step_with_failure(
                TransmissionStage::Transmitting,
                TransmissionStage::Transmitted,
                self.complete_chance,
                TransmissionStage::Failed,
                self.failure_chance,
            )
            .step(
                TransmissionStage::Transmitted,
                TransmissionStage::Confirmed,
                self.confirm_chance,
            )
    }

    /// Config whose stage plan advances every record every tick, with no
    /// failure exit. Lifecycle tests use this to walk the full stage order.
    pub fn certain() -> Self {
        Self {
            encode_chance: 1.0,
            transmit_chance: 1.0,
            complete_chance: 1.0,
            confirm_chance: 1.0,
            failure_chance: 0.0,
            ..Default::default()
        }
    }
}

// =============================================================================
// QUEUE
// =============================================================================

/// The transmission pipeline plus reception log and RF activity log
pub struct TransmissionQueue {
    config: QueueConfig,
    plan: StagePlan<TransmissionStage>,

    /// Transmission records, newest first
    records: VecDeque<TransmissionRecord>,

    /// Reception records, newest first
    receptions: VecDeque<ReceptionRecord>,

    /// RF activity log
    log: ActivityLog,

    /// Remaining RF ticks of latched emergency mode (0 = off)
    emergency_dwell_remaining: u32,
}

impl TransmissionQueue {
    pub fn new(config: QueueConfig) -> Self {
        let plan = config.stage_plan();
        let log = ActivityLog::with_lines(
            config.log_capacity,
            [
                "> RF TRANSCEIVER SYSTEM ONLINE",
                "> SHORTWAVE ANTENNA ALIGNED",
                "> FREQUENCY LOCKED: 14.230 MHz",
                "> AWAITING CRYPTO TRANSMISSION DATA...",
            ],
        );

        Self {
            config,
            plan,
            records: VecDeque::new(),
            receptions: VecDeque::new(),
            log,
            emergency_dwell_remaining: 0,
        }
    }

    /// Queue a wallet transaction for RF broadcast
    pub fn enqueue(&mut self, tx: &WalletTransaction, rng: &mut SimRng) -> TransmissionRecord {
        let payload = (tx.encoded_size() as u32).max(MIN_TRANSACTION_PAYLOAD_BYTES);
        let record = TransmissionRecord::new(
            rng.token("RF", 6),
            TransmissionCategory::Transaction,
            TransmissionPriority::High,
            NORMAL_FREQUENCY_MHZ + rng.drift(0.01),
            rng.range_u32(30, 80),
            payload,
        );

        self.log.push(format!("> CRYPTO TX QUEUED FOR RF: {}", record.id));
        self.log.push(format!("> PACKET SIZE: {} BYTES", record.payload_bytes));
        self.log.push(format!("> FREQUENCY: {:.3} MHz", record.frequency_mhz));

        self.insert(record.clone());
        record
    }

    /// Queue an emergency beacon and latch emergency mode for the dwell time
    ///
    /// Re-triggering while latched rearms the full dwell.
    pub fn enqueue_emergency(&mut self, rng: &mut SimRng) -> TransmissionRecord {
        let record = TransmissionRecord::new(
            rng.token("EMG", 4),
            TransmissionCategory::Emergency,
            TransmissionPriority::Critical,
            EMERGENCY_FREQUENCY_MHZ,
            100,
            EMERGENCY_PAYLOAD_BYTES,
        );

        self.emergency_dwell_remaining = self.config.emergency_dwell_ticks;

        self.log.push("> EMERGENCY BROADCAST INITIATED");
        self.log.push(format!(
            "> SWITCHING TO EMERGENCY FREQ: {:.3} MHz",
            record.frequency_mhz
        ));
        self.log.push("> MAXIMUM POWER OUTPUT ENGAGED");
        self.log.push("> BUNKER STATUS: CRITICAL");

        self.insert(record.clone());
        record
    }

    /// Queue a relayed bunker block of random priority
    pub fn enqueue_bunker_block(&mut self, rng: &mut SimRng) -> TransmissionRecord {
        let number = rng.range_u32(0, 1000);
        let record = TransmissionRecord::new(
            format!("BB{:03}", number),
            TransmissionCategory::BunkerBlock,
            *rng.pick(&TransmissionPriority::ALL),
            NORMAL_FREQUENCY_MHZ + rng.drift(0.01),
            rng.range_u32(30, 80),
            rng.range_u32(512, 3584),
        );

        self.log.push(format!(
            "> BUNKER BLOCK RELAY QUEUED: {} [{}]",
            record.id, record.priority
        ));

        self.insert(record.clone());
        record
    }

    /// One RF tick: advance stages, spawn beacons/receptions, observe
    pub fn tick(&mut self, rng: &mut SimRng, env: &EnvironmentalState) {
        // Each record rolls its single transition independently
        for record in self.records.iter_mut() {
            if let Some(next) = self.plan.advance(record.stage, rng) {
                debug!("transmission {} {} -> {}", record.id, record.stage, next);
                record.stage = next;
            }
        }

        if rng.chance(self.config.heartbeat_chance) {
            let record = TransmissionRecord::new(
                rng.token("HB", 4),
                TransmissionCategory::Heartbeat,
                TransmissionPriority::Low,
                NORMAL_FREQUENCY_MHZ + rng.drift(0.01),
                rng.range_u32(30, 80),
                HEARTBEAT_PAYLOAD_BYTES,
            );
            self.insert(record);
        }

        if rng.chance(self.config.reception_chance) {
            let reception = ReceptionRecord {
                id: rng.token("RX", 6),
                frequency_mhz: NORMAL_FREQUENCY_MHZ + rng.drift(0.02),
                signal_strength_pct: rng.range_u32(20, 100),
                data_integrity_pct: rng.range_u32(60, 100),
                source: *rng.pick(&ReceptionSource::ALL),
                received_at: Utc::now(),
            };
            if self.receptions.len() == self.config.reception_capacity {
                self.receptions.pop_back();
            }
            self.receptions.push_front(reception);
        }

        if rng.chance(self.config.log_chance) {
            let candidates = [
                format!("> SIGNAL STRENGTH: {:.1}%", env.signal_strength_pct),
                format!("> ANTENNA ALIGNMENT: {:.1}%", env.antenna_alignment_pct),
                format!("> POWER OUTPUT: {:.1}W", env.power_output_w),
                format!(
                    "> FREQUENCY DRIFT: {:.4} MHz",
                    env.frequency_mhz - NORMAL_FREQUENCY_MHZ
                ),
                "> RF PACKET BUFFER: READY".to_string(),
                "> EMERGENCY BROADCAST STANDBY".to_string(),
                "> CRYPTO ENCODING MODULE: ACTIVE".to_string(),
            ];
            let line = rng.pick(&candidates).clone();
            self.log.push(line);
        }

        // Emergency mode self-clears once the dwell runs out
        self.emergency_dwell_remaining = self.emergency_dwell_remaining.saturating_sub(1);
    }

    /// Whether a triggered emergency is still within its dwell window
    pub fn emergency_mode(&self) -> bool {
        self.emergency_dwell_remaining > 0
    }

    /// Current transmissions, newest first
    pub fn records(&self) -> Vec<TransmissionRecord> {
        self.records.iter().cloned().collect()
    }

    /// Current receptions, newest first
    pub fn receptions(&self) -> Vec<ReceptionRecord> {
        self.receptions.iter().cloned().collect()
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert at the front and evict from the back past capacity
    fn insert(&mut self, record: TransmissionRecord) {
        self.records.push_front(record);
        self.records.truncate(self.config.capacity);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TransactionId, TransactionKind, TransactionStatus};

    fn sample_tx() -> WalletTransaction {
        WalletTransaction {
            signature: TransactionId("5KtP9mXvR2qWj8cN3bYfA7dHsG4eZ1nL".to_string()),
            kind: TransactionKind::Send,
            amount: 1_800_000_000,
            status: TransactionStatus::Pending,
            timestamp: Utc::now(),
            from: None,
            to: None,
        }
    }

    fn quiet_config() -> QueueConfig {
        // No spontaneous arrivals, no stage movement
        QueueConfig {
            encode_chance: 0.0,
            transmit_chance: 0.0,
            complete_chance: 0.0,
            confirm_chance: 0.0,
            failure_chance: 0.0,
            heartbeat_chance: 0.0,
            reception_chance: 0.0,
            log_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_enqueue_creates_queued_transaction_record() {
        let mut queue = TransmissionQueue::new(QueueConfig::default());
        let mut rng = SimRng::seeded(1);

        let record = queue.enqueue(&sample_tx(), &mut rng);

        assert_eq!(record.category, TransmissionCategory::Transaction);
        assert_eq!(record.stage, TransmissionStage::Queued);
        assert!(record.payload_bytes >= 256);
        assert!((record.frequency_mhz - NORMAL_FREQUENCY_MHZ).abs() < 0.005);
        assert!(record.id.starts_with("RF"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_emergency_record_shape() {
        let mut queue = TransmissionQueue::new(QueueConfig::default());
        let mut rng = SimRng::seeded(2);

        let record = queue.enqueue_emergency(&mut rng);

        assert_eq!(record.category, TransmissionCategory::Emergency);
        assert_eq!(record.priority, TransmissionPriority::Critical);
        assert_eq!(record.frequency_mhz, EMERGENCY_FREQUENCY_MHZ);
        assert_eq!(record.power_w, 100);
        assert_eq!(record.payload_bytes, 128);
        assert!(record.id.starts_with("EMG"));
        assert!(queue.emergency_mode());
    }

    #[test]
    fn test_emergency_mode_self_clears_after_dwell() {
        let mut queue = TransmissionQueue::new(quiet_config());
        let mut rng = SimRng::seeded(3);
        let env = EnvironmentalState::new();

        queue.enqueue_emergency(&mut rng);
        assert!(queue.emergency_mode());

        for _ in 0..4 {
            assert!(queue.emergency_mode());
            queue.tick(&mut rng, &env);
        }
        assert!(!queue.emergency_mode());
    }

    #[test]
    fn test_retrigger_rearms_dwell() {
        let mut queue = TransmissionQueue::new(quiet_config());
        let mut rng = SimRng::seeded(4);
        let env = EnvironmentalState::new();

        queue.enqueue_emergency(&mut rng);
        queue.tick(&mut rng, &env);
        queue.tick(&mut rng, &env);

        // Re-trigger half way through the dwell
        queue.enqueue_emergency(&mut rng);
        for _ in 0..3 {
            queue.tick(&mut rng, &env);
            assert!(queue.emergency_mode());
        }
        queue.tick(&mut rng, &env);
        assert!(!queue.emergency_mode());
    }

    #[test]
    fn test_capacity_eviction_drops_oldest_only() {
        let mut queue = TransmissionQueue::new(quiet_config());
        let mut rng = SimRng::seeded(5);

        let ids: Vec<String> = (0..11)
            .map(|_| queue.enqueue(&sample_tx(), &mut rng).id)
            .collect();

        assert_eq!(queue.len(), 10);

        let kept: Vec<String> = queue.records().iter().map(|r| r.id.clone()).collect();
        // The very first record fell off the back; order of the rest holds
        let expected: Vec<String> = ids[1..].iter().rev().cloned().collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_full_lifecycle_under_certainty() {
        let mut queue = TransmissionQueue::new(QueueConfig {
            heartbeat_chance: 0.0,
            reception_chance: 0.0,
            log_chance: 0.0,
            ..QueueConfig::certain()
        });
        let mut rng = SimRng::seeded(6);
        let env = EnvironmentalState::new();

        queue.enqueue(&sample_tx(), &mut rng);

        let expected = [
            TransmissionStage::Encoding,
            TransmissionStage::Transmitting,
            TransmissionStage::Transmitted,
            TransmissionStage::Confirmed,
        ];
        for stage in expected {
            queue.tick(&mut rng, &env);
            assert_eq!(queue.records()[0].stage, stage);
        }

        // Terminal: further ticks change nothing
        queue.tick(&mut rng, &env);
        assert_eq!(queue.records()[0].stage, TransmissionStage::Confirmed);
    }

    #[test]
    fn test_stages_never_regress() {
        let mut queue = TransmissionQueue::new(QueueConfig::default());
        let mut rng = SimRng::seeded(7);
        let env = EnvironmentalState::new();

        for _ in 0..3 {
            queue.enqueue(&sample_tx(), &mut rng);
        }

        let mut last: Vec<(String, TransmissionStage)> = queue
            .records()
            .iter()
            .map(|r| (r.id.clone(), r.stage))
            .collect();

        for _ in 0..500 {
            queue.tick(&mut rng, &env);
            for record in queue.records() {
                if let Some((_, prev)) = last.iter().find(|(id, _)| *id == record.id) {
                    assert!(record.stage >= *prev, "{} regressed", record.id);
                }
            }
            last = queue
                .records()
                .iter()
                .map(|r| (r.id.clone(), r.stage))
                .collect();
        }
    }

    #[test]
    fn test_failure_only_from_transmitting() {
        // Failure exit certain, success impossible: a Transmitting record
        // must fail, and no earlier stage may jump to Failed
        let mut queue = TransmissionQueue::new(QueueConfig {
            encode_chance: 1.0,
            transmit_chance: 1.0,
            complete_chance: 0.0,
            confirm_chance: 0.0,
            failure_chance: 1.0,
            heartbeat_chance: 0.0,
            reception_chance: 0.0,
            log_chance: 0.0,
            ..Default::default()
        });
        let mut rng = SimRng::seeded(8);
        let env = EnvironmentalState::new();

        queue.enqueue(&sample_tx(), &mut rng);

        queue.tick(&mut rng, &env);
        assert_eq!(queue.records()[0].stage, TransmissionStage::Encoding);
        queue.tick(&mut rng, &env);
        assert_eq!(queue.records()[0].stage, TransmissionStage::Transmitting);
        queue.tick(&mut rng, &env);
        assert_eq!(queue.records()[0].stage, TransmissionStage::Failed);

        // Failed is absorbing
        queue.tick(&mut rng, &env);
        assert_eq!(queue.records()[0].stage, TransmissionStage::Failed);
    }

    #[test]
    fn test_reception_log_bounded() {
        let mut queue = TransmissionQueue::new(QueueConfig {
            reception_chance: 1.0,
            heartbeat_chance: 0.0,
            log_chance: 0.0,
            ..Default::default()
        });
        let mut rng = SimRng::seeded(9);
        let env = EnvironmentalState::new();

        for _ in 0..25 {
            queue.tick(&mut rng, &env);
        }

        let receptions = queue.receptions();
        assert_eq!(receptions.len(), 10);
        for rx in &receptions {
            assert!(rx.id.starts_with("RX"));
            assert!((20..100).contains(&rx.signal_strength_pct));
            assert!((60..100).contains(&rx.data_integrity_pct));
        }
    }

    #[test]
    fn test_heartbeats_arrive_spontaneously() {
        let mut queue = TransmissionQueue::new(QueueConfig {
            heartbeat_chance: 1.0,
            reception_chance: 0.0,
            log_chance: 0.0,
            ..Default::default()
        });
        let mut rng = SimRng::seeded(10);
        let env = EnvironmentalState::new();

        queue.tick(&mut rng, &env);

        let records = queue.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, TransmissionCategory::Heartbeat);
        assert_eq!(records[0].payload_bytes, 64);
    }

    #[test]
    fn test_bunker_block_record_shape() {
        let mut queue = TransmissionQueue::new(QueueConfig::default());
        let mut rng = SimRng::seeded(11);

        let record = queue.enqueue_bunker_block(&mut rng);

        assert_eq!(record.category, TransmissionCategory::BunkerBlock);
        assert!(record.id.starts_with("BB"));
        assert_eq!(record.id.len(), 5);
        assert!((512..3584).contains(&record.payload_bytes));
    }
}
