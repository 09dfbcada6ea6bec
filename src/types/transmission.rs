// Transmission types - records moving through the RF pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// CATEGORIES & PRIORITIES
// =============================================================================

/// What kind of payload a transmission carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransmissionCategory {
    /// A wallet transaction encoded for RF broadcast
    Transaction,

    /// An emergency beacon on the dedicated frequency
    Emergency,

    /// Periodic keep-alive beacon
    Heartbeat,

    /// A block relayed through the bunker mesh
    BunkerBlock,
}

impl std::fmt::Display for TransmissionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransmissionCategory::Transaction => write!(f, "TRANSACTION"),
            TransmissionCategory::Emergency => write!(f, "EMERGENCY"),
            TransmissionCategory::Heartbeat => write!(f, "HEARTBEAT"),
            TransmissionCategory::BunkerBlock => write!(f, "BUNKER_BLOCK"),
        }
    }
}

/// Relative urgency of a queued transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransmissionPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TransmissionPriority {
    /// All priorities, for uniform sampling
    pub const ALL: [TransmissionPriority; 4] = [
        TransmissionPriority::Low,
        TransmissionPriority::Medium,
        TransmissionPriority::High,
        TransmissionPriority::Critical,
    ];
}

impl std::fmt::Display for TransmissionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransmissionPriority::Low => write!(f, "LOW"),
            TransmissionPriority::Medium => write!(f, "MEDIUM"),
            TransmissionPriority::High => write!(f, "HIGH"),
            TransmissionPriority::Critical => write!(f, "CRITICAL"),
        }
    }
}

// =============================================================================
// STAGES
// =============================================================================

/// Lifecycle stage of a transmission record
///
/// Stages only move forward. `Failed` is an absorbing alternative exit
/// reachable from `Transmitting` only; `Confirmed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransmissionStage {
    Queued,
    Encoding,
    Transmitting,
    Transmitted,
    Confirmed,
    Failed,
}

impl TransmissionStage {
    /// Is this a terminal stage (no further transitions)?
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransmissionStage::Confirmed | TransmissionStage::Failed)
    }
}

impl std::fmt::Display for TransmissionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransmissionStage::Queued => write!(f, "QUEUED"),
            TransmissionStage::Encoding => write!(f, "ENCODING"),
            TransmissionStage::Transmitting => write!(f, "TRANSMITTING"),
            TransmissionStage::Transmitted => write!(f, "TRANSMITTED"),
            TransmissionStage::Confirmed => write!(f, "CONFIRMED"),
            TransmissionStage::Failed => write!(f, "FAILED"),
        }
    }
}

// =============================================================================
// TRANSMISSION RECORD
// =============================================================================

/// A single entry in the transmission queue
///
/// Everything except `stage` is fixed at creation. Records are evicted by
/// queue capacity (oldest first), never deleted explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionRecord {
    /// Unique identifier, assigned at creation
    pub id: String,

    /// Payload category
    pub category: TransmissionCategory,

    /// Urgency used for display ordering
    pub priority: TransmissionPriority,

    /// Carrier frequency locked at creation
    pub frequency_mhz: f64,

    /// Transmit power in watts
    pub power_w: u32,

    /// Encoded payload size in bytes
    pub payload_bytes: u32,

    /// Current lifecycle stage
    pub stage: TransmissionStage,

    /// Reserved for a retry path; currently never incremented
    pub retry_count: u32,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl TransmissionRecord {
    pub fn new(
        id: String,
        category: TransmissionCategory,
        priority: TransmissionPriority,
        frequency_mhz: f64,
        power_w: u32,
        payload_bytes: u32,
    ) -> Self {
        Self {
            id,
            category,
            priority,
            frequency_mhz,
            power_w,
            payload_bytes,
            stage: TransmissionStage::Queued,
            retry_count: 0,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// RECEPTION
// =============================================================================

/// Where an incoming RF packet was relayed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceptionSource {
    MeshNode,
    Satellite,
    DirectRf,
    BunkerRelay,
}

impl ReceptionSource {
    /// All sources, for uniform sampling
    pub const ALL: [ReceptionSource; 4] = [
        ReceptionSource::MeshNode,
        ReceptionSource::Satellite,
        ReceptionSource::DirectRf,
        ReceptionSource::BunkerRelay,
    ];
}

impl std::fmt::Display for ReceptionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceptionSource::MeshNode => write!(f, "MESH_NODE"),
            ReceptionSource::Satellite => write!(f, "SATELLITE"),
            ReceptionSource::DirectRf => write!(f, "DIRECT_RF"),
            ReceptionSource::BunkerRelay => write!(f, "BUNKER_RELAY"),
        }
    }
}

/// An incoming RF packet, immutable once logged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceptionRecord {
    /// Unique identifier
    pub id: String,

    /// Frequency the packet arrived on
    pub frequency_mhz: f64,

    /// Received signal strength, percent
    pub signal_strength_pct: u32,

    /// Decoded data integrity score, percent
    pub data_integrity_pct: u32,

    /// Relay path the packet took
    pub source: ReceptionSource,

    /// Arrival time
    pub received_at: DateTime<Utc>,
}
