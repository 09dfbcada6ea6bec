// Mining types - proof-of-delay pipeline state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// PROOF STAGES
// =============================================================================

/// Lifecycle stage of an emitted proof
///
/// Forward-only, mirroring the transmission stages. Freshly emitted proofs
/// may skip `Generating` depending on the pipeline's configured entry stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProofStage {
    Generating,
    Verified,
    Submitted,
    Confirmed,
}

impl ProofStage {
    /// Is this a terminal stage?
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProofStage::Confirmed)
    }
}

impl std::fmt::Display for ProofStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofStage::Generating => write!(f, "GENERATING"),
            ProofStage::Verified => write!(f, "VERIFIED"),
            ProofStage::Submitted => write!(f, "SUBMITTED"),
            ProofStage::Confirmed => write!(f, "CONFIRMED"),
        }
    }
}

// =============================================================================
// PROOF
// =============================================================================

/// A completed delay proof; immutable apart from its stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    /// Sequential identifier ("PROOF_042")
    pub id: String,

    /// Emission time
    pub created_at: DateTime<Utc>,

    /// Difficulty the proof was computed at
    pub difficulty: u32,

    /// Simulated delay-function runtime in seconds
    pub delay_time_secs: f64,

    /// Hand-crank energy consumed, watt-hours
    pub energy_used_wh: f64,

    /// Current lifecycle stage
    pub stage: ProofStage,
}

// =============================================================================
// MINING STATE
// =============================================================================

/// Mutable singleton for the proof-of-delay pipeline
///
/// `is_active`, `hash_rate`, `estimated_time_to_proof_secs` and
/// `energy_per_proof_wh` are derived fields, recomputed on every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningState {
    /// Hand-crank power input in watts; decays toward 0 without input
    pub hand_crank_power_w: f64,

    /// Derived: powered above the activity threshold
    pub is_active: bool,

    /// Derived: simulated hash rate in H/s while active
    pub hash_rate: f64,

    /// Delay-function progress, 0-100
    pub delay_progress_pct: f64,

    /// Derived: seconds until the current proof completes at the current rate
    pub estimated_time_to_proof_secs: f64,

    /// Challenge difficulty, 128-512
    pub difficulty: u32,

    /// Derived: energy cost per proof at the current difficulty, watt-hours
    pub energy_per_proof_wh: f64,

    /// Total proofs emitted this session; monotonic
    pub proofs_generated: u64,

    /// Total challenges solved this session; monotonic
    pub challenges_solved: u64,

    /// Identifier of the challenge currently being worked
    pub current_challenge: String,
}

impl MiningState {
    /// Initial conditions for a fresh session
    pub fn new() -> Self {
        Self {
            hand_crank_power_w: 0.0,
            is_active: false,
            hash_rate: 12.5,
            delay_progress_pct: 0.0,
            estimated_time_to_proof_secs: 0.0,
            difficulty: 256,
            energy_per_proof_wh: 4.0, // 256/256 * 2.5 + 1.5
            proofs_generated: 0,
            challenges_solved: 0,
            current_challenge: "vdf_0x7a8b9c2e...".to_string(),
        }
    }
}

impl Default for MiningState {
    fn default() -> Self {
        Self::new()
    }
}
