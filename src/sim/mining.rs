// Mining engine - hand-crank powered proof-of-delay pipeline
//
// The second staged pipeline of the session: power input feeds progress
// accumulation, completed proofs then advance through their own stage plan
// exactly like transmission records do.

use super::activity::ActivityLog;
use super::rng::SimRng;
use super::staged::StagePlan;
use crate::types::{MiningState, Proof, ProofStage};
use chrono::Utc;
use std::collections::VecDeque;
use tracing::debug;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Tuning for the mining pipeline
#[derive(Debug, Clone)]
pub struct MiningConfig {
    /// Per-tick chance the hand-crank input is resampled
    pub power_resample_chance: f64,

    /// Chance a resample is a burst of effort (otherwise the crank is idle)
    pub burst_chance: f64,

    /// Burst power range in watts
    pub burst_min_w: f64,
    pub burst_max_w: f64,

    /// Linear power decay per tick without input
    pub power_decay_per_tick: f64,

    /// Power above which mining is active
    pub activity_threshold_w: f64,

    /// Progress decay per tick while inactive
    pub progress_decay_per_tick: f64,

    /// Per-tick chance of a difficulty adjustment
    pub difficulty_step_chance: f64,

    /// Size of a difficulty step
    pub difficulty_step: u32,

    /// Difficulty bounds
    pub difficulty_min: u32,
    pub difficulty_max: u32,

    /// Chance a completed proof also counts as a solved challenge
    pub challenge_solve_chance: f64,

    /// Retained proof records
    pub proof_capacity: usize,

    /// Stage a freshly emitted proof enters at
    ///
    /// The console historically emitted proofs straight into Verified,
    /// skipping Generating; kept configurable rather than hardcoded.
    pub proof_entry_stage: ProofStage,

    /// Per-tick stage probabilities for stored proofs
    pub verify_chance: f64,
    pub submit_chance: f64,
    pub confirm_chance: f64,

    /// Per-tick chance of one mining log line
    pub log_chance: f64,

    /// Mining log capacity
    pub log_capacity: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            power_resample_chance: 0.15,
            burst_chance: 0.30,
            burst_min_w: 10.0,
            burst_max_w: 40.0,
            power_decay_per_tick: 2.0,
            activity_threshold_w: 15.0,
            progress_decay_per_tick: 1.0,
            difficulty_step_chance: 0.02,
            difficulty_step: 16,
            difficulty_min: 128,
            difficulty_max: 512,
            challenge_solve_chance: 0.80,
            proof_capacity: 5,
            proof_entry_stage: ProofStage::Verified,
            verify_chance: 0.10,
            submit_chance: 0.08,
            confirm_chance: 0.06,
            log_chance: 0.20,
            log_capacity: 6,
        }
    }
}

impl MiningConfig {
    /// Build the proof stage plan these probabilities describe
    pub fn stage_plan(&self) -> StagePlan<ProofStage> {
        StagePlan::new()
            .step(ProofStage::Generating, ProofStage::Verified, self.verify_chance)
            .step(ProofStage::Verified, ProofStage::Submitted, self.submit_chance)
            .step(ProofStage::Submitted, ProofStage::Confirmed, self.confirm_chance)
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Owns the mining singleton, the stored proofs and the mining log
pub struct MiningEngine {
    config: MiningConfig,
    plan: StagePlan<ProofStage>,
    state: MiningState,

    /// Stored proofs, newest first
    proofs: VecDeque<Proof>,

    log: ActivityLog,
}

impl MiningEngine {
    pub fn new(config: MiningConfig) -> Self {
        let plan = config.stage_plan();
        let state = MiningState::new();
        let log = ActivityLog::with_lines(
            config.log_capacity,
            [
                "> VDF MINING SYSTEM INITIALIZED".to_string(),
                format!("> CHALLENGE DIFFICULTY: {}", state.difficulty),
                "> HAND CRANK POWER: REQUIRED".to_string(),
                "> PROOF GENERATION: STANDBY".to_string(),
            ],
        );

        Self {
            config,
            plan,
            state,
            proofs: VecDeque::new(),
            log,
        }
    }

    pub fn state(&self) -> &MiningState {
        &self.state
    }

    /// Stored proofs, newest first
    pub fn proofs(&self) -> Vec<Proof> {
        self.proofs.iter().cloned().collect()
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Test hooks for driving the pipeline deterministically
    #[cfg(test)]
    pub fn set_power(&mut self, watts: f64) {
        self.state.hand_crank_power_w = watts;
    }

    #[cfg(test)]
    pub fn set_progress(&mut self, pct: f64) {
        self.state.delay_progress_pct = pct;
    }

    /// One mining tick
    pub fn tick(&mut self, rng: &mut SimRng) {
        let cfg = self.config.clone();

        // Stored proofs roll first so a proof emitted later this tick does
        // not also advance in its birth tick - one transition per record
        // per tick
        for proof in self.proofs.iter_mut() {
            if let Some(next) = self.plan.advance(proof.stage, rng) {
                debug!("proof {} {} -> {}", proof.id, proof.stage, next);
                proof.stage = next;
            }
        }

        // Hand-crank input: occasional resample, otherwise linear decay
        if rng.chance(cfg.power_resample_chance) {
            self.state.hand_crank_power_w = if rng.chance(cfg.burst_chance) {
                rng.range_f64(cfg.burst_min_w, cfg.burst_max_w)
            } else {
                0.0
            };
        } else {
            self.state.hand_crank_power_w =
                (self.state.hand_crank_power_w - cfg.power_decay_per_tick).max(0.0);
        }

        self.state.is_active = self.state.hand_crank_power_w > cfg.activity_threshold_w;

        if self.state.is_active {
            let power = self.state.hand_crank_power_w;
            self.state.hash_rate = (power / 40.0) * 20.0 + 5.0;

            let progress_rate = (power / 100.0) * 2.0;
            self.state.delay_progress_pct =
                (self.state.delay_progress_pct + progress_rate).min(100.0);

            // Two seconds per remaining progress tick, matching the console's
            // display pacing
            self.state.estimated_time_to_proof_secs = if progress_rate > 0.0 {
                ((100.0 - self.state.delay_progress_pct) / progress_rate) * 2.0
            } else {
                0.0
            };

            // At most one proof per tick: progress clamps at 100, then resets
            if self.state.delay_progress_pct >= 100.0 {
                self.emit_proof(rng);
            }
        } else {
            self.state.delay_progress_pct =
                (self.state.delay_progress_pct - cfg.progress_decay_per_tick).max(0.0);
            self.state.estimated_time_to_proof_secs = 0.0;
        }

        // Rare difficulty adjustment
        if rng.chance(cfg.difficulty_step_chance) {
            let stepped = if rng.chance(0.5) {
                self.state.difficulty.saturating_sub(cfg.difficulty_step)
            } else {
                self.state.difficulty + cfg.difficulty_step
            };
            self.state.difficulty = stepped.clamp(cfg.difficulty_min, cfg.difficulty_max);
        }

        // Deterministic function of difficulty, recomputed every tick
        self.state.energy_per_proof_wh =
            (self.state.difficulty as f64 / 256.0) * 2.5 + 1.5;

        if rng.chance(cfg.log_chance) {
            self.push_log_line(rng);
        }
    }

    /// Emit the completed proof and reset progress
    fn emit_proof(&mut self, rng: &mut SimRng) {
        self.state.delay_progress_pct = 0.0;
        self.state.proofs_generated += 1;
        if rng.chance(self.config.challenge_solve_chance) {
            self.state.challenges_solved += 1;
        }
        self.state.current_challenge = format!("vdf_0x{}...", rng.hex_token(8));

        let proof = Proof {
            id: format!("PROOF_{:03}", self.state.proofs_generated),
            created_at: Utc::now(),
            difficulty: self.state.difficulty,
            delay_time_secs: rng.range_f64(100.0, 150.0),
            energy_used_wh: self.state.energy_per_proof_wh,
            stage: self.config.proof_entry_stage,
        };

        debug!("proof emitted: {} at difficulty {}", proof.id, proof.difficulty);

        self.proofs.push_front(proof);
        self.proofs.truncate(self.config.proof_capacity);
    }

    fn push_log_line(&mut self, rng: &mut SimRng) {
        let s = &self.state;
        let candidates = [
            format!("> HAND CRANK POWER: {:.1}W", s.hand_crank_power_w),
            format!("> HASH RATE: {:.1} H/s", s.hash_rate),
            format!("> DIFFICULTY: {}", s.difficulty),
            if s.is_active {
                "> MINING: ACTIVE".to_string()
            } else {
                "> MINING: STANDBY - NEED POWER".to_string()
            },
            format!("> PROOFS GENERATED: {}", s.proofs_generated),
            format!("> DELAY PROGRESS: {:.1}%", s.delay_progress_pct),
            format!("> CHALLENGE: {}", s.current_challenge),
        ];

        let line = rng.pick(&candidates).clone();
        self.log.push(line);
    }
}

// =============================================================================
// TESTS
// =============================================================================
