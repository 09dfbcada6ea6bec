// Staged records - the shared forward-only lifecycle abstraction
//
// Both the transmission queue and the proof pipeline move records through
// an ordered stage list with a per-transition probability, checked once per
// tick and per record. This module holds the one table-driven implementation
// both instantiate, so the state machines stay explicit and testable.

use super::rng::SimRng;

/// One permitted transition out of a stage
#[derive(Debug, Clone)]
struct StageStep<S> {
    /// Stage the record must currently be in
    from: S,

    /// Stage reached on a successful roll
    to: S,

    /// Per-tick success probability
    chance: f64,

    /// Optional alternative exit rolled before success (stage, probability)
    failure: Option<(S, f64)>,
}

/// Transition table for a forward-only staged lifecycle
///
/// Stages with no entry in the table are terminal. `advance` performs at
/// most one transition per call, so a record can never skip a stage within
/// a single tick.
#[derive(Debug, Clone)]
pub struct StagePlan<S: Copy + PartialEq> {
    steps: Vec<StageStep<S>>,
}

impl<S: Copy + PartialEq> StagePlan<S> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a transition `from -> to` with the given per-tick probability
    pub fn step(mut self, from: S, to: S, chance: f64) -> Self {
        self.steps.push(StageStep {
            from,
            to,
            chance,
            failure: None,
        });
        self
    }

    /// Add a transition with an alternative failure exit
    ///
    /// The failure roll happens first; the combined probability of leaving
    /// the stage is `failure_chance + chance`.
    pub fn step_with_failure(
        mut self,
        from: S,
        to: S,
        chance: f64,
        failure_to: S,
        failure_chance: f64,
    ) -> Self {
        self.steps.push(StageStep {
            from,
            to,
            chance,
            failure: Some((failure_to, failure_chance)),
        });
        self
    }

    /// Copy of this plan with every success certain and all failure exits
    /// removed. Used by lifecycle tests to walk records deterministically.
    pub fn certain(&self) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .map(|s| StageStep {
                    from: s.from,
                    to: s.to,
                    chance: 1.0,
                    failure: None,
                })
                .collect(),
        }
    }

    /// Roll the record's single per-tick transition
    ///
    /// Returns the new stage, or None when the record stays put. Terminal
    /// stages always return None.
    pub fn advance(&self, current: S, rng: &mut SimRng) -> Option<S> {
        let step = self.steps.iter().find(|s| s.from == current)?;
        let roll = rng.unit();

        if let Some((failure_to, failure_chance)) = step.failure {
            if roll < failure_chance {
                return Some(failure_to);
            }
            if roll < failure_chance + step.chance {
                return Some(step.to);
            }
            return None;
        }

        (roll < step.chance).then_some(step.to)
    }

    /// Is the stage terminal under this plan?
    pub fn is_terminal(&self, stage: S) -> bool {
        !self.steps.iter().any(|s| s.from == stage)
    }
}

impl<S: Copy + PartialEq> Default for StagePlan<S> {
    fn default() -> Self {
        Self::new()
    }
}
