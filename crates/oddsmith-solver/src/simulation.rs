//! Monte-Carlo sampling of the leveling process.
//!
//! Each attempt starts from the empty profile and levels up through the same
//! branch model as the backward solver, rolling one branch at random per
//! level-up. Averages over many attempts converge to
//! [`BackwardSolver`](crate::BackwardSolver) statistics, which makes the
//! simulator a cross-check for the solver.

use std::collections::HashMap;

use oddsmith_core::{
    AttributeDistributions, DiscardScheduler, ProfileState, Scenario,
    cost::{exp_to_reach, tuner_to_reach},
    profile::MAX_LEVEL,
};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{branching, memo::MemoKey, reachability};

/// How a single simulated attempt ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttemptOutcome {
    Success,
    /// Abandoned by the scheduler at the given level.
    Discarded { level: u8 },
    /// Reached the last level below the threshold.
    Failed,
}

impl AttemptOutcome {
    /// Experience and tuners wasted by this outcome.
    #[must_use]
    pub fn waste(self) -> (f64, f64) {
        match self {
            Self::Success => (0.0, 0.0),
            Self::Discarded { level } => (exp_to_reach(level), tuner_to_reach(level)),
            Self::Failed => (exp_to_reach(MAX_LEVEL), tuner_to_reach(MAX_LEVEL)),
        }
    }
}

/// Aggregated results of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub trials: usize,
    pub successes: usize,
    pub discards: usize,
    pub failures: usize,
    pub success_rate: f64,
    pub mean_wasted_exp: f64,
    pub mean_wasted_tuner: f64,
}

/// Seedable sampler of whole attempts.
#[derive(Debug, Clone)]
pub struct Simulator {
    rng: Pcg32,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Runs `trials` attempts and averages their outcomes.
    #[expect(clippy::cast_precision_loss)]
    pub fn run(
        &mut self,
        scenario: &Scenario,
        scheduler: DiscardScheduler,
        distributions: &AttributeDistributions,
        trials: usize,
    ) -> SimulationReport {
        let mut reachability_cache = HashMap::new();
        let mut report = SimulationReport {
            trials,
            ..SimulationReport::default()
        };
        let mut total_exp = 0.0;
        let mut total_tuner = 0.0;

        for _ in 0..trials {
            let outcome =
                self.attempt(scenario, scheduler, distributions, &mut reachability_cache);
            match outcome {
                AttemptOutcome::Success => report.successes += 1,
                AttemptOutcome::Discarded { .. } => report.discards += 1,
                AttemptOutcome::Failed => report.failures += 1,
            }
            let (exp, tuner) = outcome.waste();
            total_exp += exp;
            total_tuner += tuner;
        }

        if trials > 0 {
            let n = trials as f64;
            report.success_rate = report.successes as f64 / n;
            report.mean_wasted_exp = total_exp / n;
            report.mean_wasted_tuner = total_tuner / n;
        }
        report
    }

    /// Samples one attempt from the empty profile.
    pub fn attempt(
        &mut self,
        scenario: &Scenario,
        scheduler: DiscardScheduler,
        distributions: &AttributeDistributions,
        reachability_cache: &mut HashMap<MemoKey, f64>,
    ) -> AttemptOutcome {
        let mut profile = ProfileState::empty();
        loop {
            if scenario.is_success(&profile) {
                return AttemptOutcome::Success;
            }
            if profile.is_complete() {
                return AttemptOutcome::Failed;
            }

            let level = profile.level();
            let threshold = scheduler.threshold_for_level(level);
            if threshold > 0.0 {
                let key = MemoKey::new(&profile, &scenario.weights);
                let p = *reachability_cache
                    .entry(key)
                    .or_insert_with(|| reachability::probability(&profile, scenario, distributions));
                if p < threshold {
                    return AttemptOutcome::Discarded { level };
                }
            }

            profile = self.level_up(&profile, scenario, distributions);
        }
    }

    fn level_up(
        &mut self,
        profile: &ProfileState,
        scenario: &Scenario,
        distributions: &AttributeDistributions,
    ) -> ProfileState {
        let mut branches = branching::level_up_branches(
            profile,
            &scenario.weights,
            &scenario.locked,
            distributions,
        );
        if branches.is_empty() {
            return profile.advanced();
        }
        let mut roll = self.rng.random::<f64>();
        let index = branches
            .iter()
            .position(|branch| {
                roll -= branch.probability;
                roll < 0.0
            })
            .unwrap_or(branches.len() - 1);
        branches.swap_remove(index).profile
    }
}
