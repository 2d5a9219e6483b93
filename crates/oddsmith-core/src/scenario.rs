use std::hash::{Hash, Hasher};

use crate::{
    attribute::{LockedKeys, WeightVector},
    profile::ProfileState,
    quantize::{self, SCORE_THRESHOLD_SCALE},
    scheduler::DiscardScheduler,
};

/// What counts as a success: weights, score threshold and locked attributes.
///
/// The threshold is compared on a 1e-3 grid for equality and hashing.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub weights: WeightVector,
    pub score_threshold: f64,
    pub locked: LockedKeys,
}

impl Scenario {
    #[must_use]
    pub fn new(weights: WeightVector, score_threshold: f64, locked: LockedKeys) -> Self {
        Self {
            weights,
            score_threshold,
            locked,
        }
    }

    #[must_use]
    pub fn score(&self, profile: &ProfileState) -> f64 {
        self.weights.score(profile)
    }

    /// Returns `true` if the profile already clears the threshold with all locked attributes.
    #[must_use]
    pub fn is_success(&self, profile: &ProfileState) -> bool {
        self.score(profile) >= self.score_threshold && profile.satisfies(&self.locked)
    }

    /// Pairs the scenario with a discard policy to form a cache key.
    #[must_use]
    pub fn with_scheduler(&self, scheduler: DiscardScheduler) -> ScenarioKey {
        ScenarioKey {
            scenario: self.clone(),
            scheduler,
        }
    }

    fn canonical_threshold(&self) -> i64 {
        quantize::canonical(self.score_threshold, SCORE_THRESHOLD_SCALE)
    }
}

impl PartialEq for Scenario {
    fn eq(&self, other: &Self) -> bool {
        self.weights == other.weights
            && self.canonical_threshold() == other.canonical_threshold()
            && self.locked == other.locked
    }
}

impl Eq for Scenario {}

impl Hash for Scenario {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.weights.hash(state);
        self.canonical_threshold().hash(state);
        self.locked.hash(state);
    }
}

/// One fully specified query configuration; the unit of cache eviction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScenarioKey {
    pub scenario: Scenario,
    pub scheduler: DiscardScheduler,
}
