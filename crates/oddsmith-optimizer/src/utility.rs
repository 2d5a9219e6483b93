//! Scalar cost of a [`Resource`](crate::Resource).
//!
//! Weights are normalized to sum to one, so scaling all three by the same
//! factor leaves both the utility ordering and the cache key unchanged.

use std::hash::{Hash, Hasher};

use oddsmith_core::quantize;
use serde::Serialize;

use crate::{UtilityWeightsError, resource::Resource};

/// Grid steps per unit when comparing normalized weights.
const UTILITY_WEIGHT_SCALE: f64 = 1_000_000.0;

/// Exchange rate of experience against the other resources.
const EXP_PER_UNIT: f64 = 1_200.0;

/// Exchange rate of one extra attempt against the other resources.
const UNITS_PER_ATTEMPT: f64 = 10.0;

/// Relative importance of the three resources, normalized to sum to 1.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UtilityWeights {
    attempts: f64,
    exp: f64,
    tuner: f64,
}

impl UtilityWeights {
    /// Normalizes the weights so that they sum to 1.
    pub fn new(attempts: f64, exp: f64, tuner: f64) -> Result<Self, UtilityWeightsError> {
        let mut weights = [attempts, exp, tuner];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(UtilityWeightsError::Invalid {
                attempts,
                exp,
                tuner,
            });
        }
        if !normalize_l1(&mut weights) {
            return Err(UtilityWeightsError::AllZero);
        }
        let [attempts, exp, tuner] = weights;
        Ok(Self {
            attempts,
            exp,
            tuner,
        })
    }

    #[must_use]
    pub fn attempts(&self) -> f64 {
        self.attempts
    }

    #[must_use]
    pub fn exp(&self) -> f64 {
        self.exp
    }

    #[must_use]
    pub fn tuner(&self) -> f64 {
        self.tuner
    }

    /// Scalar cost of `resource`; lower is better.
    #[must_use]
    pub fn utility(&self, resource: &Resource) -> f64 {
        UNITS_PER_ATTEMPT * self.attempts * resource.attempts
            + self.exp / EXP_PER_UNIT * resource.exp
            + self.tuner * resource.tuner
    }

    fn canonical(&self) -> [i64; 3] {
        [self.attempts, self.exp, self.tuner]
            .map(|w| quantize::canonical(w, UTILITY_WEIGHT_SCALE))
    }
}

impl PartialEq for UtilityWeights {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for UtilityWeights {}

impl Hash for UtilityWeights {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

fn normalize_l1(weights: &mut [f64]) -> bool {
    let sum: f64 = weights.iter().copied().sum();
    if sum <= 0.0 {
        return false;
    }
    for w in weights {
        *w /= sum;
    }
    true
}
