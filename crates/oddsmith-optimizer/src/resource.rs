//! Resources spent on attempts, and their expectation per success.
//!
//! A [`Resource`] is a plain vector of attempts, experience and tuners, so
//! expectations over level-up branches are weighted sums of it.

use std::ops::{Add, Mul, Sub};

use oddsmith_core::Statistics;
use serde::{Deserialize, Serialize};

/// Expected resources spent until one success.
///
/// `attempts` counts extra attempts beyond the successful one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub attempts: f64,
    pub exp: f64,
    pub tuner: f64,
}

impl Resource {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// One more attempt and nothing else.
    pub const ONE_ATTEMPT: Self = Self::new(1.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(attempts: f64, exp: f64, tuner: f64) -> Self {
        Self {
            attempts,
            exp,
            tuner,
        }
    }

    /// Converts per-attempt statistics into resources per success.
    ///
    /// Returns `None` when success is impossible.
    #[must_use]
    pub fn per_success(statistics: &Statistics) -> Option<Self> {
        let p = statistics.success_probability;
        (p > 0.0).then(|| {
            Self::new(
                1.0 / p - 1.0,
                statistics.wasted_exp / p,
                statistics.wasted_tuner / p,
            )
        })
    }
}

impl Add for Resource {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.attempts + rhs.attempts,
            self.exp + rhs.exp,
            self.tuner + rhs.tuner,
        )
    }
}

impl Sub for Resource {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.attempts - rhs.attempts,
            self.exp - rhs.exp,
            self.tuner - rhs.tuner,
        )
    }
}

impl Mul<f64> for Resource {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self::new(self.attempts * factor, self.exp * factor, self.tuner * factor)
    }
}
