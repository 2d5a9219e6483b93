//! Canonical rounding of floating-point values used as keys.
//!
//! Every floating-point quantity that takes part in equality, hashing, or
//! memoization is mapped to an integer on a fixed grid first. Equality and
//! hashing then operate on the integers, so the two always agree and small
//! floating noise never splits one configuration into two cache slots.
//!
//! | quantity                | grid          |
//! |-------------------------|---------------|
//! | attribute weight        | 0.1           |
//! | score threshold         | 0.001         |
//! | discard threshold       | 0.000001      |
//! | score (DP / memo keys)  | 1/20          |

use std::ops::{Add, AddAssign};

/// Grid steps per unit for attribute weights (one decimal).
pub const WEIGHT_SCALE: f64 = 10.0;

/// Grid steps per unit for score thresholds.
pub const SCORE_THRESHOLD_SCALE: f64 = 1_000.0;

/// Grid steps per unit for discard probability thresholds.
pub const DISCARD_THRESHOLD_SCALE: f64 = 1_000_000.0;

/// Grid steps per unit for quantized scores.
pub const SCORE_TICKS_PER_UNIT: f64 = 20.0;

/// Values with an absolute value below this are treated as zero.
pub const ZERO_EPSILON: f64 = 1e-5;

/// Rounds `value` onto a grid with `scale` steps per unit.
#[expect(clippy::cast_possible_truncation)]
#[must_use]
pub fn canonical(value: f64, scale: f64) -> i64 {
    (value * scale).round() as i64
}

/// Returns `true` if `value` counts as an assigned (non-zero) attribute value.
#[must_use]
pub fn is_nonzero(value: f64) -> bool {
    value.abs() >= ZERO_EPSILON
}

/// A score rounded to the 1/20 grid.
///
/// Sums of ticks are integer additions, so a quantized running score is
/// independent of the order in which contributions were added.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScoreTicks(i64);

impl ScoreTicks {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn from_score(score: f64) -> Self {
        Self(canonical(score, SCORE_TICKS_PER_UNIT))
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_score(self) -> f64 {
        self.0 as f64 / SCORE_TICKS_PER_UNIT
    }
}

impl Add for ScoreTicks {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for ScoreTicks {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
