use std::{
    iter::Sum,
    ops::{Add, AddAssign, Mul},
};

use serde::{Deserialize, Serialize};

/// Outcome of following a discard policy from some profile.
///
/// Forms a vector space under [`Add`] and scalar [`Mul`], which is how the
/// solver combines the outcomes of probability-weighted branches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Probability of reaching the score threshold under the discard policy.
    pub success_probability: f64,
    /// Expected experience spent on attempts that end in a discard or a failure.
    pub wasted_exp: f64,
    /// Expected tuners spent on attempts that end in a discard or a failure.
    pub wasted_tuner: f64,
}

impl Statistics {
    /// Already successful: nothing more to spend.
    pub const SUCCESS: Self = Self::new(1.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(success_probability: f64, wasted_exp: f64, wasted_tuner: f64) -> Self {
        Self {
            success_probability,
            wasted_exp,
            wasted_tuner,
        }
    }

    /// A failed attempt that sunk `exp` experience and `tuner` tuners.
    #[must_use]
    pub const fn failure(exp: f64, tuner: f64) -> Self {
        Self::new(0.0, exp, tuner)
    }
}

impl Add for Statistics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.success_probability + rhs.success_probability,
            self.wasted_exp + rhs.wasted_exp,
            self.wasted_tuner + rhs.wasted_tuner,
        )
    }
}

impl AddAssign for Statistics {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Statistics {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self::new(
            self.success_probability * factor,
            self.wasted_exp * factor,
            self.wasted_tuner * factor,
        )
    }
}

impl Sum for Statistics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Statistics, b: Statistics) -> bool {
        (a.success_probability - b.success_probability).abs() < 1e-9
            && (a.wasted_exp - b.wasted_exp).abs() < 1e-9
            && (a.wasted_tuner - b.wasted_tuner).abs() < 1e-9
    }

    #[test]
    fn test_addition_is_commutative_and_associative() {
        let a = Statistics::new(0.25, 100.0, 3.0);
        let b = Statistics::new(0.5, 40.0, 1.0);
        let c = Statistics::new(0.125, 7.0, 2.5);
        assert!(approx_eq(a + b, b + a));
        assert!(approx_eq((a + b) + c, a + (b + c)));
        assert!(approx_eq(a + Statistics::default(), a));
    }

    #[test]
    fn test_scalar_multiplication_distributes() {
        let a = Statistics::new(0.25, 100.0, 3.0);
        let b = Statistics::new(0.5, 40.0, 1.0);
        assert!(approx_eq((a + b) * 0.3, a * 0.3 + b * 0.3));
        assert!(approx_eq(a * (0.2 + 0.5), a * 0.2 + a * 0.5));
        assert!(approx_eq(a * 1.0, a));
    }

    #[test]
    fn test_sum_and_add_assign() {
        let parts = [Statistics::SUCCESS * 0.5, Statistics::failure(10.0, 2.0) * 0.5];
        let total: Statistics = parts.iter().copied().sum();
        let mut acc = Statistics::default();
        for part in parts {
            acc += part;
        }
        assert!(approx_eq(total, Statistics::new(0.5, 5.0, 1.0)));
        assert!(approx_eq(acc, total));
    }
}
