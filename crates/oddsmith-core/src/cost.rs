//! Resource cost tables of the leveling process.

use crate::profile::{LEVEL_STEP, MAX_LEVEL};

/// Cumulative experience needed to reach each level from 0.
pub const EXP_TO_LEVEL: [u32; MAX_LEVEL as usize + 1] = [
    0, 400, 1_000, 1_900, 3_000, 4_400, 6_100, 8_100, 10_500, 13_300, 16_500, 20_100, 24_200,
    28_800, 33_900, 39_600, 46_000, 53_100, 60_900, 69_600, 79_100, 89_600, 101_100, 113_700,
    127_500, 142_600,
];

/// Tuners consumed by one level-up.
pub const TUNER_PER_LEVEL_UP: u32 = 10;

/// Experience sunk into a profile at `level`.
#[must_use]
pub fn exp_to_reach(level: u8) -> f64 {
    f64::from(EXP_TO_LEVEL[usize::from(level.min(MAX_LEVEL))])
}

/// Experience needed to go from `from` to `to`.
#[must_use]
pub fn exp_between(from: u8, to: u8) -> f64 {
    exp_to_reach(to) - exp_to_reach(from)
}

/// Tuners sunk into a profile at `level`.
#[must_use]
pub fn tuner_to_reach(level: u8) -> f64 {
    f64::from(u32::from(level / LEVEL_STEP) * TUNER_PER_LEVEL_UP)
}
