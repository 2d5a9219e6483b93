use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{
    SchedulerArityError,
    profile::{LEVEL_STEP, MAX_LEVEL},
    quantize::{self, DISCARD_THRESHOLD_SCALE},
};

/// Number of level bands that carry a discard decision (5-9, 10-14, 15-19, 20-24).
pub const BAND_COUNT: usize = 4;

/// Per-band minimum success probabilities below which an attempt is abandoned.
///
/// Levels 0-4 always continue and level 25 is terminal, so only the four
/// bands in between carry a threshold. Equality and hashing compare
/// thresholds on a 1e-6 grid.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(try_from = "SchedulerRecord")]
pub struct DiscardScheduler {
    thresholds: [f64; BAND_COUNT],
}

#[derive(Debug, Deserialize)]
struct SchedulerRecord {
    thresholds: Vec<f64>,
}

impl TryFrom<SchedulerRecord> for DiscardScheduler {
    type Error = SchedulerArityError;

    fn try_from(record: SchedulerRecord) -> Result<Self, Self::Error> {
        Self::new(&record.thresholds)
    }
}

impl DiscardScheduler {
    /// Creates a scheduler from exactly [`BAND_COUNT`] thresholds.
    pub fn new(thresholds: &[f64]) -> Result<Self, SchedulerArityError> {
        let thresholds: [f64; BAND_COUNT] = thresholds
            .try_into()
            .map_err(|_| SchedulerArityError {
                len: thresholds.len(),
            })?;
        Ok(Self { thresholds })
    }

    #[must_use]
    pub const fn from_array(thresholds: [f64; BAND_COUNT]) -> Self {
        Self { thresholds }
    }

    /// A scheduler that never discards.
    #[must_use]
    pub const fn always_continue() -> Self {
        Self::from_array([0.0; BAND_COUNT])
    }

    /// A scheduler that discards every attempt not yet certain to succeed.
    #[must_use]
    pub const fn always_discard() -> Self {
        Self::from_array([1.0; BAND_COUNT])
    }

    #[must_use]
    pub fn thresholds(&self) -> [f64; BAND_COUNT] {
        self.thresholds
    }

    /// Maps a level to its threshold slot, or `None` for levels without a decision.
    #[must_use]
    pub fn band_index(level: u8) -> Option<usize> {
        (LEVEL_STEP..MAX_LEVEL)
            .contains(&level)
            .then(|| usize::from(level / LEVEL_STEP) - 1)
    }

    /// The discard threshold that applies at `level` (0.0 where no decision is made).
    #[must_use]
    pub fn threshold_for_level(&self, level: u8) -> f64 {
        Self::band_index(level).map_or(0.0, |i| self.thresholds[i])
    }

    fn canonical_thresholds(&self) -> [i64; BAND_COUNT] {
        self.thresholds
            .map(|t| quantize::canonical(t, DISCARD_THRESHOLD_SCALE))
    }
}

impl PartialEq for DiscardScheduler {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_thresholds() == other.canonical_thresholds()
    }
}

impl Eq for DiscardScheduler {}

impl Hash for DiscardScheduler {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_thresholds().hash(state);
    }
}
