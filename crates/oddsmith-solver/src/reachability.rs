//! Probability that a profile eventually clears the score threshold.
//!
//! The remaining level-ups are modelled as drawing without replacement from
//! the attribute pool. Available attributes are processed one at a time
//! while a table tracks, for every number of level-ups still unspent, the
//! distribution of the quantized score gained so far:
//!
//! ```text
//! rows[j] : ScoreTicks -> probability mass,  j = level-ups not yet spent
//! ```
//!
//! The attribute at pool position `i` is drawn with probability
//! `j / (pool - i)`. If drawn, its roll outcomes move mass from row `j` to
//! row `j - 1`; otherwise the mass stays in row `j`. Locked attributes must
//! be drawn, so their "not drawn" transition is dropped. Level-ups left over
//! at the end went to attributes that do not move the score, so every row
//! counts towards the final sum.

use std::collections::BTreeMap;

use oddsmith_core::{
    AttributeDistributions, DistributionSource, ProfileState, Scenario, quantize::ScoreTicks,
};

use crate::branching;

type ScoreMass = BTreeMap<ScoreTicks, f64>;

/// Probability that `profile` ends at or above the scenario's threshold with
/// every locked attribute assigned.
///
/// `profile` is expected to pass [`ProfileState::validate`]. Profiles with
/// fewer assignments than level-ups are still answered, with the same pool
/// rule as the backward solver.
///
/// Host distributions are preprocessed on every call.
#[must_use]
pub fn prob_above_score<D>(profile: &ProfileState, scenario: &Scenario, source: &D) -> f64
where
    D: DistributionSource + ?Sized,
{
    let distributions = AttributeDistributions::preprocess(&scenario.weights, source);
    probability(profile, scenario, &distributions)
}

/// [`prob_above_score`] over already preprocessed distributions.
#[must_use]
pub fn probability(
    profile: &ProfileState,
    scenario: &Scenario,
    distributions: &AttributeDistributions,
) -> f64 {
    let weights = &scenario.weights;
    let locked = &scenario.locked;

    let unreachable_lock = locked
        .iter()
        .any(|key| !profile.is_filled(key) && !weights.contains(key));
    if unreachable_lock {
        return 0.0;
    }

    let remaining = profile.remaining_level_ups();
    // unobtainable attributes behave like the rest of the untracked pool
    let available = branching::available_attributes(profile, weights, locked)
        .into_iter()
        .filter(|attribute| locked.contains(attribute) || distributions.is_obtainable(attribute))
        .collect::<Vec<_>>();
    // a profile with fewer assignments than level-ups has a pool smaller
    // than its candidates; widen it the way `level_up_branches` does
    let pool = branching::pool_size(profile, weights).max(available.len());

    let mut rows = vec![ScoreMass::new(); remaining + 1];
    rows[remaining].insert(ScoreTicks::ZERO, 1.0);

    for (position, &attribute) in available.iter().enumerate() {
        let forced = locked.contains(attribute);
        let weight = weights.get(attribute);
        let gains = distributions
            .outcomes(attribute)
            .iter()
            .map(|&(value, p)| (ScoreTicks::from_score(value * weight), p))
            .collect::<Vec<_>>();

        let mut next = vec![ScoreMass::new(); remaining + 1];
        for (slots, row) in rows.iter().enumerate() {
            let drawn = roll_probability(slots, pool, position);
            for (&ticks, &mass) in row {
                if !forced && drawn < 1.0 {
                    *next[slots].entry(ticks).or_default() += mass * (1.0 - drawn);
                }
                if slots > 0 && drawn > 0.0 {
                    for &(gain, p) in &gains {
                        *next[slots - 1].entry(ticks + gain).or_default() += mass * drawn * p;
                    }
                }
            }
        }
        rows = next;
    }

    let base = scenario.score(profile);
    rows.iter()
        .flatten()
        .filter(|&(ticks, _)| base + ticks.to_score() >= scenario.score_threshold)
        .fold(0.0, |total, (_, mass)| total + mass)
}

/// Chance that the attribute at `position` is among the next `slots` draws
/// from a pool of `pool` candidates.
#[expect(clippy::cast_precision_loss)]
fn roll_probability(slots: usize, pool: usize, position: usize) -> f64 {
    let left = pool.saturating_sub(position);
    if left == 0 {
        return 0.0;
    }
    (slots as f64 / left as f64).min(1.0)
}
