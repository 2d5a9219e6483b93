//! Score estimates for partially upgraded profiles.

use crate::{
    attribute::WeightVector, distribution::AttributeDistributions, profile::ProfileState,
};

/// Score of `profile` under `weights`.
#[must_use]
pub fn score(profile: &ProfileState, weights: &WeightVector) -> f64 {
    weights.score(profile)
}

/// Expected final score if the remaining level-ups are spread evenly.
///
/// Each unassigned attribute of `weights` is credited with its mean roll
/// scaled by `remaining level-ups / unassigned attributes`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn expected_score(
    profile: &ProfileState,
    weights: &WeightVector,
    distributions: &AttributeDistributions,
) -> f64 {
    let unfilled = weights
        .attributes()
        .filter(|attribute| !profile.is_filled(attribute))
        .collect::<Vec<_>>();
    if unfilled.is_empty() {
        return weights.score(profile);
    }

    let share = profile.remaining_level_ups() as f64 / unfilled.len() as f64;
    let expected_gain = unfilled
        .iter()
        .map(|attribute| weights.get(attribute) * distributions.mean(attribute) * share)
        .sum::<f64>();
    weights.score(profile) + expected_gain
}
