//! The level-up model shared by every solver.
//!
//! A level-up draws one attribute from a pool of `|weights| - level/5`
//! candidates. Each still-unassigned attribute is drawn with probability
//! `1 / pool`, after which its value comes from its roll distribution. The
//! rest of the pool consists of attributes that no longer matter, and
//! drawing one of them advances the level without changing the score.

use oddsmith_core::{AttributeDistributions, LockedKeys, ProfileState, WeightVector};

/// A child profile and the probability of reaching it in one level-up.
#[derive(Debug, Clone)]
pub struct Branch {
    pub profile: ProfileState,
    pub probability: f64,
}

/// Number of candidates the next level-up draws from.
#[must_use]
pub fn pool_size(profile: &ProfileState, weights: &WeightVector) -> usize {
    weights.len().saturating_sub(profile.band())
}

/// Unassigned attributes whose roll can change the outcome.
///
/// These are the weighted attributes with a non-zero weight, plus locked
/// attributes regardless of their weight.
pub fn available_attributes<'a>(
    profile: &ProfileState,
    weights: &'a WeightVector,
    locked: &LockedKeys,
) -> Vec<&'a str> {
    weights
        .attributes()
        .filter(|attribute| !profile.is_filled(attribute))
        .filter(|attribute| weights.is_effective(attribute) || locked.contains(attribute))
        .collect()
}

/// Every unassigned weighted attribute, whether or not it affects the score.
pub fn unfilled_attributes<'a>(
    profile: &ProfileState,
    weights: &'a WeightVector,
) -> Vec<&'a str> {
    weights
        .attributes()
        .filter(|attribute| !profile.is_filled(attribute))
        .collect()
}

/// Available attributes that have at least one possible roll.
pub fn rollable_attributes<'a>(
    profile: &ProfileState,
    weights: &'a WeightVector,
    locked: &LockedKeys,
    distributions: &AttributeDistributions,
) -> Vec<&'a str> {
    available_attributes(profile, weights, locked)
        .into_iter()
        .filter(|attribute| distributions.is_obtainable(attribute))
        .collect()
}

/// Enumerates the outcomes of the next level-up of `profile`.
///
/// Each distinct `(attribute, value)` roll is its own branch; all rolls that
/// leave the tracked attributes unchanged are merged into one branch.
/// Attributes that can never be rolled count towards that merged branch. An
/// empty pool advances the level with certainty.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn level_up_branches(
    profile: &ProfileState,
    weights: &WeightVector,
    locked: &LockedKeys,
    distributions: &AttributeDistributions,
) -> Vec<Branch> {
    let rollable = rollable_attributes(profile, weights, locked, distributions);
    let divisor = pool_size(profile, weights).max(rollable.len());
    if divisor == 0 {
        return vec![Branch {
            profile: profile.advanced(),
            probability: 1.0,
        }];
    }

    let untracked = divisor - rollable.len();
    let divisor = divisor as f64;
    let mut branches = rollable
        .into_iter()
        .flat_map(move |attribute| {
            distributions
                .outcomes(attribute)
                .iter()
                .map(move |&(value, probability)| Branch {
                    profile: profile.with_roll(attribute, value),
                    probability: probability / divisor,
                })
        })
        .collect::<Vec<_>>();

    if untracked > 0 {
        branches.push(Branch {
            profile: profile.advanced(),
            probability: untracked as f64 / divisor,
        });
    }
    branches
}

#[cfg(test)]
mod tests {
    use oddsmith_core::StatTable;

    use super::*;

    fn total_probability(branches: &[Branch]) -> f64 {
        branches.iter().map(|b| b.probability).sum()
    }

    #[test]
    fn test_available_attributes() {
        let weights = WeightVector::new([("a", 1.0), ("b", 0.0), ("c", 2.0), ("d", 0.0)]);
        let profile = ProfileState::new(5, [("c", 1.0)]).unwrap();

        assert_eq!(
            available_attributes(&profile, &weights, &LockedKeys::default()),
            ["a"]
        );
        assert_eq!(
            available_attributes(&profile, &weights, &LockedKeys::new(["d"])),
            ["a", "d"]
        );
        assert_eq!(unfilled_attributes(&profile, &weights), ["a", "b", "d"]);
        assert_eq!(pool_size(&profile, &weights), 3);
    }

    #[test]
    fn test_branch_probabilities_sum_to_one() {
        let weights = WeightVector::new([("a", 1.0), ("b", 1.0), ("c", 0.0), ("d", 0.0)]);
        let table = StatTable::from_outcomes([
            ("a", vec![(1.0, 0.25), (2.0, 0.75)]),
            ("b", vec![(3.0, 1.0)]),
        ]);
        let dists = AttributeDistributions::preprocess(&weights, &table);
        let branches =
            level_up_branches(&ProfileState::empty(), &weights, &LockedKeys::default(), &dists);

        // a=1, a=2, b=3, and the merged branch for c/d
        assert_eq!(branches.len(), 4);
        assert!((total_probability(&branches) - 1.0).abs() < 1e-12);
        let untracked = branches.last().unwrap();
        assert_eq!(untracked.profile.level(), 5);
        assert_eq!(untracked.profile.filled_attributes().count(), 0);
        assert!((untracked.probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unobtainable_attribute_joins_untracked_branch() {
        let weights = WeightVector::new([("a", 1.0), ("b", 1.0)]);
        let table = StatTable::from_outcomes([("a", vec![(1.0, 1.0)])]);
        let dists = AttributeDistributions::preprocess(&weights, &table);
        let branches =
            level_up_branches(&ProfileState::empty(), &weights, &LockedKeys::default(), &dists);

        assert_eq!(branches.len(), 2);
        assert!((branches[1].probability - 0.5).abs() < 1e-12);
        assert!((total_probability(&branches) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unobtainable_attribute_does_not_widen_small_pool() {
        // pool of 3 - 2 = 1 with a and b unassigned; only a can be rolled
        let weights = WeightVector::new([("a", 1.0), ("b", 1.0), ("c", 1.0)]);
        let table = StatTable::from_outcomes([("a", vec![(1.0, 1.0)]), ("c", vec![(1.0, 1.0)])]);
        let dists = AttributeDistributions::preprocess(&weights, &table);
        let profile = ProfileState::new(10, [("c", 1.0)]).unwrap();
        let branches = level_up_branches(&profile, &weights, &LockedKeys::default(), &dists);

        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].profile.value("a"), 1.0);
        assert_eq!(branches[0].probability, 1.0);
    }

    #[test]
    fn test_empty_pool_advances() {
        let weights = WeightVector::new([("a", 1.0)]);
        let dists = AttributeDistributions::preprocess(&weights, &StatTable::default());
        let profile = ProfileState::new(5, [("a", 1.0)]).unwrap();
        let branches = level_up_branches(&profile, &weights, &LockedKeys::default(), &dists);

        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].profile.level(), 10);
        assert_eq!(branches[0].probability, 1.0);
    }
}
