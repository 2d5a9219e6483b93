//! Expected outcome of an attempt under a discard policy.

use std::collections::HashMap;

use oddsmith_core::{
    AttributeDistributions, DiscardScheduler, DistributionSource, ProfileState, Scenario,
    Statistics,
    cost::{exp_to_reach, tuner_to_reach},
    profile::MAX_LEVEL,
};

use crate::{branching, memo::MemoKey, reachability};

/// Solved states of one scenario.
pub type MemoTable = HashMap<MemoKey, Statistics>;

/// Backward induction over the level-up tree of one scenario.
///
/// A state either succeeds, runs out of levels, gets discarded by the
/// scheduler, or levels up into the branches of
/// [`branching::level_up_branches`]. Results are memoized per [`MemoKey`],
/// so every key is expanded at most once.
pub struct BackwardSolver<'a> {
    scenario: &'a Scenario,
    scheduler: DiscardScheduler,
    distributions: &'a AttributeDistributions,
    memo: MemoTable,
}

impl<'a> BackwardSolver<'a> {
    #[must_use]
    pub fn new(
        scenario: &'a Scenario,
        scheduler: DiscardScheduler,
        distributions: &'a AttributeDistributions,
    ) -> Self {
        Self::with_memo(scenario, scheduler, distributions, MemoTable::new())
    }

    /// Resumes from a table filled by an earlier solver of the same scenario.
    #[must_use]
    pub fn with_memo(
        scenario: &'a Scenario,
        scheduler: DiscardScheduler,
        distributions: &'a AttributeDistributions,
        memo: MemoTable,
    ) -> Self {
        Self {
            scenario,
            scheduler,
            distributions,
            memo,
        }
    }

    #[must_use]
    pub fn into_memo(self) -> MemoTable {
        self.memo
    }

    #[must_use]
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn solve(&mut self, profile: &ProfileState) -> Statistics {
        if self.scenario.is_success(profile) {
            return Statistics::SUCCESS;
        }
        if profile.level() >= MAX_LEVEL {
            return Statistics::failure(exp_to_reach(MAX_LEVEL), tuner_to_reach(MAX_LEVEL));
        }

        let key = MemoKey::new(profile, &self.scenario.weights);
        if let Some(&stats) = self.memo.get(&key) {
            return stats;
        }

        let stats = self.expand(profile);
        self.memo.insert(key, stats);
        stats
    }

    fn expand(&mut self, profile: &ProfileState) -> Statistics {
        let level = profile.level();
        let discard_threshold = self.scheduler.threshold_for_level(level);
        if discard_threshold > 0.0 {
            let p = reachability::probability(profile, self.scenario, self.distributions);
            if p < discard_threshold {
                return Statistics::failure(exp_to_reach(level), tuner_to_reach(level));
            }
        }

        let scenario = self.scenario;
        branching::level_up_branches(
            profile,
            &scenario.weights,
            &scenario.locked,
            self.distributions,
        )
        .iter()
        .map(|branch| self.solve(&branch.profile) * branch.probability)
        .sum()
    }
}

/// Success probability and expected waste of `profile` under `scheduler`.
///
/// Uncached; [`Engine::statistics`](crate::Engine::statistics) keeps memo
/// tables across calls.
#[must_use]
pub fn get_statistics<D>(
    profile: &ProfileState,
    scenario: &Scenario,
    scheduler: DiscardScheduler,
    source: &D,
) -> Statistics
where
    D: DistributionSource + ?Sized,
{
    let distributions = AttributeDistributions::preprocess(&scenario.weights, source);
    BackwardSolver::new(scenario, scheduler, &distributions).solve(profile)
}
