//! Fixed-point search for per-band discard thresholds.
//!
//! Whether discarding a profile pays off depends on what a fresh attempt is
//! expected to cost, and that cost depends on every discard decision. The
//! search therefore guesses the cost of a fresh attempt (the trial
//! resource), solves the optimal continue/discard decision of every state
//! under that guess, and compares the resulting cost of a fresh attempt with
//! the guess:
//!
//! 1. bisection between zero and the no-discard cost for `iterations` rounds;
//! 2. over-relaxation towards the solved cost for another `iterations`
//!    rounds.
//!
//! The last decision recorded per state is turned into thresholds: the
//! minimum no-discard success probability among continued states of a band.
//! Thresholds are read after each phase, and the cheaper scheduler wins.

use std::collections::HashMap;

use oddsmith_core::{
    AttributeDistributions, DiscardScheduler, DistributionSource, ProfileState, Scenario,
    cost::{TUNER_PER_LEVEL_UP, exp_between},
    profile::{LEVEL_STEP, MAX_LEVEL},
    scheduler::BAND_COUNT,
};
use oddsmith_solver::{Engine, MemoKey, branching, reachability};

use crate::{resource::Resource, utility::UtilityWeights};

/// Rounds of each search phase unless configured otherwise.
pub const DEFAULT_ITERATIONS: usize = 20;

/// Step factor of the relaxation phase.
const RELAXATION_FACTOR: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Discard,
}

#[derive(Debug, Clone)]
struct DecisionRecord {
    decision: Decision,
    profile: ProfileState,
}

/// State shared by every round of one search.
struct ThresholdSearch<'a> {
    scenario: &'a Scenario,
    distributions: &'a AttributeDistributions,
    weights: UtilityWeights,
    strategies: HashMap<MemoKey, DecisionRecord>,
}

/// One backward pass under a fixed trial resource.
struct Round<'s, 'a> {
    search: &'s mut ThresholdSearch<'a>,
    trial: Resource,
    memo: HashMap<MemoKey, Resource>,
}

impl Round<'_, '_> {
    fn solve(&mut self, profile: &ProfileState) -> Resource {
        let scenario = self.search.scenario;
        if scenario.is_success(profile) {
            return Resource::ZERO;
        }
        if profile.level() >= MAX_LEVEL {
            return self.trial + Resource::ONE_ATTEMPT;
        }

        let key = MemoKey::new(profile, &scenario.weights);
        if let Some(&resource) = self.memo.get(&key) {
            return resource;
        }

        let level = profile.level();
        let level_up_cost = Resource::new(
            0.0,
            exp_between(level, level + LEVEL_STEP),
            f64::from(TUNER_PER_LEVEL_UP),
        );
        let continued = branching::level_up_branches(
            profile,
            &scenario.weights,
            &scenario.locked,
            self.search.distributions,
        )
        .iter()
        .fold(level_up_cost, |acc, branch| {
            acc + self.solve(&branch.profile) * branch.probability
        });
        let discarded = Resource::ONE_ATTEMPT + self.trial;

        let weights = self.search.weights;
        let (decision, resource) = if weights.utility(&continued) > weights.utility(&discarded) {
            (Decision::Discard, discarded)
        } else {
            (Decision::Continue, continued)
        };
        self.search.strategies.insert(
            key.clone(),
            DecisionRecord {
                decision,
                profile: profile.clone(),
            },
        );
        self.memo.insert(key, resource);
        resource
    }
}

impl<'a> ThresholdSearch<'a> {
    fn new(
        scenario: &'a Scenario,
        distributions: &'a AttributeDistributions,
        weights: UtilityWeights,
    ) -> Self {
        Self {
            scenario,
            distributions,
            weights,
            strategies: HashMap::new(),
        }
    }

    /// Cost of a fresh attempt when every state decides optimally under `trial`.
    fn round(&mut self, trial: Resource) -> Resource {
        let mut round = Round {
            search: self,
            trial,
            memo: HashMap::new(),
        };
        round.solve(&ProfileState::empty())
    }

    /// Halves the interval between zero and `baseline` for `iterations`
    /// rounds and returns the last trial.
    fn bisect(&mut self, baseline: Resource, iterations: usize) -> Resource {
        let mut lower = Resource::ZERO;
        let mut upper = baseline;
        let mut trial = baseline;
        for i in 0..iterations {
            trial = (lower + upper) * 0.5;
            let solved = self.round(trial);
            if self.compare_round(i, "bisect", trial, solved) {
                lower = trial;
            } else {
                upper = trial;
            }
        }
        trial
    }

    /// Over-relaxes `trial` towards the solved cost for `iterations` rounds.
    fn relax(&mut self, mut trial: Resource, iterations: usize) {
        for i in 0..iterations {
            let solved = self.round(trial);
            self.compare_round(i, "relax", trial, solved);
            trial = trial + (solved - trial) * RELAXATION_FACTOR;
        }
    }

    /// Logs one round and reports whether the solved cost reached the trial.
    fn compare_round(
        &self,
        round: usize,
        phase: &str,
        trial: Resource,
        solved: Resource,
    ) -> bool {
        let trial_utility = self.weights.utility(&trial);
        let solved_utility = self.weights.utility(&solved);
        tracing::debug!(
            round,
            phase,
            trial_utility,
            solved_utility,
            "threshold search round"
        );
        solved_utility >= trial_utility
    }

    fn scheduler(&self) -> DiscardScheduler {
        let mut thresholds = [1.0_f64; BAND_COUNT];
        let continued = self
            .strategies
            .values()
            .filter(|record| record.decision == Decision::Continue);
        for record in continued {
            let Some(band) = DiscardScheduler::band_index(record.profile.level()) else {
                continue;
            };
            let p = reachability::probability(&record.profile, self.scenario, self.distributions);
            thresholds[band] = thresholds[band].min(p);
        }
        DiscardScheduler::from_array(thresholds)
    }
}

/// Discard thresholds minimizing the expected cost per success.
///
/// The no-discard baseline comes from `engine`, so it is shared with other
/// statistics queries of the same scenario. When success is impossible even
/// without discarding, every attempt is discarded.
///
/// The relaxation phase can overshoot when success is likely, leaving
/// thresholds that discard far too much. The schedulers left by each phase
/// are therefore evaluated with `engine`, and the cheapest one per success
/// is returned, the relaxed one winning ties. If both cost more than the
/// no-discard baseline, the never-discarding scheduler is returned.
pub fn optimal_scheduler<D>(
    engine: &mut Engine,
    scenario: &Scenario,
    weights: UtilityWeights,
    source: &D,
    iterations: usize,
) -> DiscardScheduler
where
    D: DistributionSource + ?Sized,
{
    let baseline_stats = engine.statistics(
        &ProfileState::empty(),
        scenario,
        DiscardScheduler::always_continue(),
        source,
    );
    let Some(baseline) = Resource::per_success(&baseline_stats) else {
        tracing::warn!(
            threshold = scenario.score_threshold,
            "threshold is unreachable, discarding every attempt"
        );
        return DiscardScheduler::always_discard();
    };

    let distributions = AttributeDistributions::preprocess(&scenario.weights, source);
    let mut search = ThresholdSearch::new(scenario, &distributions, weights);
    let bisected = search.bisect(baseline, iterations);
    let bisected_scheduler = search.scheduler();
    search.relax(bisected, iterations);
    let relaxed_scheduler = search.scheduler();

    let mut best = (DiscardScheduler::always_continue(), weights.utility(&baseline));
    for (phase, candidate) in [("bisect", bisected_scheduler), ("relax", relaxed_scheduler)] {
        let stats = engine.statistics(&ProfileState::empty(), scenario, candidate, source);
        let utility =
            Resource::per_success(&stats).map_or(f64::INFINITY, |cost| weights.utility(&cost));
        tracing::debug!(phase, utility, thresholds = ?candidate.thresholds(), "search candidate");
        if utility <= best.1 {
            best = (candidate, utility);
        }
    }

    let (scheduler, utility) = best;
    tracing::info!(
        thresholds = ?scheduler.thresholds(),
        utility,
        baseline_utility = weights.utility(&baseline),
        "optimized discard scheduler"
    );
    scheduler
}

#[cfg(test)]
mod tests {
    use oddsmith_core::{LockedKeys, StatTable, WeightVector};

    use super::*;

    fn lottery() -> (Scenario, StatTable) {
        // a must be drawn and roll 10: once a rolls 1 the attempt is hopeless
        let scenario = Scenario::new(
            WeightVector::new([
                ("a", 1.0),
                ("b", 0.0),
                ("c", 0.0),
                ("d", 0.0),
                ("e", 0.0),
                ("f", 0.0),
                ("g", 0.0),
            ]),
            10.0,
            LockedKeys::default(),
        );
        let table = StatTable::from_outcomes([("a", vec![(10.0, 0.1), (1.0, 0.9)])]);
        (scenario, table)
    }

    fn cost_per_success(
        engine: &mut Engine,
        scenario: &Scenario,
        scheduler: DiscardScheduler,
        table: &StatTable,
        weights: &UtilityWeights,
    ) -> f64 {
        let stats = engine.statistics(&ProfileState::empty(), scenario, scheduler, table);
        weights.utility(&Resource::per_success(&stats).unwrap())
    }

    #[test]
    fn test_unreachable_threshold_discards_everything() {
        let (mut scenario, table) = lottery();
        scenario.score_threshold = 100.0;
        let weights = UtilityWeights::new(1.0, 1.0, 1.0).unwrap();
        let scheduler =
            optimal_scheduler(&mut Engine::new(), &scenario, weights, &table, DEFAULT_ITERATIONS);
        assert_eq!(scheduler, DiscardScheduler::always_discard());
    }

    #[test]
    fn test_hopeless_attempts_are_discarded() {
        let (scenario, table) = lottery();
        let weights = UtilityWeights::new(0.0, 1.0, 1.0).unwrap();
        let mut engine = Engine::new();
        let scheduler = optimal_scheduler(&mut engine, &scenario, weights, &table, 10);

        for threshold in scheduler.thresholds() {
            assert!(threshold > 0.0 && threshold <= 1.0, "{threshold}");
        }

        let optimized = cost_per_success(&mut engine, &scenario, scheduler, &table, &weights);
        let never = cost_per_success(
            &mut engine,
            &scenario,
            DiscardScheduler::always_continue(),
            &table,
            &weights,
        );
        assert!(optimized < never, "{optimized} >= {never}");
    }

    #[test]
    fn test_thresholds_are_probabilities() {
        let scenario = Scenario::new(
            WeightVector::new([("a", 1.0), ("b", 2.0), ("c", 0.0), ("d", 1.0), ("e", 0.5)]),
            6.0,
            LockedKeys::default(),
        );
        let table = StatTable::from_outcomes([
            ("a", vec![(1.0, 0.5), (3.0, 0.5)]),
            ("b", vec![(1.0, 0.7), (2.0, 0.3)]),
            ("c", vec![(1.0, 1.0)]),
            ("d", vec![(0.5, 0.5), (2.5, 0.5)]),
            ("e", vec![(2.0, 0.5), (4.0, 0.5)]),
        ]);
        let weights = UtilityWeights::new(1.0, 2.0, 0.5).unwrap();
        let scheduler = optimal_scheduler(&mut Engine::new(), &scenario, weights, &table, 5);
        for threshold in scheduler.thresholds() {
            assert!((0.0..=1.0).contains(&threshold), "{threshold}");
        }
    }

    #[test]
    fn test_likely_success_is_never_worse_than_never_discarding() {
        // four of ten attributes count and any single roll of 4 succeeds
        let attributes = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
        let scenario = Scenario::new(
            WeightVector::new(
                attributes
                    .iter()
                    .enumerate()
                    .map(|(i, &name)| (name, if i < 4 { 1.0 } else { 0.0 })),
            ),
            4.0,
            LockedKeys::default(),
        );
        let uniform = vec![(1.0, 0.25), (2.0, 0.25), (3.0, 0.25), (4.0, 0.25)];
        let table = StatTable::from_outcomes(attributes.map(|name| (name, uniform.clone())));

        for weights in [
            UtilityWeights::new(1.0, 0.0, 0.0).unwrap(),
            UtilityWeights::new(1.0, 1.0, 1.0).unwrap(),
            UtilityWeights::new(0.0, 1.0, 0.0).unwrap(),
        ] {
            let mut engine = Engine::new();
            let scheduler =
                optimal_scheduler(&mut engine, &scenario, weights, &table, DEFAULT_ITERATIONS);
            let optimized = cost_per_success(&mut engine, &scenario, scheduler, &table, &weights);
            let never = cost_per_success(
                &mut engine,
                &scenario,
                DiscardScheduler::always_continue(),
                &table,
                &weights,
            );
            assert!(optimized <= never + 1e-9, "{optimized} > {never}");
        }
    }

    #[test]
    fn test_scheduler_takes_smallest_continued_probability() {
        let (scenario, table) = lottery();
        let distributions = AttributeDistributions::preprocess(&scenario.weights, &table);
        let weights = UtilityWeights::new(1.0, 1.0, 1.0).unwrap();
        let mut search = ThresholdSearch::new(&scenario, &distributions, weights);
        assert_eq!(search.scheduler(), DiscardScheduler::always_discard());

        let hopeless = ProfileState::new(5, [("a", 1.0)]).unwrap();
        let open = ProfileState::new(5, [("b", 1.0)]).unwrap();
        let waiting = ProfileState::new(10, [("b", 1.0), ("c", 1.0)]).unwrap();
        let dropped = ProfileState::new(15, [("a", 1.0), ("b", 1.0), ("c", 1.0)]).unwrap();
        let records = [
            (&hopeless, Decision::Continue),
            (&open, Decision::Continue),
            (&waiting, Decision::Continue),
            (&dropped, Decision::Discard),
        ];
        for (profile, decision) in records {
            search.strategies.insert(
                MemoKey::new(profile, &scenario.weights),
                DecisionRecord {
                    decision,
                    profile: profile.clone(),
                },
            );
        }

        let thresholds = search.scheduler().thresholds();
        let p_waiting = reachability::probability(&waiting, &scenario, &distributions);
        assert!(p_waiting > 0.0 && p_waiting < 1.0);
        assert_eq!(thresholds[0], 0.0);
        assert!((thresholds[1] - p_waiting).abs() < 1e-12);
        // discarded states leave their band alone
        assert_eq!(thresholds[2], 1.0);
        assert_eq!(thresholds[3], 1.0);
    }

    #[test]
    fn test_certain_success_continues_everywhere() {
        let scenario = Scenario::new(WeightVector::new([("a", 1.0)]), 1.0, LockedKeys::default());
        let table = StatTable::from_outcomes([("a", vec![(1.0, 1.0)])]);
        let weights = UtilityWeights::new(1.0, 1.0, 1.0).unwrap();
        let mut engine = Engine::new();
        let scheduler = optimal_scheduler(&mut engine, &scenario, weights, &table, 5);
        let stats = engine.statistics(&ProfileState::empty(), &scenario, scheduler, &table);
        assert!((stats.success_probability - 1.0).abs() < 1e-12);
    }
}
