//! Public entry points over the solvers, with their caches.
//!
//! Every call preprocesses the host distributions again. What survives
//! between calls is solved state: memo tables per scenario and scheduler,
//! and the representative-profile catalog of the last scenario.

use std::mem;

use oddsmith_core::{
    AttributeDistributions, DiscardScheduler, DistributionSource, ProfileState, Scenario,
    ScenarioKey, Statistics,
};

use crate::{
    analysis::Analysis,
    backward::{BackwardSolver, MemoTable},
    cache::{self, DEFAULT_SCENARIO_CAPACITY, LruCache},
    example::ExampleCatalog,
    reachability,
};

/// Entry points over process-scoped caches.
///
/// The engine owns two caches that outlive single calls:
///
/// - solved memo tables per [`ScenarioKey`], bounded by an LRU that drops
///   the least recently used scenario as a whole;
/// - the representative-profile catalog of the last scenario queried,
///   rebuilt when a different scenario comes in.
///
/// Profiles passed in should pass [`ProfileState::validate`]. The engine
/// does not reject the others, and its solvers agree on them, but their
/// pool sizes no longer follow from the level alone.
///
/// Host distributions are preprocessed on every call. Memo tables assume
/// the host data for a scenario stays the same between calls; use
/// [`Engine::clear`] after changing it.
///
/// # Example
///
/// ```
/// use oddsmith_core::{DiscardScheduler, LockedKeys, ProfileState, Scenario, StatTable, WeightVector};
/// use oddsmith_solver::Engine;
///
/// let scenario = Scenario::new(WeightVector::new([("a", 1.0)]), 1.0, LockedKeys::default());
/// let stats = StatTable::from_outcomes([("a", vec![(1.0, 1.0)])]);
///
/// let mut engine = Engine::new();
/// let result = engine.statistics(
///     &ProfileState::empty(),
///     &scenario,
///     DiscardScheduler::always_continue(),
///     &stats,
/// );
/// assert!((result.success_probability - 1.0).abs() < 1e-12);
/// ```
pub struct Engine {
    statistics_cache: LruCache<ScenarioKey, MemoTable>,
    examples: Option<ExampleCatalog>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SCENARIO_CAPACITY)
    }

    /// Creates an engine keeping at most `capacity` scenarios.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            statistics_cache: cache::bounded(capacity),
            examples: None,
        }
    }

    /// Number of scenarios with a cached memo table.
    #[must_use]
    pub fn cached_scenarios(&self) -> usize {
        self.statistics_cache.len()
    }

    #[must_use]
    pub fn is_cached(&self, scenario: &Scenario, scheduler: DiscardScheduler) -> bool {
        self.statistics_cache
            .contains(&scenario.with_scheduler(scheduler))
    }

    /// Drops every cached table.
    pub fn clear(&mut self) {
        self.statistics_cache.clear();
        self.examples = None;
    }

    /// Probability that `profile` reaches the threshold when never discarding.
    #[must_use]
    pub fn prob_above_score<D>(&self, profile: &ProfileState, scenario: &Scenario, source: &D) -> f64
    where
        D: DistributionSource + ?Sized,
    {
        reachability::prob_above_score(profile, scenario, source)
    }

    /// Success probability and expected waste of `profile` under `scheduler`.
    pub fn statistics<D>(
        &mut self,
        profile: &ProfileState,
        scenario: &Scenario,
        scheduler: DiscardScheduler,
        source: &D,
    ) -> Statistics
    where
        D: DistributionSource + ?Sized,
    {
        let distributions = AttributeDistributions::preprocess(&scenario.weights, source);
        let key = scenario.with_scheduler(scheduler);

        let cached = self.statistics_cache.get_mut(&key).map(mem::take);
        let hit = cached.is_some();
        let memo = match cached {
            Some(memo) => {
                tracing::debug!(
                    target: "oddsmith.cache",
                    entries = memo.len(),
                    "scenario cache hit"
                );
                memo
            }
            None => {
                tracing::debug!(target: "oddsmith.cache", "scenario cache miss");
                MemoTable::new()
            }
        };

        let mut solver = BackwardSolver::with_memo(scenario, scheduler, &distributions, memo);
        let statistics = solver.solve(profile);
        let memo = solver.into_memo();

        if hit {
            self.statistics_cache.put(key, memo);
        } else if let Some((evicted, table)) = self.statistics_cache.push(key, memo) {
            tracing::debug!(
                target: "oddsmith.cache",
                threshold = evicted.scenario.score_threshold,
                entries = table.len(),
                "evicted least recently used scenario"
            );
        }
        statistics
    }

    /// A likely profile at `level` whose success probability is the smallest
    /// one at or above `min_probability`.
    pub fn example_profile<D>(
        &mut self,
        level: u8,
        min_probability: f64,
        scenario: &Scenario,
        source: &D,
    ) -> Option<ProfileState>
    where
        D: DistributionSource + ?Sized,
    {
        let distributions = AttributeDistributions::preprocess(&scenario.weights, source);
        let stale = self
            .examples
            .as_ref()
            .is_none_or(|catalog| catalog.scenario() != scenario);
        if stale {
            tracing::debug!(target: "oddsmith.cache", "rebuilding example catalog");
            self.examples = Some(ExampleCatalog::build(scenario, &distributions));
        }

        let found = self
            .examples
            .as_ref()
            .and_then(|catalog| catalog.find(level, min_probability, &distributions));
        if found.is_none() {
            tracing::debug!(level, min_probability, "no example profile qualifies");
        }
        found
    }

    /// Score, expected score and success figures of `profile`.
    ///
    /// Without a scheduler only the brief report is produced.
    pub fn analyze<D>(
        &mut self,
        profile: &ProfileState,
        scenario: &Scenario,
        scheduler: Option<DiscardScheduler>,
        source: &D,
    ) -> Analysis
    where
        D: DistributionSource + ?Sized,
    {
        let distributions = AttributeDistributions::preprocess(&scenario.weights, source);
        let p = reachability::probability(profile, scenario, &distributions);
        let brief = Analysis::brief(profile, scenario, &distributions, p);
        match scheduler {
            Some(scheduler) => {
                let statistics = self.statistics(profile, scenario, scheduler, source);
                brief.with_discard(statistics)
            }
            None => brief,
        }
    }
}
