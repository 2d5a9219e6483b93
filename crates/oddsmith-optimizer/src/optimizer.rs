//! Memoized front end of the threshold search.
//!
//! A search costs many full backward passes, so finished schedulers are kept
//! per scenario, normalized utility weights and round count.

use oddsmith_core::{DiscardScheduler, DistributionSource, Scenario};
use oddsmith_solver::{
    Engine,
    cache::{self, LruCache},
};

use crate::{search, utility::UtilityWeights};

/// Optimized schedulers kept by a [`SchedulerOptimizer`].
pub const DEFAULT_OPTIMIZER_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OptimizerKey {
    scenario: Scenario,
    weights: UtilityWeights,
    iterations: usize,
}

/// Threshold search with a small cache of finished results.
pub struct SchedulerOptimizer {
    cache: LruCache<OptimizerKey, DiscardScheduler>,
}

impl Default for SchedulerOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerOptimizer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_OPTIMIZER_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: cache::bounded(capacity),
        }
    }

    #[must_use]
    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    /// Runs [`search::optimal_scheduler`] unless the same query was answered before.
    pub fn optimize<D>(
        &mut self,
        engine: &mut Engine,
        scenario: &Scenario,
        weights: UtilityWeights,
        source: &D,
        iterations: usize,
    ) -> DiscardScheduler
    where
        D: DistributionSource + ?Sized,
    {
        let key = OptimizerKey {
            scenario: scenario.clone(),
            weights,
            iterations,
        };
        if let Some(&scheduler) = self.cache.get(&key) {
            tracing::debug!(target: "oddsmith.cache", "optimizer cache hit");
            return scheduler;
        }

        let scheduler = search::optimal_scheduler(engine, scenario, weights, source, iterations);
        if self.cache.push(key, scheduler).is_some() {
            tracing::debug!(
                target: "oddsmith.cache",
                "evicted least recently used optimizer result"
            );
        }
        scheduler
    }
}

#[cfg(test)]
mod tests {
    use oddsmith_core::{LockedKeys, StatTable, WeightVector};

    use super::*;

    #[test]
    fn test_repeated_query_is_cached() {
        let scenario = Scenario::new(
            WeightVector::new([("a", 1.0), ("b", 1.0), ("c", 0.0)]),
            3.0,
            LockedKeys::default(),
        );
        let table = StatTable::from_outcomes([
            ("a", vec![(1.0, 0.5), (2.0, 0.5)]),
            ("b", vec![(1.0, 0.5), (2.0, 0.5)]),
        ]);
        let weights = UtilityWeights::new(1.0, 1.0, 1.0).unwrap();
        let mut engine = Engine::new();
        let mut optimizer = SchedulerOptimizer::new();

        let first = optimizer.optimize(&mut engine, &scenario, weights, &table, 4);
        let second = optimizer.optimize(&mut engine, &scenario, weights, &table, 4);
        assert_eq!(first, second);
        assert_eq!(optimizer.cached_results(), 1);

        // the same weights scaled by a constant normalize to the same key
        let scaled = UtilityWeights::new(3.0, 3.0, 3.0).unwrap();
        optimizer.optimize(&mut engine, &scenario, scaled, &table, 4);
        assert_eq!(optimizer.cached_results(), 1);

        optimizer.optimize(&mut engine, &scenario, weights, &table, 5);
        assert_eq!(optimizer.cached_results(), 2);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let table = StatTable::from_outcomes([("a", vec![(1.0, 0.5), (2.0, 0.5)])]);
        let weights = UtilityWeights::new(1.0, 0.0, 0.0).unwrap();
        let mut engine = Engine::new();
        let mut optimizer = SchedulerOptimizer::with_capacity(2);
        for threshold in [1.0, 1.5, 2.0] {
            let scenario =
                Scenario::new(WeightVector::new([("a", 1.0)]), threshold, LockedKeys::default());
            optimizer.optimize(&mut engine, &scenario, weights, &table, 2);
        }
        assert_eq!(optimizer.cached_results(), 2);
    }
}
