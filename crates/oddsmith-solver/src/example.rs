//! Representative profiles for a target success probability.
//!
//! The catalog keeps, for every level band from 0 to 20 and every
//! reachable quantized score, the most likely profile with that score.
//! "Most likely" is measured by significance: the sum of
//! [`AttributeDistributions::log_probability`] over the assigned values.

use std::collections::BTreeMap;

use oddsmith_core::{
    AttributeDistributions, ProfileState, Scenario,
    profile::{LEVEL_STEP, LEVEL_UP_COUNT},
    quantize::ScoreTicks,
};

use crate::{branching, reachability};

#[derive(Debug, Clone)]
struct Candidate {
    profile: ProfileState,
    significance: f64,
}

/// Most significant profile per (level band, quantized score).
#[derive(Debug, Clone)]
pub struct ExampleCatalog {
    scenario: Scenario,
    bands: Vec<BTreeMap<ScoreTicks, Candidate>>,
}

impl ExampleCatalog {
    /// Expands every roll sequence of `scenario` up to level 20, keeping one
    /// candidate per quantized score and band.
    #[must_use]
    pub fn build(scenario: &Scenario, distributions: &AttributeDistributions) -> Self {
        let weights = &scenario.weights;
        let mut bands = vec![BTreeMap::new(); LEVEL_UP_COUNT];
        bands[0].insert(
            ScoreTicks::ZERO,
            Candidate {
                profile: ProfileState::empty(),
                significance: 0.0,
            },
        );

        for band in 0..LEVEL_UP_COUNT - 1 {
            let mut next = BTreeMap::<ScoreTicks, Candidate>::new();
            for parent in bands[band].values() {
                for attribute in branching::unfilled_attributes(&parent.profile, weights) {
                    for &(value, _) in distributions.outcomes(attribute) {
                        let Some(log_p) = distributions.log_probability(attribute, value) else {
                            continue;
                        };
                        let profile = parent.profile.with_roll(attribute, value);
                        let significance = parent.significance + log_p;
                        let ticks = ScoreTicks::from_score(weights.score(&profile));
                        let replace = next
                            .get(&ticks)
                            .is_none_or(|current| current.significance < significance);
                        if replace {
                            next.insert(
                                ticks,
                                Candidate {
                                    profile,
                                    significance,
                                },
                            );
                        }
                    }
                }
            }
            bands[band + 1] = next;
        }

        Self {
            scenario: scenario.clone(),
            bands,
        }
    }

    /// The scenario the catalog was built for.
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Number of candidates stored for the band containing `level`.
    #[must_use]
    pub fn candidate_count(&self, level: u8) -> usize {
        self.bands
            .get(usize::from(level / LEVEL_STEP))
            .map_or(0, BTreeMap::len)
    }

    /// The candidate at `level` whose success probability is the smallest one
    /// still at or above `min_probability`.
    ///
    /// Returns `None` if no candidate qualifies or `level` is past the last
    /// band with candidates.
    #[must_use]
    pub fn find(
        &self,
        level: u8,
        min_probability: f64,
        distributions: &AttributeDistributions,
    ) -> Option<ProfileState> {
        let band = self.bands.get(usize::from(level / LEVEL_STEP))?;
        band.values()
            .map(|candidate| {
                let p = reachability::probability(
                    &candidate.profile,
                    &self.scenario,
                    distributions,
                );
                (p, candidate)
            })
            .filter(|(p, _)| *p >= min_probability)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, candidate)| candidate.profile.clone())
    }
}
