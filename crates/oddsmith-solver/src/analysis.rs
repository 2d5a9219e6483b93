use oddsmith_core::{
    AttributeDistributions, ProfileState, Scenario, Statistics,
    cost::{exp_to_reach, tuner_to_reach},
    scoring,
};
use serde::{Deserialize, Serialize};

/// Summary of one profile under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub level: u8,
    /// Current score.
    pub score: f64,
    /// Score expected at level 25 if the remaining level-ups spread evenly.
    pub expected_score: f64,
    /// Chance to reach the threshold when never discarding.
    pub prob_above_threshold: f64,
    /// Figures that depend on a discard scheduler; absent in brief reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discard: Option<DiscardAnalysis>,
}

/// Outcome of following a discard scheduler from the analyzed profile.
///
/// Per-success totals are infinite when success is impossible. JSON has no
/// infinity, so they serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscardAnalysis {
    /// Chance to reach the threshold when discarding per the scheduler.
    pub prob_above_threshold: f64,
    /// Expected experience wasted from here on, excluding what is already sunk.
    pub expected_wasted_exp: f64,
    /// Expected tuners wasted from here on, excluding what is already sunk.
    pub expected_wasted_tuner: f64,
    /// Experience wasted per success when repeating the attempt indefinitely.
    pub expected_total_wasted_exp: f64,
    /// Tuners wasted per success when repeating the attempt indefinitely.
    pub expected_total_wasted_tuner: f64,
}

impl Analysis {
    /// Score, expected score and the no-discard probability.
    #[must_use]
    pub fn brief(
        profile: &ProfileState,
        scenario: &Scenario,
        distributions: &AttributeDistributions,
        prob_above_threshold: f64,
    ) -> Self {
        Self {
            level: profile.level(),
            score: scenario.score(profile),
            expected_score: scoring::expected_score(profile, &scenario.weights, distributions),
            prob_above_threshold,
            discard: None,
        }
    }

    #[must_use]
    pub fn with_discard(mut self, statistics: Statistics) -> Self {
        self.discard = Some(DiscardAnalysis::new(
            self.level,
            self.prob_above_threshold,
            statistics,
        ));
        self
    }
}

impl DiscardAnalysis {
    /// Derives the report from solver statistics.
    ///
    /// Resources already spent on the profile are subtracted in proportion
    /// to the no-discard failure chance.
    #[must_use]
    pub fn new(level: u8, prob_no_discard: f64, statistics: Statistics) -> Self {
        let mut wasted_exp = statistics.wasted_exp;
        let mut wasted_tuner = statistics.wasted_tuner;
        if level > 0 {
            wasted_exp -= exp_to_reach(level) * (1.0 - prob_no_discard);
            wasted_tuner -= tuner_to_reach(level) * (1.0 - prob_no_discard);
        }

        let p = statistics.success_probability;
        let (total_exp, total_tuner) = if p <= 0.0 {
            (f64::INFINITY, f64::INFINITY)
        } else if p >= 1.0 {
            (0.0, 0.0)
        } else {
            (wasted_exp / p, wasted_tuner / p)
        };

        Self {
            prob_above_threshold: p,
            expected_wasted_exp: wasted_exp,
            expected_wasted_tuner: wasted_tuner,
            expected_total_wasted_exp: total_exp,
            expected_total_wasted_tuner: total_tuner,
        }
    }
}
