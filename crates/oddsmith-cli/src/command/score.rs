use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use oddsmith_core::{AttributeDistributions, ProfileState, Scenario, scoring};
use oddsmith_stats::descriptive::DistributionStats;
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    /// Scenario JSON file
    #[arg(long)]
    scenario: PathBuf,
    /// Profile JSON file
    #[arg(long)]
    profile: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct ScoreReport {
    level: u8,
    score: f64,
    expected_score: f64,
    score_threshold: f64,
    success: bool,
    /// Weighted value of every assigned attribute.
    contributions: BTreeMap<String, f64>,
    /// Roll outlook of the weighted attributes still unassigned.
    open_attributes: BTreeMap<String, RollSummary>,
}

#[derive(Debug, Clone, Serialize)]
struct RollSummary {
    weight: f64,
    mean: f64,
    std_dev: f64,
    max: f64,
}

impl RollSummary {
    fn new(weight: f64, stats: &DistributionStats) -> Self {
        Self {
            weight,
            mean: stats.mean,
            std_dev: stats.std_dev,
            max: stats.max,
        }
    }
}

impl ScoreReport {
    fn new(
        profile: &ProfileState,
        scenario: &Scenario,
        distributions: &AttributeDistributions,
    ) -> Self {
        let weights = &scenario.weights;
        let contributions = profile
            .filled_attributes()
            .map(|attribute| {
                let weighted = weights.get(attribute) * profile.value(attribute);
                (attribute.to_owned(), weighted)
            })
            .collect();
        let open_attributes = weights
            .iter()
            .filter(|(attribute, weight)| *weight > 0.0 && !profile.is_filled(attribute))
            .filter_map(|(attribute, weight)| {
                let stats = distributions.stats(attribute)?;
                Some((attribute.to_owned(), RollSummary::new(weight, &stats)))
            })
            .collect();

        Self {
            level: profile.level(),
            score: scenario.score(profile),
            expected_score: scoring::expected_score(profile, weights, distributions),
            score_threshold: scenario.score_threshold,
            success: scenario.is_success(profile),
            contributions,
            open_attributes,
        }
    }
}

pub(crate) fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let ScoreArg {
        scenario,
        profile,
        output,
    } = arg;
    let report = score_files(scenario, profile)?;
    eprintln!(
        "Score {:.2} / {:.2} at level {} (expected {:.2} at level 25)",
        report.score, report.score_threshold, report.level, report.expected_score
    );
    Output::save_json(&report, output.as_deref())
}

fn score_files(scenario_path: &Path, profile_path: &Path) -> anyhow::Result<ScoreReport> {
    let file = util::read_scenario_file(scenario_path)?;
    let profile = util::read_profile_file(profile_path)?.to_profile(&file.stats)?;
    let scenario = file.scenario();
    let distributions = AttributeDistributions::preprocess(&scenario.weights, &file.stats);
    Ok(ScoreReport::new(&profile, &scenario, &distributions))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_score_report() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = dir.path().join("scenario.json");
        let profile = dir.path().join("profile.json");
        fs::write(
            &scenario,
            r#"{
                "weights": { "a": 2.0, "b": 1.0, "c": 0.0 },
                "score_threshold": 5.0,
                "stats": {
                    "a": { "distribution": [{ "value": 2.0, "probability": 1.0 }] },
                    "b": { "distribution": [
                        { "value": 1.0, "probability": 0.5 },
                        { "value": 3.0, "probability": 0.5 }
                    ] },
                    "c": { "distribution": [{ "value": 9.0, "probability": 1.0 }] }
                }
            }"#,
        )
        .unwrap();
        fs::write(&profile, r#"{ "level": 5, "values": { "a": 2.0 } }"#).unwrap();

        let report = score_files(&scenario, &profile).unwrap();
        assert!((report.score - 4.0).abs() < 1e-12);
        assert!(!report.success);
        assert!((report.contributions["a"] - 4.0).abs() < 1e-12);
        assert_eq!(report.open_attributes.len(), 1);
        let b = &report.open_attributes["b"];
        assert!((b.mean - 2.0).abs() < 1e-12);
        assert!((b.std_dev - 1.0).abs() < 1e-12);
        assert!((b.max - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_profile_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = dir.path().join("scenario.json");
        let profile = dir.path().join("profile.json");
        fs::write(
            &scenario,
            r#"{ "weights": { "a": 1.0 }, "score_threshold": 1.0, "stats": {} }"#,
        )
        .unwrap();
        fs::write(&profile, r#"{ "level": 10, "values": {} }"#).unwrap();
        assert!(score_files(&scenario, &profile).is_err());
    }
}
