use std::path::{Path, PathBuf};

use oddsmith_solver::{Analysis, Engine};

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Scenario JSON file
    #[arg(long)]
    scenario: PathBuf,
    /// Profile JSON file
    #[arg(long)]
    profile: PathBuf,
    /// Scheduler JSON file; never discard if omitted
    #[arg(long, conflicts_with = "brief")]
    scheduler: Option<PathBuf>,
    /// Skip the discard figures, which need the full solver
    #[arg(long)]
    brief: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let AnalyzeArg {
        scenario,
        profile,
        scheduler,
        brief,
        output,
    } = arg;
    let analysis = analyze_files(scenario, profile, scheduler.as_deref(), *brief)?;

    eprintln!(
        "Level {}: score {:.2}, expected {:.2}",
        analysis.level, analysis.score, analysis.expected_score
    );
    eprintln!(
        "  P(success) without discarding: {:.4}",
        analysis.prob_above_threshold
    );
    if let Some(discard) = &analysis.discard {
        eprintln!(
            "  P(success) with discarding:    {:.4}",
            discard.prob_above_threshold
        );
        eprintln!(
            "  wasted per success: {:.0} exp, {:.1} tuners",
            discard.expected_total_wasted_exp, discard.expected_total_wasted_tuner
        );
    }

    Output::save_json(&analysis, output.as_deref())
}

fn analyze_files(
    scenario_path: &Path,
    profile_path: &Path,
    scheduler_path: Option<&Path>,
    brief: bool,
) -> anyhow::Result<Analysis> {
    let file = util::read_scenario_file(scenario_path)?;
    let profile = util::read_profile_file(profile_path)?.to_profile(&file.stats)?;
    let scheduler = if brief {
        None
    } else {
        Some(util::scheduler_or_default(scheduler_path)?)
    };

    let mut engine = Engine::new();
    Ok(engine.analyze(&profile, &file.scenario(), scheduler, &file.stats))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const SCENARIO_JSON: &str = r#"{
        "weights": { "a": 1.0, "b": 1.0 },
        "score_threshold": 3.0,
        "stats": {
            "a": { "distribution": [
                { "value": 1.0, "probability": 0.5 },
                { "value": 2.0, "probability": 0.5 }
            ] },
            "b": { "distribution": [{ "value": 1.0, "probability": 1.0 }] }
        }
    }"#;

    fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let scenario = dir.join("scenario.json");
        let profile = dir.join("profile.json");
        fs::write(&scenario, SCENARIO_JSON).unwrap();
        fs::write(&profile, r#"{ "level": 0 }"#).unwrap();
        (scenario, profile)
    }

    #[test]
    fn test_brief_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let (scenario, profile) = write_inputs(dir.path());
        let analysis = analyze_files(&scenario, &profile, None, true).unwrap();
        assert_eq!(analysis.level, 0);
        assert!(analysis.discard.is_none());
        assert!(analysis.prob_above_threshold > 0.0 && analysis.prob_above_threshold < 1.0);
    }

    #[test]
    fn test_full_analysis_without_scheduler_never_discards() {
        let dir = tempfile::tempdir().unwrap();
        let (scenario, profile) = write_inputs(dir.path());
        let analysis = analyze_files(&scenario, &profile, None, false).unwrap();
        let discard = analysis.discard.unwrap();
        assert!((discard.prob_above_threshold - analysis.prob_above_threshold).abs() < 1e-9);
    }

    #[test]
    fn test_full_analysis_with_scheduler_file() {
        let dir = tempfile::tempdir().unwrap();
        let (scenario, profile) = write_inputs(dir.path());
        let scheduler = dir.path().join("scheduler.json");
        fs::write(&scheduler, r#"{ "thresholds": [1.0, 1.0, 1.0, 1.0] }"#).unwrap();

        let analysis = analyze_files(&scenario, &profile, Some(scheduler.as_path()), false).unwrap();
        let discard = analysis.discard.unwrap();
        assert!(discard.prob_above_threshold <= analysis.prob_above_threshold + 1e-12);
    }
}
