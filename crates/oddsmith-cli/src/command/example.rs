use std::path::{Path, PathBuf};

use oddsmith_core::ProfileState;
use oddsmith_solver::Engine;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ExampleArg {
    /// Scenario JSON file
    #[arg(long)]
    scenario: PathBuf,
    /// Level of the wanted profile (0, 5, 10, 15 or 20)
    #[arg(long)]
    level: u8,
    /// Minimum success probability of the wanted profile
    #[arg(long, default_value_t = 0.5)]
    prob: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExampleArg) -> anyhow::Result<()> {
    let ExampleArg {
        scenario,
        level,
        prob,
        output,
    } = arg;
    anyhow::ensure!(
        (0.0..=1.0).contains(prob),
        "probability must be within [0, 1], got {prob}"
    );

    let found = find_example(scenario, *level, *prob)?;
    match &found {
        Some((_, p)) => eprintln!("Found a level {level} profile with P(success) = {p:.4}"),
        None => eprintln!("No level {level} profile reaches P(success) >= {prob}"),
    }
    let profile = found.map(|(profile, _)| profile);
    Output::save_json(&profile, output.as_deref())
}

fn find_example(
    scenario_path: &Path,
    level: u8,
    min_probability: f64,
) -> anyhow::Result<Option<(ProfileState, f64)>> {
    let file = util::read_scenario_file(scenario_path)?;
    let scenario = file.scenario();
    let mut engine = Engine::new();
    let found = engine
        .example_profile(level, min_probability, &scenario, &file.stats)
        .map(|profile| {
            let p = engine.prob_above_score(&profile, &scenario, &file.stats);
            (profile, p)
        });
    Ok(found)
}
