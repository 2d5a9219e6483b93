use std::path::{Path, PathBuf};

use oddsmith_core::{AttributeDistributions, ProfileState, Statistics};
use oddsmith_solver::{Engine, SimulationReport, Simulator};
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Scenario JSON file
    #[arg(long)]
    scenario: PathBuf,
    /// Scheduler JSON file; never discard if omitted
    #[arg(long)]
    scheduler: Option<PathBuf>,
    /// Number of attempts to sample
    #[arg(long, default_value_t = 10000)]
    trials: usize,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationOutput {
    simulated: SimulationReport,
    /// What the backward solver predicts for the same scheduler.
    solved: Statistics,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        scenario,
        scheduler,
        trials,
        seed,
        output,
    } = arg;

    eprintln!("Simulating {trials} attempts...");
    let result = simulate_file(scenario, scheduler.as_deref(), *trials, *seed)?;
    let SimulationOutput { simulated, solved } = &result;
    eprintln!(
        "  success rate {:.4} (solver {:.4})",
        simulated.success_rate, solved.success_probability
    );
    eprintln!(
        "  wasted exp per attempt {:.0} (solver {:.0})",
        simulated.mean_wasted_exp, solved.wasted_exp
    );
    eprintln!(
        "  wasted tuners per attempt {:.2} (solver {:.2})",
        simulated.mean_wasted_tuner, solved.wasted_tuner
    );

    Output::save_json(&result, output.as_deref())
}

fn simulate_file(
    scenario_path: &Path,
    scheduler_path: Option<&Path>,
    trials: usize,
    seed: Option<u64>,
) -> anyhow::Result<SimulationOutput> {
    let file = util::read_scenario_file(scenario_path)?;
    let scheduler = util::scheduler_or_default(scheduler_path)?;
    let scenario = file.scenario();
    let distributions = AttributeDistributions::preprocess(&scenario.weights, &file.stats);

    let mut simulator = seed.map_or_else(Simulator::new, Simulator::with_seed);
    let simulated = simulator.run(&scenario, scheduler, &distributions, trials);
    let solved = Engine::new().statistics(&ProfileState::empty(), &scenario, scheduler, &file.stats);
    Ok(SimulationOutput { simulated, solved })
}
