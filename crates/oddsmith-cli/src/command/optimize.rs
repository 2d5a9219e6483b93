use std::path::{Path, PathBuf};

use chrono::Utc;
use oddsmith_core::{DiscardScheduler, ProfileState};
use oddsmith_optimizer::{DEFAULT_ITERATIONS, Resource, SchedulerOptimizer, UtilityWeights};
use oddsmith_solver::Engine;

use crate::{
    model::scheduler::OptimizedScheduler,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct OptimizeArg {
    /// Scenario JSON file
    #[arg(long)]
    scenario: PathBuf,
    /// Relative cost of starting one more attempt
    #[arg(long, default_value_t = 1.0)]
    attempt_weight: f64,
    /// Relative cost of wasted experience
    #[arg(long, default_value_t = 1.0)]
    exp_weight: f64,
    /// Relative cost of wasted tuners
    #[arg(long, default_value_t = 1.0)]
    tuner_weight: f64,
    /// Rounds of each search phase
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &OptimizeArg) -> anyhow::Result<()> {
    let OptimizeArg {
        scenario,
        attempt_weight,
        exp_weight,
        tuner_weight,
        iterations,
        output,
    } = arg;
    let utility_weights = UtilityWeights::new(*attempt_weight, *exp_weight, *tuner_weight)?;
    let result = optimize_file(scenario, utility_weights, *iterations)?;
    Output::save_json(&result, output.as_deref())
}

fn optimize_file(
    scenario_path: &Path,
    utility_weights: UtilityWeights,
    iterations: usize,
) -> anyhow::Result<OptimizedScheduler> {
    let file = util::read_scenario_file(scenario_path)?;
    let scenario = file.scenario();
    let mut engine = Engine::new();
    let mut optimizer = SchedulerOptimizer::new();

    eprintln!("Optimizing discard thresholds ({iterations} rounds per phase)...");
    let scheduler = optimizer.optimize(
        &mut engine,
        &scenario,
        utility_weights,
        &file.stats,
        iterations,
    );

    let start = ProfileState::empty();
    for (label, candidate) in [
        ("never discard", DiscardScheduler::always_continue()),
        ("optimized", scheduler),
    ] {
        let stats = engine.statistics(&start, &scenario, candidate, &file.stats);
        match Resource::per_success(&stats) {
            Some(cost) => eprintln!(
                "  {label:>13}: P(success) {:.4}, per success {:.2} attempts, {:.0} exp, {:.1} tuners (utility {:.3})",
                stats.success_probability,
                cost.attempts,
                cost.exp,
                cost.tuner,
                utility_weights.utility(&cost),
            ),
            None => eprintln!("  {label:>13}: success is impossible"),
        }
    }
    eprintln!("  thresholds: {:?}", scheduler.thresholds());

    Ok(OptimizedScheduler {
        scheduler,
        utility_weights,
        iterations,
        computed_at: Utc::now(),
    })
}
