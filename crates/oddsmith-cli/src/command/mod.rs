use clap::{Parser, Subcommand};

use self::{
    analyze::AnalyzeArg, example::ExampleArg, optimize::OptimizeArg, score::ScoreArg,
    simulate::SimulateArg,
};

mod analyze;
mod example;
mod optimize;
mod score;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Score a profile and summarize the rolls it still has ahead
    Score(#[clap(flatten)] ScoreArg),
    /// Success probability and expected waste of a profile
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Find a likely profile at a level with a given success probability
    Example(#[clap(flatten)] ExampleArg),
    /// Search for discard thresholds minimizing the cost per success
    Optimize(#[clap(flatten)] OptimizeArg),
    /// Sample attempts to cross-check the solver
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Score(arg) => score::run(&arg)?,
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Example(arg) => example::run(&arg)?,
        Mode::Optimize(arg) => optimize::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
