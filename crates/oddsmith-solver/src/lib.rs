//! Probability and expected-cost solvers for staged attribute rolls.
//!
//! Every solver shares the level-up model of [`branching`]: a level-up
//! draws one attribute uniformly from the pool of attributes not yet
//! consumed, then rolls its value from the host distribution.
//!
//! - [`reachability`] computes the chance that a profile ends at or above
//!   the score threshold when it is never discarded.
//! - [`backward`] solves the success probability and expected waste of an
//!   attempt that follows a [`DiscardScheduler`](oddsmith_core::DiscardScheduler).
//! - [`example`] finds representative profiles for a target probability.
//! - [`simulation`] samples attempts to cross-check the backward solver.
//! - [`Engine`] bundles these behind process-scoped caches.

pub use self::{
    analysis::{Analysis, DiscardAnalysis},
    backward::{BackwardSolver, MemoTable, get_statistics},
    engine::Engine,
    example::ExampleCatalog,
    memo::MemoKey,
    reachability::prob_above_score,
    simulation::{SimulationReport, Simulator},
};

pub mod analysis;
pub mod backward;
pub mod branching;
pub mod cache;
mod engine;
pub mod example;
pub mod memo;
pub mod reachability;
pub mod simulation;
