//! Discard threshold optimization.
//!
//! Finds the four per-band thresholds of a
//! [`DiscardScheduler`](oddsmith_core::DiscardScheduler) that minimize the
//! expected resources spent per success, as weighted by [`UtilityWeights`].

pub use self::{
    optimizer::{DEFAULT_OPTIMIZER_CAPACITY, SchedulerOptimizer},
    resource::Resource,
    search::{DEFAULT_ITERATIONS, optimal_scheduler},
    utility::UtilityWeights,
};

mod optimizer;
pub mod resource;
pub mod search;
pub mod utility;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum UtilityWeightsError {
    #[display(
        "utility weights must be finite and non-negative, got ({attempts}, {exp}, {tuner})"
    )]
    Invalid { attempts: f64, exp: f64, tuner: f64 },
    #[display("at least one utility weight must be positive")]
    AllZero,
}
