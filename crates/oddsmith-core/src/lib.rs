//! Data model for staged attribute-roll probability analysis.
//!
//! A [`ProfileState`] advances through levels 0, 5, ..., 25. Each level-up
//! may assign one attribute a value drawn from a host-supplied distribution
//! ([`distribution`]). A [`WeightVector`] turns the assigned values into a
//! score, and a [`Scenario`] decides when a profile counts as a success.
//!
//! # Modules
//!
//! - [`attribute`] - weights, scoring and locked attributes
//! - [`profile`] - profile states, level bookkeeping and validation
//! - [`scheduler`] - per-band discard thresholds
//! - [`distribution`] - host stat tables and their preprocessed form
//! - [`statistics`] - the (success, wasted exp, wasted tuner) outcome vector
//! - [`cost`] - resource cost tables
//! - [`quantize`] - canonical rounding used for equality, hashing and memo keys
//! - [`scenario`] - scenario fingerprints used as cache keys
//! - [`scoring`] - score and expected-score estimates

pub use self::{
    attribute::{LockedKeys, WeightVector},
    distribution::{AttributeDistributions, DistributionSource, StatTable},
    profile::ProfileState,
    scenario::{Scenario, ScenarioKey},
    scheduler::DiscardScheduler,
    statistics::Statistics,
};

pub mod attribute;
pub mod cost;
pub mod distribution;
pub mod profile;
pub mod quantize;
pub mod scenario;
pub mod scheduler;
pub mod scoring;
pub mod statistics;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("discard scheduler needs 4 thresholds, got {len}")]
pub struct SchedulerArityError {
    pub len: usize,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ProfileValidationError {
    #[display("invalid profile level {level}: must be a multiple of 5 in 0..=25")]
    InvalidLevel { level: u8 },
    #[display("profile has {filled} assigned attributes, expected {expected} for its level")]
    FilledCountMismatch { filled: usize, expected: usize },
    #[display("value {value} is not a possible roll of attribute {attribute}")]
    UnknownValue { attribute: String, value: f64 },
}
