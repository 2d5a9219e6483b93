//! Statistical utilities for discrete outcome distributions.
//!
//! Attribute rolls are described by finite lists of `(value, probability)`
//! pairs. This crate summarizes such lists:
//!
//! - **Descriptive statistics**: mean, variance, standard deviation, support bounds
//! - **Log-likelihood**: how common a particular outcome is, used to rank example states
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for weighted discrete distributions
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use oddsmith_stats::descriptive::DistributionStats;
//!
//! let outcomes = [(1.0, 0.25), (2.0, 0.5), (3.0, 0.25)];
//! let stats = DistributionStats::new(outcomes).unwrap();
//! assert_eq!(stats.mean, 2.0);
//! assert_eq!(stats.min, 1.0);
//! assert_eq!(stats.max, 3.0);
//! ```
//!
//! ## Looking up the log-probability of an outcome
//!
//! ```
//! use oddsmith_stats::descriptive::log_probability_of;
//!
//! let outcomes = [(6.3, 0.5), (7.1, 0.5)];
//! let lp = log_probability_of(&outcomes, 7.1).unwrap();
//! assert!((lp - 0.5_f64.ln()).abs() < 1e-12);
//! ```

pub mod descriptive;
