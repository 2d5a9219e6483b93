use chrono::{DateTime, Utc};
use oddsmith_core::DiscardScheduler;
use oddsmith_optimizer::UtilityWeights;
use serde::Serialize;

/// Result document of the `optimize` command.
///
/// The thresholds sit at the top level, so the document can be passed back
/// wherever a scheduler file is expected.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizedScheduler {
    #[serde(flatten)]
    pub scheduler: DiscardScheduler,
    pub utility_weights: UtilityWeights,
    pub iterations: usize,
    pub computed_at: DateTime<Utc>,
}
