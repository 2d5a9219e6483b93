use oddsmith_core::{LockedKeys, Scenario, StatTable, WeightVector};
use serde::{Deserialize, Serialize};

/// A scenario together with the host's attribute distributions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioFile {
    pub weights: WeightVector,
    pub score_threshold: f64,
    #[serde(default)]
    pub locked: LockedKeys,
    pub stats: StatTable,
}

impl ScenarioFile {
    pub fn scenario(&self) -> Scenario {
        Scenario::new(
            self.weights.clone(),
            self.score_threshold,
            self.locked.clone(),
        )
    }
}
