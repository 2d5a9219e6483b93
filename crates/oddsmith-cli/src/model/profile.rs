use std::collections::BTreeMap;

use oddsmith_core::{DistributionSource, ProfileState};
use serde::{Deserialize, Serialize};

/// A profile as stored on disk: `{ "level": 10, "values": { "a": 6.3 } }`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileFile {
    pub level: u8,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl ProfileFile {
    /// Builds the profile and checks it against the host distributions.
    pub fn to_profile<D>(&self, source: &D) -> anyhow::Result<ProfileState>
    where
        D: DistributionSource + ?Sized,
    {
        let profile = ProfileState::new(
            self.level,
            self.values.iter().map(|(k, v)| (k.as_str(), *v)),
        )?;
        profile.validate(source)?;
        Ok(profile)
    }
}
