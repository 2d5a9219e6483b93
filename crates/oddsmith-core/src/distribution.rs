//! Host-supplied roll distributions and their preprocessed form.
//!
//! The host describes each attribute with a list of possible values and
//! their probabilities ([`StatTable`]). Before any computation the table is
//! restricted to the attributes of the current [`WeightVector`]
//! ([`AttributeDistributions::preprocess`]). Preprocessing is cheap and
//! runs on every query, since host data may change between calls.

use std::collections::BTreeMap;

use oddsmith_stats::descriptive::{self, DistributionStats};
use serde::{Deserialize, Serialize};

use crate::attribute::WeightVector;

/// Lookup of an attribute's roll distribution.
///
/// Returns `(value, probability)` pairs in host order, or an empty list for
/// unknown attributes. Probabilities of one attribute are expected to sum to 1.
pub trait DistributionSource {
    fn outcomes(&self, attribute: &str) -> Vec<(f64, f64)>;
}

impl DistributionSource for BTreeMap<String, Vec<(f64, f64)>> {
    fn outcomes(&self, attribute: &str) -> Vec<(f64, f64)> {
        self.get(attribute).cloned().unwrap_or_default()
    }
}

/// One possible outcome of rolling an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub value: f64,
    pub probability: f64,
}

/// Host description of one attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeStats {
    /// Display name of the attribute.
    #[serde(default)]
    pub name: String,
    /// Free-form kind tag (e.g. `"percentage"`, `"number"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub distribution: Vec<RollOutcome>,
}

/// The host's table of attribute distributions, keyed by attribute id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatTable {
    attributes: BTreeMap<String, AttributeStats>,
}

impl StatTable {
    #[must_use]
    pub fn new(attributes: BTreeMap<String, AttributeStats>) -> Self {
        Self { attributes }
    }

    /// Builds a table from bare `(value, probability)` lists.
    #[must_use]
    pub fn from_outcomes<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<(f64, f64)>)>,
        S: Into<String>,
    {
        let attributes = entries
            .into_iter()
            .map(|(key, outcomes)| {
                let key = key.into();
                let stats = AttributeStats {
                    name: key.clone(),
                    kind: None,
                    distribution: outcomes
                        .into_iter()
                        .map(|(value, probability)| RollOutcome { value, probability })
                        .collect(),
                };
                (key, stats)
            })
            .collect();
        Self { attributes }
    }

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&AttributeStats> {
        self.attributes.get(attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeStats)> + '_ {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl DistributionSource for StatTable {
    fn outcomes(&self, attribute: &str) -> Vec<(f64, f64)> {
        self.get(attribute)
            .map(|stats| {
                stats
                    .distribution
                    .iter()
                    .map(|o| (o.value, o.probability))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Roll distributions restricted to the weighted attributes.
///
/// Every weighted attribute has an entry; attributes without host data map
/// to an empty list and can never be rolled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeDistributions {
    outcomes: BTreeMap<String, Vec<(f64, f64)>>,
}

impl AttributeDistributions {
    #[must_use]
    pub fn preprocess<D>(weights: &WeightVector, source: &D) -> Self
    where
        D: DistributionSource + ?Sized,
    {
        let outcomes = weights
            .attributes()
            .map(|attribute| (attribute.to_owned(), source.outcomes(attribute)))
            .collect();
        Self { outcomes }
    }

    /// The `(value, probability)` pairs of `attribute` (empty if never obtainable).
    #[must_use]
    pub fn outcomes(&self, attribute: &str) -> &[(f64, f64)] {
        self.outcomes
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` if `attribute` has at least one possible outcome.
    #[must_use]
    pub fn is_obtainable(&self, attribute: &str) -> bool {
        !self.outcomes(attribute).is_empty()
    }

    /// Expected rolled value of `attribute` (0.0 if never obtainable).
    #[must_use]
    pub fn mean(&self, attribute: &str) -> f64 {
        descriptive::mean_or_zero(self.outcomes(attribute))
    }

    #[must_use]
    pub fn stats(&self, attribute: &str) -> Option<DistributionStats> {
        DistributionStats::new(self.outcomes(attribute).iter().copied())
    }

    /// `ln(p)` of rolling exactly `value` for `attribute`.
    #[must_use]
    pub fn log_probability(&self, attribute: &str, value: f64) -> Option<f64> {
        descriptive::log_probability_of(self.outcomes(attribute), value)
    }
}

impl DistributionSource for AttributeDistributions {
    fn outcomes(&self, attribute: &str) -> Vec<(f64, f64)> {
        AttributeDistributions::outcomes(self, attribute).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT_JSON: &str = r#"{
        "cri_rate": {
            "name": "Crit. Rate",
            "kind": "percentage",
            "distribution": [
                {"value": 6.3, "probability": 0.25},
                {"value": 6.9, "probability": 0.75}
            ]
        },
        "hp_num": {
            "name": "HP",
            "distribution": [{"value": 320.0, "probability": 1.0}]
        }
    }"#;

    #[test]
    fn test_stat_table_from_json() {
        let table: StatTable = serde_json::from_str(STAT_JSON).unwrap();
        assert_eq!(table.outcomes("cri_rate"), vec![(6.3, 0.25), (6.9, 0.75)]);
        assert_eq!(table.get("cri_rate").unwrap().kind.as_deref(), Some("percentage"));
        assert!(table.outcomes("unknown").is_empty());
    }

    #[test]
    fn test_preprocess_restricts_to_weighted_attributes() {
        let table: StatTable = serde_json::from_str(STAT_JSON).unwrap();
        let weights = WeightVector::new([("cri_rate", 2.0), ("cri_dmg", 1.0)]);
        let dists = AttributeDistributions::preprocess(&weights, &table);

        assert_eq!(dists.outcomes("cri_rate"), &[(6.3, 0.25), (6.9, 0.75)]);
        assert!(dists.outcomes("cri_dmg").is_empty());
        assert!(!dists.is_obtainable("cri_dmg"));
        assert!(dists.outcomes("hp_num").is_empty());
    }

    #[test]
    fn test_mean_and_log_probability() {
        let table: StatTable = serde_json::from_str(STAT_JSON).unwrap();
        let weights = WeightVector::new([("cri_rate", 1.0)]);
        let dists = AttributeDistributions::preprocess(&weights, &table);

        assert!((dists.mean("cri_rate") - 6.75).abs() < 1e-12);
        assert!((dists.log_probability("cri_rate", 6.9).unwrap() - 0.75_f64.ln()).abs() < 1e-12);
        assert_eq!(dists.log_probability("cri_rate", 7.5), None);
        assert!(dists.stats("cri_rate").is_some());
        assert!(dists.stats("cri_dmg").is_none());
    }
}
