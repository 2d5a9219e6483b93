//! Attribute weights and locked attributes.

use std::{
    collections::{BTreeMap, BTreeSet},
    hash::{Hash, Hasher},
    ops::Add,
};

use serde::{Deserialize, Serialize};

use crate::{
    profile::ProfileState,
    quantize::{self, WEIGHT_SCALE},
};

/// Per-attribute score weights.
///
/// Attributes are kept in name order so every traversal (scoring, DP
/// attribute order, example expansion) is deterministic.
///
/// Two weight vectors are equal when they name the same attributes and
/// every weight agrees after rounding to one decimal. Hashing uses the same
/// rounding, so near-identical configurations share cache entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector {
    weights: BTreeMap<String, f64>,
}

impl WeightVector {
    #[must_use]
    pub fn new<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            weights: weights.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Returns the weight of `attribute`, or 0.0 if it is not weighted.
    #[must_use]
    pub fn get(&self, attribute: &str) -> f64 {
        self.weights.get(attribute).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.weights.contains_key(attribute)
    }

    /// Returns `true` if `attribute` has a non-zero weight.
    #[must_use]
    pub fn is_effective(&self, attribute: &str) -> bool {
        quantize::is_nonzero(self.get(attribute))
    }

    /// Number of attributes in the vector, including zero-weighted ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> + '_ {
        self.weights.keys().map(String::as_str)
    }

    /// Weighted sum of the profile's attribute values.
    ///
    /// Unassigned attributes contribute 0; attributes of the profile that
    /// are not weighted are ignored.
    #[must_use]
    pub fn score(&self, profile: &ProfileState) -> f64 {
        self.iter()
            .map(|(attribute, weight)| weight * profile.value(attribute))
            .sum()
    }

    fn canonical_entries(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.iter()
            .map(|(k, v)| (k, quantize::canonical(v, WEIGHT_SCALE)))
    }
}

impl PartialEq for WeightVector {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.canonical_entries().eq(other.canonical_entries())
    }
}

impl Eq for WeightVector {}

impl Hash for WeightVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for entry in self.canonical_entries() {
            entry.hash(state);
        }
    }
}

impl<S> FromIterator<(S, f64)> for WeightVector
where
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl Add for &WeightVector {
    type Output = WeightVector;

    fn add(self, rhs: Self) -> WeightVector {
        let mut weights = self.weights.clone();
        for (attribute, weight) in rhs.iter() {
            *weights.entry(attribute.to_owned()).or_default() += weight;
        }
        WeightVector { weights }
    }
}

/// Attributes that must all be assigned for an outcome to count as a success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockedKeys {
    keys: BTreeSet<String>,
}

impl LockedKeys {
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.keys.contains(attribute)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }
}

impl<S> FromIterator<S> for LockedKeys
where
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
