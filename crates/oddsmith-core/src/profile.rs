//! Partially upgraded profiles.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    ProfileValidationError,
    attribute::LockedKeys,
    distribution::DistributionSource,
    quantize::{self, ZERO_EPSILON},
};

/// Highest level a profile can reach.
pub const MAX_LEVEL: u8 = 25;

/// Levels gained by a single level-up.
pub const LEVEL_STEP: u8 = 5;

/// Number of level-ups from an empty profile to [`MAX_LEVEL`].
pub const LEVEL_UP_COUNT: usize = (MAX_LEVEL / LEVEL_STEP) as usize;

/// A profile at some level with the attribute values rolled so far.
///
/// A value of 0 (or an absent attribute) means the attribute is unassigned.
/// Profiles are never mutated in place by the solvers; every branch derives
/// its own copy through [`with_roll`](Self::with_roll) or
/// [`advanced`](Self::advanced).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileState {
    level: u8,
    values: BTreeMap<String, f64>,
}

impl ProfileState {
    /// Creates a profile, checking that `level` is a multiple of 5 in `0..=25`.
    pub fn new<I, S>(level: u8, values: I) -> Result<Self, ProfileValidationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        if !is_valid_level(level) {
            return Err(ProfileValidationError::InvalidLevel { level });
        }
        Ok(Self {
            level,
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    /// The level-0 profile with nothing assigned.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Index of the five-level band the profile is in (0 for levels 0-4).
    #[must_use]
    pub fn band(&self) -> usize {
        usize::from(self.level / LEVEL_STEP)
    }

    /// Number of level-ups left before [`MAX_LEVEL`].
    #[must_use]
    pub fn remaining_level_ups(&self) -> usize {
        usize::from((MAX_LEVEL - self.level) / LEVEL_STEP)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.level >= MAX_LEVEL
    }

    /// Returns the value of `attribute`, or 0.0 if unassigned.
    #[must_use]
    pub fn value(&self, attribute: &str) -> f64 {
        self.values.get(attribute).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn is_filled(&self, attribute: &str) -> bool {
        quantize::is_nonzero(self.value(attribute))
    }

    /// Names of assigned attributes, in name order.
    pub fn filled_attributes(&self) -> impl Iterator<Item = &str> + '_ {
        self.values()
            .filter(|(_, v)| quantize::is_nonzero(*v))
            .map(|(k, _)| k)
    }

    /// Returns `true` if every locked attribute is assigned.
    #[must_use]
    pub fn satisfies(&self, locked: &LockedKeys) -> bool {
        locked.iter().all(|key| self.is_filled(key))
    }

    /// The profile after one level-up that rolled `value` for `attribute`.
    #[must_use]
    pub fn with_roll(&self, attribute: &str, value: f64) -> Self {
        let mut next = self.advanced();
        next.values.insert(attribute.to_owned(), value);
        next
    }

    /// The profile after one level-up that did not touch any tracked attribute.
    #[must_use]
    pub fn advanced(&self) -> Self {
        debug_assert!(!self.is_complete(), "cannot level up a complete profile");
        Self {
            level: self.level + LEVEL_STEP,
            values: self.values.clone(),
        }
    }

    /// Checks the profile against the host's roll distributions.
    ///
    /// A consistent profile has exactly one assigned attribute per level-up
    /// taken, and each assigned value is a possible outcome of its attribute.
    pub fn validate<D>(&self, source: &D) -> Result<(), ProfileValidationError>
    where
        D: DistributionSource + ?Sized,
    {
        if !is_valid_level(self.level) {
            return Err(ProfileValidationError::InvalidLevel { level: self.level });
        }

        let filled = self.filled_attributes().count();
        let expected = self.band();
        if filled != expected {
            return Err(ProfileValidationError::FilledCountMismatch { filled, expected });
        }

        for (attribute, value) in self.values().filter(|(_, v)| quantize::is_nonzero(*v)) {
            let known = source
                .outcomes(attribute)
                .iter()
                .any(|(v, _)| (v - value).abs() < ZERO_EPSILON);
            if !known {
                return Err(ProfileValidationError::UnknownValue {
                    attribute: attribute.to_owned(),
                    value,
                });
            }
        }

        Ok(())
    }
}

fn is_valid_level(level: u8) -> bool {
    level <= MAX_LEVEL && level % LEVEL_STEP == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::StatTable;

    fn stat_table() -> StatTable {
        StatTable::from_outcomes([
            ("cri_rate", vec![(6.3, 0.5), (8.1, 0.5)]),
            ("cri_dmg", vec![(12.6, 0.5), (16.2, 0.5)]),
        ])
    }

    #[test]
    fn test_new_rejects_invalid_levels() {
        assert!(ProfileState::new(7, [("a", 1.0)]).is_err());
        assert!(ProfileState::new(30, [("a", 1.0)]).is_err());
        assert!(ProfileState::new(25, [("a", 1.0)]).is_ok());
    }

    #[test]
    fn test_level_bookkeeping() {
        let profile = ProfileState::new(10, [("a", 1.0), ("b", 2.0)]).unwrap();
        assert_eq!(profile.band(), 2);
        assert_eq!(profile.remaining_level_ups(), 3);
        assert!(!profile.is_complete());
        assert_eq!(ProfileState::empty().remaining_level_ups(), LEVEL_UP_COUNT);
    }

    #[test]
    fn test_with_roll_leaves_parent_untouched() {
        let parent = ProfileState::new(5, [("a", 1.0)]).unwrap();
        let child = parent.with_roll("b", 3.0);
        assert_eq!(parent.level(), 5);
        assert_eq!(parent.value("b"), 0.0);
        assert_eq!(child.level(), 10);
        assert_eq!(child.value("a"), 1.0);
        assert_eq!(child.value("b"), 3.0);
    }

    #[test]
    fn test_filled_attributes_skip_zero_values() {
        let profile = ProfileState::new(10, [("b", 2.0), ("a", 0.0), ("c", 1.0)]).unwrap();
        assert_eq!(profile.filled_attributes().collect::<Vec<_>>(), ["b", "c"]);
        assert!(profile.satisfies(&LockedKeys::new(["b"])));
        assert!(!profile.satisfies(&LockedKeys::new(["a", "b"])));
    }

    mod validate {
        use super::*;

        #[test]
        fn test_valid_profile() {
            let profile = ProfileState::new(10, [("cri_rate", 8.1), ("cri_dmg", 12.6)]).unwrap();
            assert!(profile.validate(&stat_table()).is_ok());
        }

        #[test]
        fn test_filled_count_mismatch() {
            let profile = ProfileState::new(10, [("cri_rate", 8.1)]).unwrap();
            assert!(matches!(
                profile.validate(&stat_table()),
                Err(ProfileValidationError::FilledCountMismatch {
                    filled: 1,
                    expected: 2
                })
            ));
        }

        #[test]
        fn test_unknown_value() {
            let profile = ProfileState::new(5, [("cri_rate", 7.0)]).unwrap();
            let err = profile.validate(&stat_table()).unwrap_err();
            assert!(matches!(err, ProfileValidationError::UnknownValue { .. }));
            assert!(err.to_string().contains("cri_rate"));
        }
    }
}
