//! State keys shared by the memoizing solvers.

use oddsmith_core::{ProfileState, WeightVector, quantize::ScoreTicks};

/// Memoization key for expectation tables.
///
/// Profiles at the same level with the same set of assigned weighted
/// attributes and the same quantized score are interchangeable: which exact
/// values were rolled no longer affects any future outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    level: u8,
    filled: Vec<String>,
    score: ScoreTicks,
}

impl MemoKey {
    #[must_use]
    pub fn new(profile: &ProfileState, weights: &WeightVector) -> Self {
        Self {
            level: profile.level(),
            filled: profile
                .filled_attributes()
                .filter(|attribute| weights.contains(attribute))
                .map(str::to_owned)
                .collect(),
            score: ScoreTicks::from_score(weights.score(profile)),
        }
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn score(&self) -> ScoreTicks {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_with_equal_score_share_a_key() {
        let weights = WeightVector::new([("a", 1.0), ("b", 2.0)]);
        let p1 = ProfileState::new(10, [("a", 4.0), ("b", 1.0)]).unwrap();
        let p2 = ProfileState::new(10, [("b", 2.0), ("a", 2.0)]).unwrap();
        assert_eq!(MemoKey::new(&p1, &weights), MemoKey::new(&p2, &weights));
    }

    #[test]
    fn test_filled_set_and_level_distinguish_keys() {
        let weights = WeightVector::new([("a", 1.0), ("b", 1.0)]);
        let only_a = ProfileState::new(5, [("a", 2.0)]).unwrap();
        let only_b = ProfileState::new(5, [("b", 2.0)]).unwrap();
        let later = ProfileState::new(10, [("a", 2.0)]).unwrap();
        assert_ne!(MemoKey::new(&only_a, &weights), MemoKey::new(&only_b, &weights));
        assert_ne!(MemoKey::new(&only_a, &weights), MemoKey::new(&later, &weights));
    }

    #[test]
    fn test_unweighted_attributes_are_ignored() {
        let weights = WeightVector::new([("a", 1.0)]);
        let plain = ProfileState::new(5, [("a", 2.0)]).unwrap();
        let extra = ProfileState::new(5, [("a", 2.0), ("z", 9.0)]).unwrap();
        assert_eq!(MemoKey::new(&plain, &weights), MemoKey::new(&extra, &weights));
    }

    #[test]
    fn test_score_is_quantized() {
        let weights = WeightVector::new([("a", 1.0)]);
        let p1 = ProfileState::new(5, [("a", 2.001)]).unwrap();
        let p2 = ProfileState::new(5, [("a", 1.999)]).unwrap();
        let key = MemoKey::new(&p1, &weights);
        assert_eq!(key, MemoKey::new(&p2, &weights));
        assert_eq!(key.score(), ScoreTicks::from_score(2.0));
        assert_eq!(key.level(), 5);
    }
}
