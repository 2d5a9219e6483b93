/// Values closer than this are considered the same outcome.
pub const VALUE_EPSILON: f64 = 1e-5;

/// Descriptive statistics summarizing a discrete distribution.
///
/// The distribution is given as `(value, probability)` pairs. Probabilities
/// are expected to sum to 1.0, but the statistics are computed relative to
/// [`total_probability`](Self::total_probability) so slightly unnormalized
/// host data still yields a meaningful mean.
#[derive(Debug, Clone)]
pub struct DistributionStats {
    /// The smallest value with non-zero probability.
    pub min: f64,
    /// The largest value with non-zero probability.
    pub max: f64,
    /// The probability-weighted mean.
    pub mean: f64,
    /// The probability-weighted variance.
    pub variance: f64,
    /// The standard deviation of the distribution.
    pub std_dev: f64,
    /// Sum of all probabilities in the input.
    pub total_probability: f64,
}

impl DistributionStats {
    /// Computes descriptive statistics from `(value, probability)` pairs.
    ///
    /// Outcomes with zero probability are ignored for `min`/`max`.
    ///
    /// # Returns
    ///
    /// * `Some(DistributionStats)` - if the total probability is positive
    /// * `None` - if the distribution is empty or carries no probability mass
    ///
    /// # Examples
    ///
    /// ```
    /// # use oddsmith_stats::descriptive::DistributionStats;
    /// let stats = DistributionStats::new([(4.0, 0.5), (8.0, 0.5)]).unwrap();
    /// assert_eq!(stats.mean, 6.0);
    /// assert_eq!(stats.variance, 4.0);
    /// assert_eq!(stats.std_dev, 2.0);
    ///
    /// assert!(DistributionStats::new([]).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(outcomes: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let outcomes = outcomes
            .into_iter()
            .filter(|(_, p)| *p > 0.0)
            .collect::<Vec<_>>();

        let total_probability = outcomes.iter().map(|(_, p)| p).sum::<f64>();
        if total_probability <= 0.0 {
            return None;
        }

        let min = outcomes
            .iter()
            .map(|(v, _)| *v)
            .fold(f64::INFINITY, f64::min);
        let max = outcomes
            .iter()
            .map(|(v, _)| *v)
            .fold(f64::NEG_INFINITY, f64::max);
        let mean = outcomes.iter().map(|(v, p)| v * p).sum::<f64>() / total_probability;
        let variance = outcomes
            .iter()
            .map(|(v, p)| (v - mean).powi(2) * p)
            .sum::<f64>()
            / total_probability;

        Some(Self {
            min,
            max,
            mean,
            variance,
            std_dev: variance.sqrt(),
            total_probability,
        })
    }
}

/// Returns the expected value of a discrete distribution, or 0.0 if it is empty.
#[must_use]
pub fn mean_or_zero(outcomes: &[(f64, f64)]) -> f64 {
    outcomes.iter().map(|(v, p)| v * p).sum()
}

/// Returns `ln(p)` of the first outcome whose value matches `value`.
///
/// Returns `None` if no outcome matches within [`VALUE_EPSILON`].
#[must_use]
pub fn log_probability_of(outcomes: &[(f64, f64)], value: f64) -> Option<f64> {
    outcomes
        .iter()
        .find(|(v, _)| (v - value).abs() < VALUE_EPSILON)
        .map(|(_, p)| p.ln())
}
