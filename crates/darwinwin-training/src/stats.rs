/// Summary of the fitness scores of a population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: u64,
    pub std_dev: f64,
}

impl FitnessStats {
    /// Computes statistics from unsorted scores.
    ///
    /// Returns `None` if there are no scores.
    ///
    /// ```
    /// # use darwinwin_training::stats::FitnessStats;
    /// let stats = FitnessStats::new([5, 2, 4, 1, 3]).unwrap();
    /// assert_eq!(stats.min, 1);
    /// assert_eq!(stats.max, 5);
    /// assert_eq!(stats.median, 3);
    /// assert!((stats.mean - 3.0).abs() < f64::EPSILON);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut scores = scores.into_iter().collect::<Vec<_>>();
        scores.sort_unstable();

        let min = *scores.first()?;
        let max = *scores.last()?;
        let count = scores.len();
        let n = count as f64;
        let mean = scores.iter().map(|s| *s as f64).sum::<f64>() / n;
        let median = scores[count / 2];
        let variance = scores
            .iter()
            .map(|s| (*s as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
