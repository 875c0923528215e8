//! Construction-time configuration.

use crate::metric::Metric;

/// Configuration for [`crate::BallTreeBuilder`].
#[derive(Debug, Clone)]
pub struct BallTreeConfig {
    leaf_size: usize,
    metric: Metric,
    seed: Option<u64>,
}

impl BallTreeConfig {
    /// `leaf_size` is the maximum number of points stored in any leaf. The
    /// metric defaults to [`Metric::Euclidean`] and the pivot RNG defaults
    /// to an unseeded, process-level source.
    ///
    /// # Panics
    ///
    /// If `leaf_size == 0`.
    pub fn new(leaf_size: usize) -> Self {
        assert!(leaf_size > 0, "leaf_size must be positive");
        Self { leaf_size, metric: Metric::Euclidean, seed: None }
    }

    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Resolves and sets the distance metric by name, falling back to
    /// [`Metric::Euclidean`] for an unrecognized name.
    pub fn with_metric_name(mut self, name: &str) -> Self {
        self.metric = Metric::from_name(name);
        self
    }

    /// Seeds the RNG used to choose the random pivot in tree construction,
    /// for reproducible builds.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured leaf size.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// The configured metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// The configured RNG seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::BallTreeConfig;
    use crate::metric::Metric;

    #[test]
    fn defaults_to_euclidean_and_unseeded() {
        let config = BallTreeConfig::new(10);
        assert_eq!(config.leaf_size(), 10);
        assert_eq!(config.metric(), Metric::Euclidean);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn fluent_overrides_apply() {
        let config = BallTreeConfig::new(5).with_metric_name("hamming").with_seed(42);
        assert_eq!(config.metric(), Metric::Hamming);
        assert_eq!(config.seed(), Some(42));
    }

    #[test]
    #[should_panic(expected = "leaf_size must be positive")]
    fn rejects_zero_leaf_size() {
        let _ = BallTreeConfig::new(0);
    }
}
