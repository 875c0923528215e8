//! Distance kernels for the three metrics the index supports.

use rayon::prelude::*;

use crate::number::Number;

/// Below this many rows, pairwise-to-one distance computation runs
/// sequentially; at or above it, it runs in parallel via rayon.
const PAR_THRESHOLD: usize = 10_000;

/// One of the three distance metrics the index supports.
///
/// Constructing an index with an unrecognized name falls back to
/// [`Metric::Euclidean`] (see [`crate::BallTreeConfig::with_metric_name`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// `sqrt(sum((a_i - b_i)^2))`.
    #[default]
    Euclidean,
    /// `sum(|a_i - b_i|)`.
    Manhattan,
    /// Count of coordinates at which `a` and `b` differ, by exact equality.
    Hamming,
}

impl Metric {
    /// Resolves a metric by name, falling back to [`Metric::Euclidean`] for
    /// any name it does not recognize.
    pub fn from_name(name: &str) -> Self {
        match name {
            "manhattan" => Metric::Manhattan,
            "hamming" => Metric::Hamming,
            _ => Metric::Euclidean,
        }
    }

    /// The metric's canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Manhattan => "manhattan",
            Metric::Hamming => "hamming",
        }
    }

    /// Pointwise distance between two vectors of equal length.
    pub fn one_to_one<T: Number>(&self, a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        match self {
            Metric::Euclidean => {
                let sum_sq: T = a.iter().zip(b).map(|(&x, &y)| (x - y) * (x - y)).sum();
                sum_sq.sqrt()
            }
            Metric::Manhattan => a.iter().zip(b).map(|(&x, &y)| (x - y).abs()).sum(),
            Metric::Hamming => {
                let count = a.iter().zip(b).filter(|&(&x, &y)| x != y).count();
                T::from_usize(count).unwrap_or_else(T::zero)
            }
        }
    }

    /// Distance from `a` to every row of `bs`. Runs in parallel once the
    /// batch is large enough to be worth it.
    pub fn one_to_many<T: Number>(&self, a: &[T], bs: &[&[T]]) -> Vec<T> {
        if bs.len() < PAR_THRESHOLD {
            bs.iter().map(|&b| self.one_to_one(a, b)).collect()
        } else {
            bs.par_iter().map(|&b| self.one_to_one(a, b)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::Metric;

    #[test]
    fn euclidean() {
        let a = [1.0_f64, 2.0, 3.0];
        let b = [3.0_f64, 3.0, 1.0];
        assert!(approx_eq!(f64, Metric::Euclidean.one_to_one(&a, &a), 0.0));
        assert!(approx_eq!(f64, Metric::Euclidean.one_to_one(&a, &b), 3.0));
    }

    #[test]
    fn manhattan() {
        let a = [1.0_f64, 2.0, 3.0];
        let b = [3.0_f64, 3.0, 1.0];
        assert!(approx_eq!(f64, Metric::Manhattan.one_to_one(&a, &b), 5.0));
    }

    #[test]
    fn hamming() {
        let a = [1.0_f64, 0.0, 0.0];
        let b = [1.0_f64, 1.0, 0.0];
        assert!(approx_eq!(f64, Metric::Hamming.one_to_one(&a, &b), 1.0));
        assert!(approx_eq!(f64, Metric::Hamming.one_to_one(&a, &a), 0.0));
    }

    #[test]
    fn from_name_falls_back_to_euclidean() {
        assert_eq!(Metric::from_name("manhattan"), Metric::Manhattan);
        assert_eq!(Metric::from_name("hamming"), Metric::Hamming);
        assert_eq!(Metric::from_name("euclidean"), Metric::Euclidean);
        assert_eq!(Metric::from_name("minkowski"), Metric::Euclidean);
    }

    #[test]
    fn one_to_many_matches_one_to_one() {
        let a = [0.0_f64, 0.0];
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![3.0, 4.0]];
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let got = Metric::Euclidean.one_to_many(&a, &refs);
        let want: Vec<f64> = refs.iter().map(|b| Metric::Euclidean.one_to_one(&a, b)).collect();
        assert_eq!(got, want);
    }
}
