//! The `Dataset` abstraction the builder and query engine are written
//! against.
//!
//! There is exactly one production implementation, [`TabularDataset`], that
//! borrows the caller's contiguous row-major matrix.

use crate::number::Number;

/// A fixed, immutable collection of `n()` points, each of `dim()`
/// coordinates, addressable by index.
pub trait Dataset<T: Number>: Send + Sync {
    /// The number of indexed points.
    fn n(&self) -> usize;

    /// The dimensionality of every point.
    fn dim(&self) -> usize;

    /// The coordinates of the point at `i`.
    fn get(&self, i: usize) -> &[T];
}

/// A [`Dataset`] backed by a borrowed row-major matrix.
#[derive(Debug, Clone, Copy)]
pub struct TabularDataset<'a, T: Number> {
    points: &'a [T],
    n: usize,
    dim: usize,
}

impl<'a, T: Number> TabularDataset<'a, T> {
    /// Wraps `points`, a row-major `n x dim` matrix.
    ///
    /// # Panics
    ///
    /// If `points.len() != n * dim`.
    pub fn new(points: &'a [T], n: usize, dim: usize) -> Self {
        assert_eq!(points.len(), n * dim, "row-major matrix length must equal n * dim");
        Self { points, n, dim }
    }
}

impl<'a, T: Number> Dataset<T> for TabularDataset<'a, T> {
    fn n(&self) -> usize {
        self.n
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn get(&self, i: usize) -> &[T] {
        &self.points[i * self.dim..(i + 1) * self.dim]
    }
}
