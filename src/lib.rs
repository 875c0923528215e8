//! A ball-tree nearest-neighbor index over Euclidean, Manhattan, and
//! Hamming metrics.
//!
//! Construction recursively partitions a point set into nested balls by a
//! median split of a one-dimensional projection (the `tree` module);
//! queries descend the resulting flat tree with a fixed-capacity max-heap
//! per row, pruning subtrees the triangle inequality rules out (the `query`
//! module).
//!
//! ```
//! use balltree::{BallTreeBuilder, BallTreeConfig, Metric};
//!
//! let points = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 10.0, 10.0];
//! let config = BallTreeConfig::new(2).with_metric(Metric::Euclidean).with_seed(0);
//! let tree = BallTreeBuilder::new(&points, 5, 2, config).unwrap().build();
//!
//! let queries = [0.0, 0.0];
//! let result = tree.query(&queries, 2, 3).unwrap();
//! let mut nearest = result.idx.clone();
//! nearest.sort_unstable();
//! assert_eq!(nearest, vec![0, 1, 2]);
//! ```

mod config;
mod constants;
mod dataset;
mod error;
mod heap;
pub mod helpers;
mod metric;
mod number;
pub mod prelude;
mod query;
mod tree;

pub use config::BallTreeConfig;
pub use dataset::{Dataset, TabularDataset};
pub use error::{Error, Result};
pub use metric::Metric;
pub use number::Number;

use rayon::prelude::*;

use tree::TreeArrays;

/// Borrows a caller's points and config; [`BallTreeBuilder::build`] consumes
/// it and produces a queryable [`BallTree`].
///
/// Splitting construction into a "borrow + configure" stage and a "built"
/// stage, rather than one `BallTree::new` that does both, makes querying
/// before a build completes a type error instead of a runtime check: there
/// is simply no `query` method on this type.
pub struct BallTreeBuilder<'a, T: Number> {
    points: &'a [T],
    n: usize,
    dim: usize,
    config: BallTreeConfig,
}

impl<'a, T: Number> BallTreeBuilder<'a, T> {
    /// `points` must be a row-major `n x dim` matrix.
    ///
    /// Fails with [`Error::EmptyDataset`] if `n == 0`. NaN/non-finite
    /// coordinates are not rejected; they propagate into distances and
    /// degrade pruning toward a linear scan rather than being sanitized
    /// here.
    ///
    /// # Panics
    ///
    /// If `points.len() != n * dim`.
    pub fn new(points: &'a [T], n: usize, dim: usize, config: BallTreeConfig) -> Result<Self> {
        if n == 0 {
            return Err(Error::EmptyDataset);
        }
        assert_eq!(points.len(), n * dim, "points must have length n * dim");
        Ok(Self { points, n, dim, config })
    }

    /// Builds the tree, consuming the builder.
    pub fn build(self) -> BallTree<'a, T> {
        let data = TabularDataset::new(self.points, self.n, self.dim);
        log::debug!(
            "building ball tree: {} points, dim {}, leaf_size {}, metric {}",
            self.n,
            self.dim,
            self.config.leaf_size(),
            self.config.metric().name(),
        );
        let arrays = tree::build(&data, self.config.metric(), self.config.leaf_size(), self.config.seed());
        BallTree { data, metric: self.config.metric(), arrays }
    }
}

/// A built, read-only ball-tree index.
///
/// There is no mutation surface once a `BallTree` exists: the index is
/// immutable for its lifetime, with no incremental insert or delete.
pub struct BallTree<'a, T: Number> {
    data: TabularDataset<'a, T>,
    metric: Metric,
    arrays: TreeArrays<T>,
}

/// The result of a query call: for each of `Q` rows, up to `k`
/// `(index, distance)` pairs in heap order. `dist[row * k]` is the largest
/// of that row's k best.
pub struct QueryResult<T: Number> {
    /// Dataset indices, flattened row-major `Q x k`.
    pub idx: Vec<usize>,
    /// Distances, flattened row-major `Q x k`, in the same heap order as `idx`.
    pub dist: Vec<T>,
}

impl<'a, T: Number> BallTree<'a, T> {
    /// The number of indexed points.
    pub fn len(&self) -> usize {
        self.data.n()
    }

    /// Whether the index holds zero points. Always `false`: construction
    /// rejects an empty dataset.
    pub fn is_empty(&self) -> bool {
        self.data.n() == 0
    }

    /// The dimensionality of indexed points.
    pub fn dim(&self) -> usize {
        self.data.dim()
    }

    /// The tree's height, `ceil(log2(n / leaf_size)) + 1`.
    pub fn height(&self) -> usize {
        self.arrays.height
    }

    /// The configured leaf size.
    pub fn leaf_size(&self) -> usize {
        self.arrays.leaf_size
    }

    /// The configured distance metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    fn check_query(&self, q_dim: usize, k: usize) -> Result<()> {
        if q_dim != self.dim() {
            return Err(Error::ShapeMismatch { expected: self.dim(), found: q_dim });
        }
        if k == 0 || k > self.len() {
            return Err(Error::InvalidK { k, n: self.len() });
        }
        Ok(())
    }

    /// Finds the `k` nearest indexed points to each row of `queries`, a
    /// row-major `Q x dim` matrix. Processes rows sequentially; see
    /// [`BallTree::par_query`] for the rayon-parallel variant.
    pub fn query(&self, queries: &[T], q_dim: usize, k: usize) -> Result<QueryResult<T>> {
        self.check_query(q_dim, k)?;
        let q = queries.len() / q_dim;
        let mut dist = vec![T::infinity(); q * k];
        let mut idx = vec![0usize; q * k];

        for row in 0..q {
            let query_row = &queries[row * q_dim..(row + 1) * q_dim];
            query::query_one(
                &self.data,
                self.metric,
                &self.arrays.nodes,
                &self.arrays.perm,
                query_row,
                &mut dist[row * k..(row + 1) * k],
                &mut idx[row * k..(row + 1) * k],
            );
        }

        Ok(QueryResult { idx, dist })
    }

    /// Same as [`BallTree::query`], but processes rows in parallel with
    /// rayon. Rows write to disjoint `dist`/`idx` slices and only read
    /// shared, immutable tree arrays, so no extra synchronization is needed
    /// beyond that independence.
    pub fn par_query(&self, queries: &[T], q_dim: usize, k: usize) -> Result<QueryResult<T>> {
        self.check_query(q_dim, k)?;
        let q = queries.len() / q_dim;
        let mut dist = vec![T::infinity(); q * k];
        let mut idx = vec![0usize; q * k];

        dist.par_chunks_mut(k).zip(idx.par_chunks_mut(k)).enumerate().for_each(|(row, (dist_row, idx_row))| {
            let query_row = &queries[row * q_dim..(row + 1) * q_dim];
            query::query_one(&self.data, self.metric, &self.arrays.nodes, &self.arrays.perm, query_row, dist_row, idx_row);
        });

        Ok(QueryResult { idx, dist })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(rows: &[[f64; 2]]) -> Vec<f64> {
        rows.iter().flatten().cloned().collect()
    }

    #[test]
    fn rejects_empty_dataset() {
        let points: [f64; 0] = [];
        let config = BallTreeConfig::new(4);
        let err = BallTreeBuilder::new(&points, 0, 2, config).unwrap_err();
        assert_eq!(err, Error::EmptyDataset);
    }

    #[test]
    fn rejects_shape_mismatch_at_query() {
        let points = flat(&[[0.0, 0.0], [1.0, 1.0]]);
        let config = BallTreeConfig::new(2).with_seed(0);
        let tree = BallTreeBuilder::new(&points, 2, 2, config).unwrap().build();

        let bad_query = [0.0, 0.0, 0.0];
        let err = tree.query(&bad_query, 3, 1).unwrap_err();
        assert_eq!(err, Error::ShapeMismatch { expected: 2, found: 3 });
    }

    #[test]
    fn rejects_invalid_k() {
        let points = flat(&[[0.0, 0.0], [1.0, 1.0]]);
        let config = BallTreeConfig::new(2).with_seed(0);
        let tree = BallTreeBuilder::new(&points, 2, 2, config).unwrap().build();

        assert_eq!(tree.query(&[0.0, 0.0], 2, 0).unwrap_err(), Error::InvalidK { k: 0, n: 2 });
        assert_eq!(tree.query(&[0.0, 0.0], 2, 3).unwrap_err(), Error::InvalidK { k: 3, n: 2 });
    }

    #[test]
    fn query_and_par_query_agree() {
        let rows: Vec<[f64; 2]> =
            (0..64).map(|i| [(i % 8) as f64, (i / 8) as f64]).collect();
        let points = flat(&rows);
        let config = BallTreeConfig::new(4).with_seed(11);
        let tree = BallTreeBuilder::new(&points, rows.len(), 2, config).unwrap().build();

        let queries = flat(&[[3.0, 3.0], [0.0, 0.0]]);
        let sequential = tree.query(&queries, 2, 5).unwrap();
        let parallel = tree.par_query(&queries, 2, 5).unwrap();

        for row in 0..2 {
            let mut seq_idx = sequential.idx[row * 5..(row + 1) * 5].to_vec();
            let mut par_idx = parallel.idx[row * 5..(row + 1) * 5].to_vec();
            seq_idx.sort_unstable();
            par_idx.sort_unstable();
            assert_eq!(seq_idx, par_idx);
        }
    }
}
