//! Typed errors for the index's public surface.
//!
//! A query-before-build condition is not represented here: it is ruled out
//! by the builder/built typestate split in `lib.rs` instead.

use thiserror::Error as ThisError;

/// Everything that can go wrong when constructing or querying a [`crate::BallTree`].
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum Error {
    /// A query vector's dimensionality does not match the indexed set's.
    #[error("query dimensionality {found} does not match indexed dimensionality {expected}")]
    ShapeMismatch {
        /// The dimensionality the index was built with.
        expected: usize,
        /// The dimensionality of the offending query.
        found: usize,
    },

    /// `k` was zero, or larger than the number of indexed points.
    #[error("invalid k = {k} for a dataset of {n} points (must be 1 <= k <= n)")]
    InvalidK {
        /// The requested number of neighbors.
        k: usize,
        /// The number of indexed points.
        n: usize,
    },

    /// Construction was attempted over zero points.
    #[error("cannot build an index over an empty dataset")]
    EmptyDataset,
}

/// Shorthand for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
