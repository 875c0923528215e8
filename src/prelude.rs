//! Common imports for users of this crate.

pub use crate::config::BallTreeConfig;
pub use crate::dataset::{Dataset, TabularDataset};
pub use crate::error::{Error, Result};
pub use crate::metric::Metric;
pub use crate::number::Number;
pub use crate::{BallTree, BallTreeBuilder, QueryResult};
