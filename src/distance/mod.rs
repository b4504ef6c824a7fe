//! Leaf-to-leaf distances of a tree and their summary statistics.
//!
//! - [DistanceMatrix]: path lengths between all pairs of leaves
//! - [LeafDistanceStats]: per-leaf aggregate distances, their mean and the
//!   mean adjusted for sequences removed as duplicates before tree building

mod matrix;
mod stats;

pub use self::matrix::DistanceMatrix;
pub use self::stats::{Aggregation, LeafDistance, LeafDistanceStats};
