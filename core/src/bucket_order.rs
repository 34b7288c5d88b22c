//! Bucket Order

use crate::geometry::*;
use std::sync::Arc;

/// Atomic reference counted `BucketOrder`.
pub type ArcBucketOrder = Arc<dyn BucketOrder + Send + Sync>;

/// Computes the order in which the buckets of the image are visited.
/// Implementations must return every bucket exactly once.
pub trait BucketOrder {
    /// Returns the visitation sequence as bucket indices.
    ///
    /// * `n_buckets_x` - Number of buckets in the x direction.
    /// * `n_buckets_y` - Number of buckets in the y direction.
    fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>>;
}
