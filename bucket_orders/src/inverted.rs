//! Inverted Bucket Order

use render_core::bucket_order::*;
use render_core::geometry::*;

/// Visits buckets in the reverse of another order.
pub struct InvertedBucketOrder {
    /// The order being reversed.
    pub order: ArcBucketOrder,
}

impl InvertedBucketOrder {
    /// Returns a new instance of `InvertedBucketOrder`.
    ///
    /// * `order` - The order to reverse.
    pub fn new(order: ArcBucketOrder) -> Self {
        Self { order }
    }
}

impl BucketOrder for InvertedBucketOrder {
    /// Returns the visitation sequence as bucket indices.
    ///
    /// * `n_buckets_x` - Number of buckets in the x direction.
    /// * `n_buckets_y` - Number of buckets in the y direction.
    fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>> {
        let mut sequence = self.order.bucket_sequence(n_buckets_x, n_buckets_y);
        sequence.reverse();
        sequence
    }
}
