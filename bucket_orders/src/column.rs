//! Column Bucket Order

use render_core::bucket_order::*;
use render_core::geometry::*;

/// Visits buckets column by column from the left, alternating direction on
/// every column.
#[derive(Copy, Clone, Debug, Default)]
pub struct ColumnBucketOrder;

impl BucketOrder for ColumnBucketOrder {
    /// Returns the visitation sequence as bucket indices.
    ///
    /// * `n_buckets_x` - Number of buckets in the x direction.
    /// * `n_buckets_y` - Number of buckets in the y direction.
    fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>> {
        (0..n_buckets_x * n_buckets_y)
            .map(|i| {
                let x = i / n_buckets_y;
                let y = i % n_buckets_y;
                if x % 2 == 0 {
                    Point2::new(x, y)
                } else {
                    Point2::new(x, n_buckets_y - 1 - y)
                }
            })
            .collect()
    }
}
