//! Row Bucket Order

use render_core::bucket_order::*;
use render_core::geometry::*;

/// Visits buckets row by row from the top, alternating direction on every row
/// so consecutive buckets stay adjacent.
#[derive(Copy, Clone, Debug, Default)]
pub struct RowBucketOrder;

impl BucketOrder for RowBucketOrder {
    /// Returns the visitation sequence as bucket indices.
    ///
    /// * `n_buckets_x` - Number of buckets in the x direction.
    /// * `n_buckets_y` - Number of buckets in the y direction.
    fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>> {
        (0..n_buckets_x * n_buckets_y)
            .map(|i| {
                let y = i / n_buckets_x;
                let x = i % n_buckets_x;
                if y % 2 == 0 {
                    Point2::new(x, y)
                } else {
                    Point2::new(n_buckets_x - 1 - x, y)
                }
            })
            .collect()
    }
}
