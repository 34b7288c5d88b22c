//! Spiral Bucket Order

use render_core::bucket_order::*;
use render_core::geometry::*;

/// Visits buckets in square rings spiralling outward from the center of the
/// image, so the middle of the frame appears first.
#[derive(Copy, Clone, Debug, Default)]
pub struct SpiralBucketOrder;

impl BucketOrder for SpiralBucketOrder {
    /// Returns the visitation sequence as bucket indices.
    ///
    /// * `n_buckets_x` - Number of buckets in the x direction.
    /// * `n_buckets_y` - Number of buckets in the y direction.
    fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>> {
        let total = n_buckets_x * n_buckets_y;
        let mut sequence = Vec::with_capacity(total);
        if total == 0 {
            return sequence;
        }

        let (nx, ny) = (n_buckets_x as isize, n_buckets_y as isize);
        let (cx, cy) = ((nx - 1) / 2, (ny - 1) / 2);
        let mut push = |x: isize, y: isize| {
            if (0..nx).contains(&x) && (0..ny).contains(&y) {
                sequence.push(Point2::new(x as usize, y as usize));
            }
        };

        push(cx, cy);
        for r in 1..=nx.max(ny) {
            let (x0, x1, y0, y1) = (cx - r, cx + r, cy - r, cy + r);
            for x in x0..=x1 {
                push(x, y0);
            }
            for y in y0 + 1..=y1 {
                push(x1, y);
            }
            for x in (x0..x1).rev() {
                push(x, y1);
            }
            for y in (y0 + 1..y1).rev() {
                push(x0, y);
            }
        }
        sequence
    }
}
