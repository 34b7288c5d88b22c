//! Hilbert Bucket Order

use render_core::bucket_order::*;
use render_core::geometry::*;

/// Visits buckets along a Hilbert curve covering the smallest power of two
/// square that contains the grid. Curve cells outside the grid are skipped.
#[derive(Copy, Clone, Debug, Default)]
pub struct HilbertBucketOrder;

impl BucketOrder for HilbertBucketOrder {
    /// Returns the visitation sequence as bucket indices.
    ///
    /// * `n_buckets_x` - Number of buckets in the x direction.
    /// * `n_buckets_y` - Number of buckets in the y direction.
    fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>> {
        let n = n_buckets_x.max(n_buckets_y).next_power_of_two();
        (0..n * n)
            .map(|d| hilbert_d2xy(n, d))
            .filter(|p| p.x < n_buckets_x && p.y < n_buckets_y)
            .collect()
    }
}

/// Maps a distance along the Hilbert curve to a cell of an `n x n` grid.
///
/// * `n` - Side of the grid; a power of 2.
/// * `d` - Distance along the curve in `[0, n * n)`.
pub fn hilbert_d2xy(n: usize, d: usize) -> Point2<usize> {
    let (mut x, mut y) = (0, 0);
    let mut t = d;
    let mut s = 1;
    while s < n {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    Point2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use proptest::prelude::*;

    #[test]
    fn consecutive_cells_are_adjacent() {
        let seq = HilbertBucketOrder.bucket_sequence(8, 8);
        assert_eq!((seq[0].x, seq[0].y), (0, 0));
        for w in seq.windows(2) {
            assert_eq!(w[0].x.abs_diff(w[1].x) + w[0].y.abs_diff(w[1].y), 1);
        }
    }

    proptest! {
        #[test]
        fn complete(nx in 1usize..40, ny in 1usize..40) {
            prop_assert!(is_complete(&HilbertBucketOrder.bucket_sequence(nx, ny), nx, ny));
        }
    }
}
