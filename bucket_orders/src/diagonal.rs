//! Diagonal Bucket Order

use render_core::bucket_order::*;
use render_core::geometry::*;

/// Visits buckets along anti-diagonals starting from the top-left corner,
/// alternating direction on each diagonal.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiagonalBucketOrder;

impl BucketOrder for DiagonalBucketOrder {
    /// Returns the visitation sequence as bucket indices.
    ///
    /// * `n_buckets_x` - Number of buckets in the x direction.
    /// * `n_buckets_y` - Number of buckets in the y direction.
    fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>> {
        let mut sequence = Vec::with_capacity(n_buckets_x * n_buckets_y);
        if n_buckets_x == 0 || n_buckets_y == 0 {
            return sequence;
        }

        for d in 0..n_buckets_x + n_buckets_y - 1 {
            // Range of x on this diagonal, y = d - x.
            let x0 = d.saturating_sub(n_buckets_y - 1);
            let x1 = d.min(n_buckets_x - 1);
            if d % 2 == 0 {
                sequence.extend((x0..=x1).map(|x| Point2::new(x, d - x)));
            } else {
                sequence.extend((x0..=x1).rev().map(|x| Point2::new(x, d - x)));
            }
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use proptest::prelude::*;

    #[test]
    fn follows_diagonals() {
        let seq = DiagonalBucketOrder.bucket_sequence(2, 2);
        let coords: Vec<(usize, usize)> = seq.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        for w in seq.windows(2) {
            assert!(w[1].x + w[1].y >= w[0].x + w[0].y);
        }
    }

    proptest! {
        #[test]
        fn complete(nx in 1usize..40, ny in 1usize..40) {
            prop_assert!(is_complete(&DiagonalBucketOrder.bucket_sequence(nx, ny), nx, ny));
        }
    }
}
