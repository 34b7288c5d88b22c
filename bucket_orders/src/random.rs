//! Random Bucket Order

use render_core::bucket_order::*;
use render_core::geometry::*;
use render_core::rng::*;

/// Visits buckets in a shuffled order. The shuffle is seeded so the same grid
/// always produces the same sequence.
#[derive(Copy, Clone, Debug)]
pub struct RandomBucketOrder {
    /// Seed for the shuffle.
    pub seed: u64,
}

impl RandomBucketOrder {
    /// Seed used by `Default`.
    pub const DEFAULT_SEED: u64 = 2463534242;

    /// Returns a new instance of `RandomBucketOrder`.
    ///
    /// * `seed` - Seed for the shuffle.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for RandomBucketOrder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl BucketOrder for RandomBucketOrder {
    /// Returns the visitation sequence as bucket indices.
    ///
    /// * `n_buckets_x` - Number of buckets in the x direction.
    /// * `n_buckets_y` - Number of buckets in the y direction.
    fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>> {
        let mut sequence: Vec<Point2<usize>> = (0..n_buckets_x * n_buckets_y)
            .map(|i| Point2::new(i % n_buckets_x, i / n_buckets_x))
            .collect();
        RNG::new(self.seed).shuffle(&mut sequence);
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use proptest::prelude::*;

    #[test]
    fn reproducible() {
        let a = RandomBucketOrder::default().bucket_sequence(7, 5);
        let b = RandomBucketOrder::default().bucket_sequence(7, 5);
        assert!(a.iter().zip(b.iter()).all(|(p, q)| p.x == q.x && p.y == q.y));

        let c = RandomBucketOrder::new(7).bucket_sequence(7, 5);
        assert!(a.iter().zip(c.iter()).any(|(p, q)| p.x != q.x || p.y != q.y));
    }

    proptest! {
        #[test]
        fn complete(nx in 1usize..40, ny in 1usize..40, seed in 0u64..1000) {
            prop_assert!(is_complete(&RandomBucketOrder::new(seed).bucket_sequence(nx, ny), nx, ny));
        }
    }
}
