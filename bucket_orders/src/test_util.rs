//! Helpers shared by the order tests.

use render_core::geometry::*;
use std::collections::HashSet;

/// Returns true if `sequence` visits every bucket of the grid exactly once.
///
/// * `sequence`    - Visitation sequence.
/// * `n_buckets_x` - Number of buckets in the x direction.
/// * `n_buckets_y` - Number of buckets in the y direction.
pub fn is_complete(sequence: &[Point2<usize>], n_buckets_x: usize, n_buckets_y: usize) -> bool {
    let unique: HashSet<(usize, usize)> = sequence.iter().map(|p| (p.x, p.y)).collect();
    sequence.len() == n_buckets_x * n_buckets_y
        && unique.len() == sequence.len()
        && sequence.iter().all(|p| p.x < n_buckets_x && p.y < n_buckets_y)
}
