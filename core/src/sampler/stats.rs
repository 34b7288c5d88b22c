//! Sampling Statistics

use std::fmt;
use std::ops::AddAssign;

/// Counters collected while rendering; per bucket or summed over a render.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SamplingStats {
    /// Number of buckets accumulated.
    pub buckets: u64,

    /// Number of radiance oracle calls, including super samples.
    pub oracle_calls: u64,

    /// Number of image samples traced.
    pub evaluated_samples: u64,

    /// Number of image samples interpolated from cell corners.
    pub interpolated_samples: u64,

    /// Number of cells split because their corners differed.
    pub subdivisions: u64,

    /// Number of pixels whose filter weights summed to zero.
    pub zero_weight_pixels: u64,

    /// Number of radiance values that were not finite.
    pub invalid_radiance: u64,
}

impl AddAssign for SamplingStats {
    /// Accumulate another set of counters.
    ///
    /// * `other` - The counters to add.
    fn add_assign(&mut self, other: Self) {
        self.buckets += other.buckets;
        self.oracle_calls += other.oracle_calls;
        self.evaluated_samples += other.evaluated_samples;
        self.interpolated_samples += other.interpolated_samples;
        self.subdivisions += other.subdivisions;
        self.zero_weight_pixels += other.zero_weight_pixels;
        self.invalid_radiance += other.invalid_radiance;
    }
}

impl fmt::Display for SamplingStats {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.evaluated_samples + self.interpolated_samples;
        let traced_pct = if total > 0 {
            100.0 * self.evaluated_samples as f64 / total as f64
        } else {
            0.0
        };
        write!(
            f,
            "{} buckets, {} rays, {} traced / {} interpolated samples ({traced_pct:.1}% traced), {} subdivisions",
            self.buckets, self.oracle_calls, self.evaluated_samples, self.interpolated_samples, self.subdivisions
        )
    }
}
