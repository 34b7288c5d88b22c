//! Anti-aliasing Settings

use crate::common::*;
use std::fmt;

/// Smallest supported anti-aliasing depth.
pub const MIN_AA_DEPTH: Int = -4;

/// Largest supported anti-aliasing depth.
pub const MAX_AA_DEPTH: Int = 5;

/// Largest number of rays averaged into one image sample.
pub const MAX_SUPER_SAMPLING: usize = 256;

/// Default relative contrast that triggers refinement at depth 0.
pub const DEFAULT_CONTRAST_THRESHOLD: Float = 0.1;

/// Adaptive anti-aliasing range. A depth `d >= 0` means `2^d x 2^d`
/// subpixels per pixel; `d < 0` means one sample per `2^-d x 2^-d` pixel
/// block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AaSettings {
    /// Depth sampled everywhere.
    pub min_depth: Int,

    /// Depth reached in high contrast regions.
    pub max_depth: Int,

    /// Rays averaged into each image sample.
    pub super_sampling: usize,

    /// Relative contrast threshold at depth 0.
    pub contrast_threshold: Float,
}

impl Default for AaSettings {
    /// One sample per pixel, no refinement.
    fn default() -> Self {
        Self {
            min_depth: 0,
            max_depth: 0,
            super_sampling: 1,
            contrast_threshold: DEFAULT_CONTRAST_THRESHOLD,
        }
    }
}

impl AaSettings {
    /// Create clamped anti-aliasing settings. Out of range values are
    /// corrected and logged.
    ///
    /// * `min_depth`          - Requested minimum depth.
    /// * `max_depth`          - Requested maximum depth.
    /// * `super_sampling`     - Requested rays per image sample.
    /// * `contrast_threshold` - Relative contrast threshold at depth 0.
    pub fn new(min_depth: Int, max_depth: Int, super_sampling: usize, contrast_threshold: Float) -> Self {
        let min_depth = clamp_setting("Minimum AA depth", min_depth, MIN_AA_DEPTH, MAX_AA_DEPTH);
        let max_depth = clamp_setting("Maximum AA depth", max_depth, min_depth, MAX_AA_DEPTH);
        let super_sampling = clamp_setting("AA super sampling", super_sampling, 1, MAX_SUPER_SAMPLING);
        let contrast_threshold = if contrast_threshold.is_finite() && contrast_threshold >= 0.0 {
            contrast_threshold
        } else {
            warn!("Invalid contrast threshold {contrast_threshold}; using {DEFAULT_CONTRAST_THRESHOLD}");
            DEFAULT_CONTRAST_THRESHOLD
        };

        Self {
            min_depth,
            max_depth,
            super_sampling,
            contrast_threshold,
        }
    }

    /// Returns the number of subpixels along one side of a pixel.
    pub fn sub_pixel_size(&self) -> usize {
        if self.max_depth > 0 {
            pow2(self.max_depth)
        } else {
            1
        }
    }

    /// Returns the finest refinement step in subpixels.
    pub fn min_step_size(&self) -> usize {
        if self.max_depth >= 0 {
            1
        } else {
            pow2(-self.max_depth)
        }
    }

    /// Returns the coarsest refinement step in subpixels.
    pub fn max_step_size(&self) -> usize {
        if self.min_depth == self.max_depth {
            self.min_step_size()
        } else if self.min_depth > 0 {
            pow2(self.min_depth)
        } else {
            self.sub_pixel_size() << -self.min_depth
        }
    }

    /// Returns the contrast threshold used for the coarsest cells.
    pub fn threshold(&self) -> Float {
        self.contrast_threshold * (2.0 as Float).powi(self.min_depth)
    }

    /// Returns the number of subpixels of padding needed around a bucket so
    /// a filter of the given width sees every sample it overlaps.
    ///
    /// * `filter_size` - Full filter width in pixels.
    pub fn filter_padding(&self, filter_size: Float) -> usize {
        let half_size = 0.5 * filter_size;
        max(0.0, (self.sub_pixel_size() as Float * (half_size - 0.5)).ceil()) as usize
    }
}

/// Formats an anti-aliasing depth as the samples per pixel side. Negative
/// depths are shown as negative block sizes.
///
/// * `depth` - The depth.
fn depth_to_pixel_aa(depth: Int) -> Int {
    if depth < 0 {
        -(1 << -depth)
    } else {
        1 << depth
    }
}

impl fmt::Display for AaSettings {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = depth_to_pixel_aa(self.min_depth);
        let hi = depth_to_pixel_aa(self.max_depth);
        write!(f, "[{lo}x{lo}] -> [{hi}x{hi}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn clamps_depths_and_super_sampling() {
        let s = AaSettings::new(-9, 12, 0, 0.1);
        assert_eq!(s.min_depth, -4);
        assert_eq!(s.max_depth, 5);
        assert_eq!(s.super_sampling, 1);

        let s = AaSettings::new(3, 1, 1000, 0.1);
        assert_eq!(s.min_depth, 3);
        assert_eq!(s.max_depth, 3);
        assert_eq!(s.super_sampling, 256);
    }

    #[test]
    fn invalid_contrast_falls_back_to_default() {
        let s = AaSettings::new(0, 0, 1, Float::NAN);
        assert_eq!(s.contrast_threshold, DEFAULT_CONTRAST_THRESHOLD);
        let s = AaSettings::new(0, 0, 1, -1.0);
        assert_eq!(s.contrast_threshold, DEFAULT_CONTRAST_THRESHOLD);
    }

    #[test]
    fn derived_sizes_for_positive_range() {
        let s = AaSettings::new(0, 2, 1, 0.1);
        assert_eq!(s.sub_pixel_size(), 4);
        assert_eq!(s.min_step_size(), 1);
        assert_eq!(s.max_step_size(), 4);
        assert!(approx_eq!(Float, s.threshold(), 0.1, ulps = 2));
    }

    #[test]
    fn derived_sizes_for_negative_min_depth() {
        let s = AaSettings::new(-2, 1, 1, 0.1);
        assert_eq!(s.sub_pixel_size(), 2);
        assert_eq!(s.min_step_size(), 1);
        assert_eq!(s.max_step_size(), 8);
        assert!(approx_eq!(Float, s.threshold(), 0.025, ulps = 2));
    }

    #[test]
    fn derived_sizes_for_negative_range() {
        let s = AaSettings::new(-3, -1, 1, 0.1);
        assert_eq!(s.sub_pixel_size(), 1);
        assert_eq!(s.min_step_size(), 2);
        assert_eq!(s.max_step_size(), 8);
    }

    #[test]
    fn derived_sizes_for_degenerate_range() {
        let s = AaSettings::default();
        assert_eq!(s.sub_pixel_size(), 1);
        assert_eq!(s.min_step_size(), 1);
        assert_eq!(s.max_step_size(), 1);

        let s = AaSettings::new(2, 2, 1, 0.1);
        assert_eq!(s.sub_pixel_size(), 4);
        assert_eq!(s.max_step_size(), 1);
    }

    #[test]
    fn filter_padding() {
        let s = AaSettings::new(0, 2, 1, 0.1);
        assert_eq!(s.filter_padding(1.0), 0);
        assert_eq!(s.filter_padding(2.0), 2);
        assert_eq!(s.filter_padding(4.0), 6);
        assert_eq!(AaSettings::default().filter_padding(3.0), 1);
    }

    #[test]
    fn display_range() {
        assert_eq!(AaSettings::new(-2, 1, 1, 0.1).to_string(), "[-4x-4] -> [2x2]");
        assert_eq!(AaSettings::default().to_string(), "[1x1] -> [1x1]");
    }
}
