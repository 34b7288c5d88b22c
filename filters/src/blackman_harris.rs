//! Blackman-Harris Filter

use render_core::common::*;
use render_core::filter::*;
use render_core::geometry::*;

const A0: Float = 0.35875;
const A1: Float = -0.48829;
const A2: Float = 0.14128;
const A3: Float = -0.01168;

/// Implements the 4-term Blackman-Harris window as a reconstruction filter.
pub struct BlackmanHarrisFilter {
    /// Filter data.
    pub data: FilterData,
}

impl BlackmanHarrisFilter {
    /// Default width in pixels.
    pub const DEFAULT_SIZE: Float = 4.0;

    /// Returns a new instance of `BlackmanHarrisFilter`.
    ///
    /// * `size` - Width of the filter in pixels.
    pub fn new(size: Float) -> Self {
        Self {
            data: FilterData::new(size),
        }
    }
}

impl Default for BlackmanHarrisFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

/// Evaluates the window over [-1, 1].
///
/// * `x` - Normalized distance from the center.
fn blackman_harris_1d(x: Float) -> Float {
    if !(-1.0..=1.0).contains(&x) {
        return 0.0;
    }
    let t = 2.0 * PI * (x + 1.0) * 0.5;
    A0 + A1 * t.cos() + A2 * (2.0 * t).cos() + A3 * (3.0 * t).cos()
}

impl Filter for BlackmanHarrisFilter {
    /// Return the filter parameters.
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    /// Returns value of the filter at a given point.
    ///
    /// * `p` - The position of the sample point relative to the center of the
    ///         filter. The point should be within the filter's extent.
    fn evaluate(&self, p: &Point2f) -> Float {
        let inv = self.data.inv_half_size;
        blackman_harris_1d(p.x * inv) * blackman_harris_1d(p.y * inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn window_shape() {
        assert!(approx_eq!(Float, blackman_harris_1d(0.0), 1.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, blackman_harris_1d(1.0), 0.00006, epsilon = 1e-5));
        assert_eq!(blackman_harris_1d(1.5), 0.0);
        assert!(blackman_harris_1d(0.5) > blackman_harris_1d(0.75));
    }
}
