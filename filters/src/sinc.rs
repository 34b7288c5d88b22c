//! Sinc Filter

use render_core::common::*;
use render_core::filter::*;
use render_core::geometry::*;

/// Implements the sinc filter truncated to the filter extent.
pub struct SincFilter {
    /// Filter data.
    pub data: FilterData,
}

impl SincFilter {
    /// Default width in pixels.
    pub const DEFAULT_SIZE: Float = 4.0;

    /// Returns a new instance of `SincFilter`.
    ///
    /// * `size` - Width of the filter in pixels.
    pub fn new(size: Float) -> Self {
        Self {
            data: FilterData::new(size),
        }
    }
}

impl Default for SincFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl Filter for SincFilter {
    /// Return the filter parameters.
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    /// Returns value of the filter at a given point.
    ///
    /// * `p` - The position of the sample point relative to the center of the
    ///         filter. The point should be within the filter's extent.
    fn evaluate(&self, p: &Point2f) -> Float {
        sinc(p.x) * sinc(p.y)
    }
}

/// Evaluates the normalized sinc function `sin(PI x) / (PI x)`.
///
/// `x` - Point to evaluate sinc function at.
pub fn sinc(x: Float) -> Float {
    let x = abs(x);
    if x < 1e-5 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn zeros_at_integers() {
        assert_eq!(sinc(0.0), 1.0);
        for i in 1..4 {
            assert!(approx_eq!(Float, sinc(i as Float), 0.0, epsilon = 1e-6));
        }
        assert!(sinc(1.5) < 0.0);
    }

    #[test]
    fn separable() {
        let f = SincFilter::default();
        let p = Point2f::new(0.3, 0.7);
        assert!(approx_eq!(Float, f.evaluate(&p), sinc(0.3) * sinc(0.7), ulps = 2));
    }
}
