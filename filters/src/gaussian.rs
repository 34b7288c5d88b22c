//! Gaussian Filter

use render_core::common::*;
use render_core::filter::*;
use render_core::geometry::*;

/// Implements the Gaussian filter which applies a bump that is centered at the
/// pixel and radially symmetric around it. The curve is shifted down by
/// e^(-size^2) using the full filter width, so it stays slightly positive at
/// the edge of the extent.
pub struct GaussianFilter {
    /// Filter data.
    pub data: FilterData,

    /// Stores e^(-size^2).
    pub exp_edge: Float,
}

impl GaussianFilter {
    /// Default width in pixels.
    pub const DEFAULT_SIZE: Float = 3.0;

    /// Returns a new instance of `GaussianFilter`.
    ///
    /// * `size` - Width of the filter in pixels; beyond half of this the
    ///            filter is 0.
    pub fn new(size: Float) -> Self {
        let data = FilterData::new(size);
        Self {
            exp_edge: (-data.size * data.size).exp(),
            data,
        }
    }

    /// Calculates the Gaussian filter function for a given distance.
    ///
    /// * `d` - Distance in x or y direction.
    fn gaussian(&self, d: Float) -> Float {
        max(0.0, (-d * d).exp() - self.exp_edge)
    }
}

impl Default for GaussianFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl Filter for GaussianFilter {
    /// Return the filter parameters.
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    /// Returns value of the filter at a given point.
    ///
    /// * `p` - The position of the sample point relative to the center of the
    ///         filter. The point should be within the filter's extent.
    fn evaluate(&self, p: &Point2f) -> Float {
        self.gaussian(p.x) * self.gaussian(p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn peak_and_edge() {
        let f = GaussianFilter::default();
        let shift = (-9.0 as Float).exp();
        assert!(approx_eq!(Float, f.exp_edge, shift, ulps = 4));
        let center = 1.0 - shift;
        assert!(approx_eq!(Float, f.evaluate(&Point2f::new(0.0, 0.0)), center * center, ulps = 4));
        let edge = (-2.25 as Float).exp() - shift;
        assert!(approx_eq!(Float, f.evaluate(&Point2f::new(1.5, 0.0)), edge * center, epsilon = 1e-6));
        assert!(f.evaluate(&Point2f::new(1.5, 0.0)) > 0.1);
        assert!(f.evaluate(&Point2f::new(0.5, 0.5)) < f.evaluate(&Point2f::new(0.25, 0.0)));
    }
}
