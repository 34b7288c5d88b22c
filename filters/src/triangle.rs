//! Triangle Filter

use render_core::common::*;
use render_core::filter::*;
use render_core::geometry::*;

/// Implements the triangle filter in which the weight falls off linearly from
/// the filter center over the square extent of the filter.
pub struct TriangleFilter {
    /// Filter data.
    pub data: FilterData,
}

impl TriangleFilter {
    /// Default width in pixels.
    pub const DEFAULT_SIZE: Float = 2.0;

    /// Returns a new instance of `TriangleFilter`.
    ///
    /// * `size` - Width of the filter in pixels; beyond half of this the
    ///            filter is 0.
    pub fn new(size: Float) -> Self {
        Self {
            data: FilterData::new(size),
        }
    }
}

impl Default for TriangleFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl Filter for TriangleFilter {
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
        max(0.0, 1.0 - abs(p.x * inv)) * max(0.0, 1.0 - abs(p.y * inv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn linear_falloff() {
        let f = TriangleFilter::default();
        assert_eq!(f.evaluate(&Point2f::new(0.0, 0.0)), 1.0);
        assert!(approx_eq!(Float, f.evaluate(&Point2f::new(0.5, 0.0)), 0.5, ulps = 2));
        assert!(approx_eq!(Float, f.evaluate(&Point2f::new(0.5, 0.5)), 0.25, ulps = 2));
        assert_eq!(f.evaluate(&Point2f::new(1.0, 0.0)), 0.0);
        assert_eq!(f.evaluate(&Point2f::new(0.0, -1.5)), 0.0);
    }
}
