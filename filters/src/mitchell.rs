//! Mitchell Filter

use render_core::common::*;
use render_core::filter::*;
use render_core::geometry::*;

/// Implements the Mitchell-Netravali family of cubic filters. The filter
/// spans 2 units of the cubic on either side of the center, scaled to the
/// filter width.
pub struct MitchellFilter {
    /// Filter data.
    pub data: FilterData,

    /// Parameter `B`.
    pub b: Float,

    /// Parameter `C`.
    pub c: Float,
}

impl MitchellFilter {
    /// Default width in pixels.
    pub const DEFAULT_SIZE: Float = 4.0;

    /// Returns a new instance of `MitchellFilter`. Ideally the 2 parameters
    /// `B` and `C` should satisfy `B + 2C = 1`.
    ///
    /// * `size` - Width of the filter in pixels.
    /// * `b`    - Parameter `B`.
    /// * `c`    - Parameter `C`.
    pub fn new(size: Float, b: Float, c: Float) -> Self {
        Self {
            data: FilterData::new(size),
            b,
            c,
        }
    }

    /// Returns the Catmull-Rom spline (`B = 0`, `C = 1/2`).
    ///
    /// * `size` - Width of the filter in pixels.
    pub fn catmull_rom(size: Float) -> Self {
        Self::new(size, 0.0, 0.5)
    }

    /// Calculates the 1D filter function.
    ///
    /// * `x` - Distance from center of filter in [-1, 1].
    fn mitchell_1d(&self, x: Float) -> Float {
        let (b, c) = (self.b, self.c);
        let x = abs(2.0 * x);
        let x2 = x * x;

        if x >= 2.0 {
            0.0
        } else if x > 1.0 {
            ((-b - 6.0 * c) * x * x2 + (6.0 * b + 30.0 * c) * x2 + (-12.0 * b - 48.0 * c) * x + (8.0 * b + 24.0 * c))
                * (1.0 / 6.0)
        } else {
            ((12.0 - 9.0 * b - 6.0 * c) * x * x2 + (-18.0 + 12.0 * b + 6.0 * c) * x2 + (6.0 - 2.0 * b)) * (1.0 / 6.0)
        }
    }
}

impl Default for MitchellFilter {
    /// The filter recommended by Mitchell and Netravali (`B = C = 1/3`).
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, 1.0 / 3.0, 1.0 / 3.0)
    }
}

impl Filter for MitchellFilter {
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
        self.mitchell_1d(p.x * inv) * self.mitchell_1d(p.y * inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn mitchell_center_and_edge() {
        let f = MitchellFilter::default();
        // (6 - 2B) / 6 squared.
        let center = (16.0 / 18.0 as Float).powi(2);
        assert!(approx_eq!(Float, f.evaluate(&Point2f::new(0.0, 0.0)), center, ulps = 4));
        assert!(approx_eq!(Float, f.evaluate(&Point2f::new(2.0, 0.0)), 0.0, epsilon = 1e-6));
    }

    #[test]
    fn mitchell_is_continuous_at_one() {
        let f = MitchellFilter::default();
        let inside = f.mitchell_1d(0.5 - 1e-4);
        let outside = f.mitchell_1d(0.5 + 1e-4);
        assert!(approx_eq!(Float, inside, outside, epsilon = 1e-3));
    }

    #[test]
    fn catmull_rom_interpolates() {
        let f = MitchellFilter::catmull_rom(4.0);
        assert!(approx_eq!(Float, f.evaluate(&Point2f::new(0.0, 0.0)), 1.0, ulps = 2));
        assert!(approx_eq!(Float, f.evaluate(&Point2f::new(1.0, 0.0)), 0.0, epsilon = 1e-6));
        // Negative lobe.
        assert!(f.evaluate(&Point2f::new(1.5, 0.0)) < 0.0);
    }
}
