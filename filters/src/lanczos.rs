//! Lanczos Filter

use super::sinc;
use render_core::common::*;
use render_core::filter::*;
use render_core::geometry::*;

/// Implements a sinc filter windowed by a wider sinc lobe.
pub struct LanczosFilter {
    /// Filter data.
    pub data: FilterData,

    /// Number of cycles the sinc function passes through before it is clamped
    /// to 0.
    pub tau: Float,
}

impl LanczosFilter {
    /// Default width in pixels.
    pub const DEFAULT_SIZE: Float = 4.0;

    /// Returns a new instance of `LanczosFilter`. The window spans the whole
    /// filter extent.
    ///
    /// * `size` - Width of the filter in pixels.
    pub fn new(size: Float) -> Self {
        let data = FilterData::new(size);
        Self { tau: data.half_size, data }
    }

    /// Calculates the windowed sinc for a given distance.
    ///
    /// * `x` - Distance from center of filter.
    fn windowed_sinc(&self, x: Float) -> Float {
        let x = abs(x);
        if x > self.data.half_size {
            0.0
        } else {
            sinc(x) * sinc(x / self.tau)
        }
    }
}

impl Default for LanczosFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl Filter for LanczosFilter {
    /// Return the filter parameters.
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    /// Returns value of the filter at a given point.
    ///
    /// * `p` - The position of the sample point relative to the center of the
    ///         filter. The point should be within the filter's extent.
    fn evaluate(&self, p: &Point2f) -> Float {
        self.windowed_sinc(p.x) * self.windowed_sinc(p.y)
    }
}
