//! Box Filter

use render_core::common::*;
use render_core::filter::*;
use render_core::geometry::*;

/// Implements the box filter which weights all samples within its square
/// extent equally.
pub struct BoxFilter {
    /// Filter data.
    pub data: FilterData,
}

impl BoxFilter {
    /// Default width in pixels.
    pub const DEFAULT_SIZE: Float = 1.0;

    /// Returns a new instance of `BoxFilter`.
    ///
    /// * `size` - Width of the filter in pixels.
    pub fn new(size: Float) -> Self {
        Self {
            data: FilterData::new(size),
        }
    }
}

impl Default for BoxFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl Filter for BoxFilter {
    /// Return the filter parameters.
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    /// Returns value of the filter at a given point.
    ///
    /// * `_p` - The position of the sample point relative to the center of
    ///          the filter.
    fn evaluate(&self, _p: &Point2f) -> Float {
        1.0
    }
}
