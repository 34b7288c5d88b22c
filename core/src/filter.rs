//! Filter

use crate::common::*;
use crate::geometry::*;
use std::sync::Arc;

/// Atomic reference counted `Filter`.
pub type ArcFilter = Arc<dyn Filter + Send + Sync>;

/// Filter interface. Reconstruction filters weight image samples by their
/// offset from a pixel center.
pub trait Filter {
    /// Return the filter parameters.
    fn get_data(&self) -> &FilterData;

    /// Returns value of the filter at a given point.
    ///
    /// * `p` - The position of the sample point relative to the center of the
    ///         filter. The point should be within the filter's extent.
    fn evaluate(&self, p: &Point2f) -> Float;

    /// Returns the full width of the filter's support in pixels.
    fn size(&self) -> Float {
        self.get_data().size
    }
}

/// Data for square filters centered at origin (0, 0).
#[derive(Copy, Clone, Debug)]
pub struct FilterData {
    /// Full width of the filter in pixels; the filter is 0 beyond `size / 2`
    /// from the center on either axis.
    pub size: Float,

    /// Half of `size`.
    pub half_size: Float,

    /// Reciprocal of `half_size`.
    pub inv_half_size: Float,
}

impl FilterData {
    /// Returns a new instance of `FilterData`.
    ///
    /// * `size` - Full width of the filter in pixels.
    pub fn new(size: Float) -> Self {
        assert!(size > 0.0, "Filter size must be positive");
        let half_size = size * 0.5;
        Self {
            size,
            half_size,
            inv_half_size: 1.0 / half_size,
        }
    }
}
