//! Silent Display

use super::Display;
use crate::color::*;
use crate::geometry::*;

/// A display that discards everything it receives.
#[derive(Default)]
pub struct SilentDisplay;

impl Display for SilentDisplay {
    fn image_begin(&self, _width: usize, _height: usize, _bucket_size: usize) {}

    fn image_prepare(&self, _bounds: &Bounds2i, _worker_id: usize) {}

    fn image_update(&self, _bounds: &Bounds2i, _data: &[Color]) {}

    fn image_fill(&self, _bounds: &Bounds2i, _color: Color) {}

    fn image_end(&self) {}
}
