//! Frame Buffer Display

use super::Display;
use crate::color::*;
use crate::common::*;
use crate::geometry::*;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An image held in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameBuffer {
    /// Width in pixels.
    pub width: usize,

    /// Height in pixels.
    pub height: usize,

    /// Pixels in scanline order.
    pub pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a black frame buffer.
    ///
    /// * `width`  - Width in pixels.
    /// * `height` - Height in pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    /// Returns the pixel at the given coordinates.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Returns the pixels as interleaved RGB floats.
    pub fn to_rgb(&self) -> Vec<Float> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }

    /// Returns the part of `bounds` that lies inside the image.
    ///
    /// * `bounds` - Region in pixels.
    fn clip(&self, bounds: &Bounds2i) -> Bounds2i {
        let image = Bounds2i::new(Point2i::zero(), Point2i::new(self.width as Int, self.height as Int));
        bounds.intersect(&image)
    }

    /// Copy a block of colors into the buffer.
    ///
    /// * `bounds` - Region in pixels.
    /// * `data`   - `bounds.area()` colors in scanline order.
    pub fn write_block(&mut self, bounds: &Bounds2i, data: &[Color]) {
        assert_eq!(
            data.len(),
            bounds.area() as usize,
            "bucket {bounds} delivered {} colors",
            data.len()
        );
        let block_width = bounds.width();
        for p in self.clip(bounds) {
            let src = (p.y - bounds.p_min.y) * block_width + (p.x - bounds.p_min.x);
            let dst = p.y as usize * self.width + p.x as usize;
            self.pixels[dst] = data[src as usize];
        }
    }

    /// Fill a region with one color.
    ///
    /// * `bounds` - Region in pixels.
    /// * `color`  - Fill color.
    pub fn fill_block(&mut self, bounds: &Bounds2i, color: Color) {
        for p in self.clip(bounds) {
            self.pixels[p.y as usize * self.width + p.x as usize] = color;
        }
    }
}

/// A display that accumulates buckets into an in-memory frame buffer.
#[derive(Default)]
pub struct FrameDisplay {
    /// The image.
    buffer: RwLock<FrameBuffer>,
}

impl FrameDisplay {
    /// Create a new `FrameDisplay`. The buffer is allocated by `image_begin`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current image.
    pub fn snapshot(&self) -> FrameBuffer {
        self.read().clone()
    }

    /// Acquire the buffer for reading. A worker that panicked while holding
    /// the lock leaves whole buckets behind, so poisoning is ignored.
    pub fn read(&self) -> RwLockReadGuard<'_, FrameBuffer> {
        self.buffer.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Acquire the buffer for writing.
    fn write(&self) -> RwLockWriteGuard<'_, FrameBuffer> {
        self.buffer.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Display for FrameDisplay {
    fn image_begin(&self, width: usize, height: usize, _bucket_size: usize) {
        *self.write() = FrameBuffer::new(width, height);
    }

    fn image_prepare(&self, _bounds: &Bounds2i, _worker_id: usize) {}

    fn image_update(&self, bounds: &Bounds2i, data: &[Color]) {
        self.write().write_block(bounds, data);
    }

    fn image_fill(&self, bounds: &Bounds2i, color: Color) {
        self.write().fill_block(bounds, color);
    }

    fn image_end(&self) {}
}
