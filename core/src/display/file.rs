//! File Display

use super::{Display, FrameDisplay};
use crate::color::*;
use crate::geometry::*;
use crate::image_io::write_image;

/// A display that collects the image in memory and writes it to a file once
/// rendering ends.
pub struct FileDisplay {
    /// Output file path. The extension selects the format.
    path: String,

    /// The in-memory image.
    frame: FrameDisplay,
}

impl FileDisplay {
    /// Create a new `FileDisplay`.
    ///
    /// * `path` - Output file path (`.exr`, `.pfm`, `.png` or `.tga`).
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            frame: FrameDisplay::new(),
        }
    }

    /// Returns the output file path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the in-memory image.
    pub fn frame(&self) -> &FrameDisplay {
        &self.frame
    }
}

impl Display for FileDisplay {
    fn image_begin(&self, width: usize, height: usize, bucket_size: usize) {
        self.frame.image_begin(width, height, bucket_size);
    }

    fn image_prepare(&self, bounds: &Bounds2i, worker_id: usize) {
        self.frame.image_prepare(bounds, worker_id);
    }

    fn image_update(&self, bounds: &Bounds2i, data: &[Color]) {
        self.frame.image_update(bounds, data);
    }

    fn image_fill(&self, bounds: &Bounds2i, color: Color) {
        self.frame.image_fill(bounds, color);
    }

    fn image_end(&self) {
        if let Err(err) = write_image(&self.path, &self.frame.read()) {
            error!("{err}");
        }
    }
}
