//! Display

mod file;
mod frame;
mod silent;

use crate::color::*;
use crate::geometry::*;

// Re-export
pub use file::*;
pub use frame::*;
pub use silent::*;

/// Receives the rendered image bucket by bucket. Render workers call
/// `image_prepare` and `image_update` concurrently for disjoint regions, so
/// implementations synchronize internally.
pub trait Display: Send + Sync {
    /// Called once before any bucket is rendered.
    ///
    /// * `width`       - Image width in pixels.
    /// * `height`      - Image height in pixels.
    /// * `bucket_size` - Bucket size in pixels.
    fn image_begin(&self, width: usize, height: usize, bucket_size: usize);

    /// Called before the samples of a bucket are computed.
    ///
    /// * `bounds`    - Pixel bounds of the bucket.
    /// * `worker_id` - Worker rendering the bucket.
    fn image_prepare(&self, bounds: &Bounds2i, worker_id: usize);

    /// Delivers the final filtered colors of a bucket, row by row. Called
    /// exactly once per bucket.
    ///
    /// * `bounds` - Pixel bounds of the bucket.
    /// * `data`   - `bounds.area()` colors in scanline order.
    fn image_update(&self, bounds: &Bounds2i, data: &[Color]);

    /// Fills a region with a single color.
    ///
    /// * `bounds` - Pixel bounds of the region.
    /// * `color`  - Fill color.
    fn image_fill(&self, bounds: &Bounds2i, color: Color);

    /// Called once after all workers have finished.
    fn image_end(&self);
}
