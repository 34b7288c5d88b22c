//! Renderers
//!
//! `BucketRenderer` ties the adaptive sampler and the bucket scheduler
//! together and drives the display through one complete image.
//! `ProgressiveRenderer` refines a coarse preview of the whole image instead.

mod progressive;

use crate::bucket_order::*;
use crate::color::*;
use crate::context::*;
use crate::display::Display;
use crate::filter::*;
use crate::oracle::*;
use crate::sampler::*;
use crate::scheduler::*;
use indicatif::HumanDuration;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Re-export
pub use progressive::*;

/// Renderer configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RendererSettings {
    /// Anti-aliasing settings.
    pub aa: AaSettings,

    /// Requested bucket size in pixels.
    pub bucket_size: usize,

    /// Number of worker threads.
    pub threads: usize,

    /// Requested worker priority.
    pub priority: WorkerPriority,

    /// Output sampling density instead of color.
    pub display_aa: bool,

    /// Color of samples that miss the scene.
    pub background: Color,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            aa: AaSettings::default(),
            bucket_size: DEFAULT_BUCKET_SIZE,
            threads: num_cpus::get(),
            priority: WorkerPriority::Normal,
            display_aa: false,
            background: Color::BLACK,
        }
    }
}

/// Outcome of a render.
#[derive(Copy, Clone, Debug)]
pub struct RenderSummary {
    /// Counters summed over all rendered buckets.
    pub stats: SamplingStats,

    /// Number of buckets delivered to the display.
    pub buckets_rendered: usize,

    /// Number of buckets in the image.
    pub bucket_count: usize,

    /// True if the render stopped early because cancellation was requested.
    pub cancelled: bool,

    /// Wall clock time spent rendering.
    pub elapsed: Duration,
}

/// Renders images bucket by bucket with adaptive anti-aliasing.
pub struct BucketRenderer {
    /// Configuration.
    settings: RendererSettings,

    /// Reconstruction filter.
    filter: ArcFilter,

    /// Bucket visitation order.
    order: ArcBucketOrder,
}

impl BucketRenderer {
    /// Create a new `BucketRenderer`.
    ///
    /// * `settings` - Configuration.
    /// * `filter`   - Reconstruction filter.
    /// * `order`    - Bucket visitation order.
    pub fn new(settings: RendererSettings, filter: ArcFilter, order: ArcBucketOrder) -> Self {
        Self {
            settings,
            filter,
            order,
        }
    }

    /// Returns the configuration.
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Validate the configuration for an image and build the sampler and
    /// bucket grid.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn prepare(&self, width: usize, height: usize) -> Result<RenderJob, String> {
        let scheduler = BucketScheduler::prepare(width, height, self.settings.bucket_size, self.order.as_ref())?;
        let aa = AaSettings::new(
            self.settings.aa.min_depth,
            self.settings.aa.max_depth,
            self.settings.aa.super_sampling,
            self.settings.aa.contrast_threshold,
        );
        let sampler = AdaptiveSampler::new(aa, Arc::clone(&self.filter), self.settings.display_aa, self.settings.background);
        let threads = if self.settings.threads == 0 {
            warn!("Invalid thread count 0; using 1");
            1
        } else {
            self.settings.threads
        };

        let grid = scheduler.grid();
        info!("Bucket renderer settings:");
        info!("  * Resolution:        {width}x{height}");
        info!("  * Bucket size:       {}", scheduler.bucket_size());
        info!("  * Number of buckets: {}x{}", grid.x, grid.y);
        info!("  * Anti-aliasing:     {aa}");
        info!("  * Rays per sample:   {}", aa.super_sampling);
        info!("  * Filter size:       {:.2} pixels", self.filter.size());
        info!("  * Threads:           {threads} ({} priority)", self.settings.priority);
        debug!("  * Contrast:          {}", aa.contrast_threshold);
        debug!("  * Filter padding:    {} subpixels", sampler.filter_padding());

        Ok(RenderJob {
            scheduler,
            sampler,
            threads,
            priority: self.settings.priority,
        })
    }
}

/// A prepared image, ready to render.
pub struct RenderJob {
    /// Bucket grid and visitation sequence.
    scheduler: BucketScheduler,

    /// Samples and filters buckets.
    sampler: AdaptiveSampler,

    /// Number of worker threads.
    threads: usize,

    /// Requested worker priority.
    priority: WorkerPriority,
}

impl RenderJob {
    /// Returns the bucket grid.
    pub fn scheduler(&self) -> &BucketScheduler {
        &self.scheduler
    }

    /// Returns the sampler.
    pub fn sampler(&self) -> &AdaptiveSampler {
        &self.sampler
    }

    /// Render the image into a display.
    ///
    /// * `oracle`  - Source of radiance.
    /// * `display` - Receives the image.
    /// * `context` - Progress and cancellation.
    pub fn render(&self, oracle: &dyn RadianceOracle, display: &dyn Display, context: &RenderContext) -> RenderSummary {
        let scheduler = &self.scheduler;
        display.image_begin(scheduler.width(), scheduler.height(), scheduler.bucket_size());

        let start = Instant::now();
        let result = scheduler.run(self.threads, self.priority, &self.sampler, oracle, display, context);
        let elapsed = start.elapsed();

        display.image_end();

        if result.cancelled {
            warn!(
                "Render cancelled after {} of {} buckets",
                result.buckets_rendered,
                scheduler.bucket_count()
            );
        }
        info!("Render time: {}", HumanDuration(elapsed));
        info!("Sampling: {}", result.stats);
        if result.stats.invalid_radiance > 0 {
            warn!("{} non-finite radiance values were replaced", result.stats.invalid_radiance);
        }

        RenderSummary {
            stats: result.stats,
            buckets_rendered: result.buckets_rendered,
            bucket_count: scheduler.bucket_count(),
            cancelled: result.cancelled,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::*;
    use crate::display::*;
    use crate::geometry::*;
    use itertools::iproduct;

    struct UnitBox {
        data: FilterData,
    }

    impl Filter for UnitBox {
        fn get_data(&self) -> &FilterData {
            &self.data
        }

        fn evaluate(&self, _p: &Point2f) -> Float {
            1.0
        }
    }

    struct ScanOrder;

    impl BucketOrder for ScanOrder {
        fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>> {
            iproduct!(0..n_buckets_y, 0..n_buckets_x)
                .map(|(y, x)| Point2::new(x, y))
                .collect()
        }
    }

    fn renderer(settings: RendererSettings) -> BucketRenderer {
        BucketRenderer::new(
            settings,
            Arc::new(UnitBox {
                data: FilterData::new(1.0),
            }),
            Arc::new(ScanOrder),
        )
    }

    fn gradient(r: &SampleRequest) -> Option<SurfaceHit> {
        Some(SurfaceHit {
            color: Color::new(r.x.floor() / 64.0, r.y.floor() / 64.0, 0.0),
            instance: 0,
            shader: Some(0),
            normal: Normal3f::new(0.0, 0.0, 1.0),
        })
    }

    #[test]
    fn zero_resolution_fails_to_prepare() {
        assert!(renderer(RendererSettings::default()).prepare(0, 32).is_err());
    }

    #[test]
    fn renders_full_image() {
        let settings = RendererSettings {
            threads: 3,
            bucket_size: 16,
            ..Default::default()
        };
        let job = renderer(settings).prepare(40, 24).unwrap();
        let display = FrameDisplay::new();
        let summary = job.render(&gradient, &display, &RenderContext::default());

        assert!(!summary.cancelled);
        assert_eq!(summary.bucket_count, 6);
        assert_eq!(summary.buckets_rendered, 6);
        assert_eq!(summary.stats.oracle_calls, 40 * 24);

        let fb = display.snapshot();
        assert_eq!((fb.width, fb.height), (40, 24));
        assert_eq!(fb.get(39, 23), Color::new(39.0 / 64.0, 23.0 / 64.0, 0.0));
        assert_eq!(fb.get(0, 0), Color::BLACK);
    }

    #[test]
    fn zero_threads_are_corrected() {
        let settings = RendererSettings {
            threads: 0,
            ..Default::default()
        };
        let job = renderer(settings).prepare(16, 16).unwrap();
        let summary = job.render(&gradient, &SilentDisplay, &RenderContext::default());
        assert_eq!(summary.buckets_rendered, 1);
    }
}
