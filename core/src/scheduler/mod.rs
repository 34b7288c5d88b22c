//! Bucket Scheduler
//!
//! Splits the image into square buckets and hands them to a pool of scoped
//! worker threads in the order chosen by a `BucketOrder`. Workers claim
//! buckets through a single atomic cursor.

mod priority;
mod workers;

use crate::bucket_order::*;
use crate::common::*;
use crate::context::*;
use crate::display::Display;
use crate::geometry::*;
use crate::oracle::*;
use crate::sampler::*;
use std::sync::atomic::{AtomicUsize, Ordering};

// Re-export
pub use priority::*;
pub use workers::*;

/// Smallest bucket size in pixels.
pub const MIN_BUCKET_SIZE: usize = 16;

/// Largest bucket size in pixels.
pub const MAX_BUCKET_SIZE: usize = 512;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: usize = 32;

/// Outcome of a scheduler run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Counters summed over all rendered buckets.
    pub stats: SamplingStats,

    /// Number of buckets delivered to the display.
    pub buckets_rendered: usize,

    /// True if the run stopped because cancellation was requested.
    pub cancelled: bool,
}

/// Bucket grid and visitation sequence for one image.
#[derive(Debug)]
pub struct BucketScheduler {
    /// Image width in pixels.
    width: usize,

    /// Image height in pixels.
    height: usize,

    /// Bucket size in pixels.
    bucket_size: usize,

    /// Number of buckets in each direction.
    n_buckets: Point2<usize>,

    /// Buckets in visitation order.
    sequence: Vec<Point2<usize>>,

    /// Position in `sequence` of the next bucket to hand out.
    cursor: AtomicUsize,
}

impl BucketScheduler {
    /// Compute the bucket grid of an image and its visitation sequence.
    ///
    /// * `width`       - Image width in pixels.
    /// * `height`      - Image height in pixels.
    /// * `bucket_size` - Requested bucket size; clamped to
    ///                   [`MIN_BUCKET_SIZE`, `MAX_BUCKET_SIZE`].
    /// * `order`       - Bucket visitation order.
    pub fn prepare(
        width: usize,
        height: usize,
        bucket_size: usize,
        order: &dyn BucketOrder,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid image resolution {width}x{height}"));
        }

        let bucket_size = clamp_setting("Bucket size", bucket_size, MIN_BUCKET_SIZE, MAX_BUCKET_SIZE);
        let n_buckets = Point2::new(
            (width + bucket_size - 1) / bucket_size,
            (height + bucket_size - 1) / bucket_size,
        );
        let sequence = order.bucket_sequence(n_buckets.x, n_buckets.y);
        validate_sequence(&sequence, n_buckets)?;

        Ok(Self {
            width,
            height,
            bucket_size,
            n_buckets,
            sequence,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the bucket size after clamping.
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Returns the number of buckets in each direction.
    pub fn grid(&self) -> Point2<usize> {
        self.n_buckets
    }

    /// Returns the total number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.sequence.len()
    }

    /// Returns the pixel bounds of a bucket. Buckets on the right and bottom
    /// edges are cropped to the image.
    ///
    /// * `bucket` - Bucket index in the grid.
    pub fn bucket_bounds(&self, bucket: Point2<usize>) -> Bounds2i {
        let x0 = bucket.x * self.bucket_size;
        let y0 = bucket.y * self.bucket_size;
        let x1 = min(x0 + self.bucket_size, self.width);
        let y1 = min(y0 + self.bucket_size, self.height);
        Bounds2i::new(Point2i::from(Point2::new(x0, y0)), Point2i::from(Point2::new(x1, y1)))
    }

    /// Returns the bucket rectangles in visitation order.
    pub fn buckets(&self) -> impl Iterator<Item = Bounds2i> + '_ {
        self.sequence.iter().map(move |&b| self.bucket_bounds(b))
    }

    /// Claim the next bucket. Returns `None` once every bucket was handed out.
    fn claim(&self) -> Option<Bounds2i> {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.sequence.get(i).map(|&b| self.bucket_bounds(b))
    }

    /// Render every bucket with a pool of worker threads and return once all
    /// of them have finished or cancellation was observed.
    ///
    /// * `workers`  - Number of worker threads.
    /// * `priority` - Requested worker priority.
    /// * `sampler`  - Samples and filters each bucket.
    /// * `oracle`   - Source of radiance.
    /// * `display`  - Receives the finished buckets.
    /// * `context`  - Progress and cancellation.
    pub fn run(
        &self,
        workers: usize,
        priority: WorkerPriority,
        sampler: &AdaptiveSampler,
        oracle: &dyn RadianceOracle,
        display: &dyn Display,
        context: &RenderContext,
    ) -> RunResult {
        self.cursor.store(0, Ordering::SeqCst);

        let completed = AtomicUsize::new(0);
        let progress = context.progress();
        progress.start(self.bucket_count() as u64, "buckets");

        let stats = run_workers(workers, priority, "bucket", |worker_id| {
            let mut stats = SamplingStats::default();

            while let Some(bounds) = self.claim() {
                display.image_prepare(&bounds, worker_id);
                let result = sampler.render_bucket(&bounds, oracle);
                display.image_update(&bounds, &result.colors);
                stats += result.stats;

                completed.fetch_add(1, Ordering::AcqRel);
                progress.inc(1);

                if context.is_cancelled() {
                    debug!("Bucket worker {worker_id} stopping after cancellation");
                    break;
                }
            }
            stats
        });

        let buckets_rendered = completed.load(Ordering::SeqCst);
        let cancelled = buckets_rendered < self.bucket_count() && context.is_cancelled();
        if cancelled {
            progress.finish("Render cancelled");
        } else {
            progress.finish("Render complete");
        }

        RunResult {
            stats,
            buckets_rendered,
            cancelled,
        }
    }
}

/// Check that a bucket sequence names every bucket of the grid exactly once.
///
/// * `sequence`  - The sequence.
/// * `n_buckets` - Number of buckets in each direction.
fn validate_sequence(sequence: &[Point2<usize>], n_buckets: Point2<usize>) -> Result<(), String> {
    let count = n_buckets.x * n_buckets.y;
    if sequence.len() != count {
        return Err(format!(
            "Bucket order returned {} buckets for a {}x{} grid",
            sequence.len(),
            n_buckets.x,
            n_buckets.y
        ));
    }

    let mut seen = vec![false; count];
    for b in sequence {
        if b.x >= n_buckets.x || b.y >= n_buckets.y {
            return Err(format!("Bucket order returned bucket {b} outside the {}x{} grid", n_buckets.x, n_buckets.y));
        }
        let i = b.y * n_buckets.x + b.x;
        if seen[i] {
            return Err(format!("Bucket order returned bucket {b} twice"));
        }
        seen[i] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::*;
    use crate::display::*;
    use crate::filter::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    struct ScanOrder;

    impl BucketOrder for ScanOrder {
        fn bucket_sequence(&self, n_buckets_x: usize, n_buckets_y: usize) -> Vec<Point2<usize>> {
            itertools::iproduct!(0..n_buckets_y, 0..n_buckets_x)
                .map(|(y, x)| Point2::new(x, y))
                .collect()
        }
    }

    struct BrokenOrder(Vec<Point2<usize>>);

    impl BucketOrder for BrokenOrder {
        fn bucket_sequence(&self, _n_buckets_x: usize, _n_buckets_y: usize) -> Vec<Point2<usize>> {
            self.0.clone()
        }
    }

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

    /// Records every call for checking the display protocol.
    #[derive(Default)]
    struct RecordingDisplay {
        prepared: Mutex<Vec<(Bounds2i, usize)>>,
        updated: Mutex<Vec<Bounds2i>>,
    }

    impl Display for RecordingDisplay {
        fn image_begin(&self, _width: usize, _height: usize, _bucket_size: usize) {}

        fn image_prepare(&self, bounds: &Bounds2i, worker_id: usize) {
            self.prepared.lock().unwrap().push((*bounds, worker_id));
        }

        fn image_update(&self, bounds: &Bounds2i, data: &[Color]) {
            assert_eq!(data.len(), bounds.area() as usize);
            self.updated.lock().unwrap().push(*bounds);
        }

        fn image_fill(&self, _bounds: &Bounds2i, _color: Color) {}

        fn image_end(&self) {}
    }

    fn sampler() -> AdaptiveSampler {
        let filter: ArcFilter = Arc::new(UnitBox {
            data: FilterData::new(1.0),
        });
        AdaptiveSampler::new(AaSettings::default(), filter, false, Color::BLACK)
    }

    fn white(_: &SampleRequest) -> Option<SurfaceHit> {
        Some(SurfaceHit {
            color: Color::WHITE,
            instance: 0,
            shader: Some(0),
            normal: Normal3f::new(0.0, 0.0, 1.0),
        })
    }

    #[test]
    fn zero_resolution_is_rejected() {
        assert!(BucketScheduler::prepare(0, 10, 32, &ScanOrder).is_err());
        assert!(BucketScheduler::prepare(10, 0, 32, &ScanOrder).is_err());
    }

    #[test]
    fn bucket_size_is_clamped() {
        let s = BucketScheduler::prepare(100, 100, 4, &ScanOrder).unwrap();
        assert_eq!(s.bucket_size(), MIN_BUCKET_SIZE);
        assert_eq!(s.grid(), Point2::new(7, 7));

        let s = BucketScheduler::prepare(2000, 100, 4096, &ScanOrder).unwrap();
        assert_eq!(s.bucket_size(), MAX_BUCKET_SIZE);
        assert_eq!(s.grid(), Point2::new(4, 1));
    }

    #[test]
    fn broken_sequences_are_rejected() {
        let short = BrokenOrder(vec![Point2::new(0, 0)]);
        assert!(BucketScheduler::prepare(64, 32, 32, &short).is_err());

        let duplicate = BrokenOrder(vec![Point2::new(0, 0), Point2::new(0, 0)]);
        assert!(BucketScheduler::prepare(64, 32, 32, &duplicate).is_err());

        let outside = BrokenOrder(vec![Point2::new(0, 0), Point2::new(2, 0)]);
        assert!(BucketScheduler::prepare(64, 32, 32, &outside).is_err());
    }

    #[test]
    fn edge_buckets_are_cropped() {
        let s = BucketScheduler::prepare(70, 40, 32, &ScanOrder).unwrap();
        assert_eq!(s.grid(), Point2::new(3, 2));
        assert_eq!(
            s.bucket_bounds(Point2::new(2, 1)),
            Bounds2i::new(Point2i::new(64, 32), Point2i::new(70, 40))
        );
    }

    #[test]
    fn every_bucket_is_prepared_and_updated_once() {
        let s = BucketScheduler::prepare(100, 50, 16, &ScanOrder).unwrap();
        let display = RecordingDisplay::default();
        let result = s.run(4, WorkerPriority::Normal, &sampler(), &white, &display, &RenderContext::default());

        assert!(!result.cancelled);
        assert_eq!(result.buckets_rendered, s.bucket_count());
        assert_eq!(result.stats.buckets as usize, s.bucket_count());
        assert_eq!(result.stats.oracle_calls, 100 * 50);

        let mut updated = display.updated.lock().unwrap().clone();
        let mut expected: Vec<Bounds2i> = s.buckets().collect();
        let key = |b: &Bounds2i| (b.p_min.y, b.p_min.x);
        updated.sort_by_key(key);
        expected.sort_by_key(key);
        assert_eq!(updated, expected);

        let prepared = display.prepared.lock().unwrap();
        assert_eq!(prepared.len(), s.bucket_count());
        assert!(prepared.iter().all(|&(_, id)| id < 4));
    }

    /// Totals the progress reported by the workers.
    #[derive(Default)]
    struct CountingProgress {
        total: std::sync::atomic::AtomicU64,
        done: std::sync::atomic::AtomicU64,
    }

    impl ProgressReporter for CountingProgress {
        fn start(&self, total: u64, _message: &str) {
            self.total.store(total, Ordering::SeqCst);
            self.done.store(0, Ordering::SeqCst);
        }

        fn inc(&self, delta: u64) {
            self.done.fetch_add(delta, Ordering::SeqCst);
        }

        fn finish(&self, _message: &str) {}
    }

    #[test]
    fn progress_counts_every_bucket() {
        let s = BucketScheduler::prepare(200, 120, 16, &ScanOrder).unwrap();
        let progress = Arc::new(CountingProgress::default());
        let ctx = RenderContext::new(CancelToken::new(), progress.clone());
        s.run(8, WorkerPriority::Normal, &sampler(), &white, &SilentDisplay, &ctx);

        assert_eq!(progress.total.load(Ordering::SeqCst), s.bucket_count() as u64);
        assert_eq!(progress.done.load(Ordering::SeqCst), s.bucket_count() as u64);
    }

    #[test]
    fn cancelled_run_stops_after_one_bucket_per_worker() {
        let s = BucketScheduler::prepare(256, 256, 16, &ScanOrder).unwrap();
        let display = RecordingDisplay::default();
        let ctx = RenderContext::default();
        ctx.cancel_token().cancel();

        let result = s.run(2, WorkerPriority::Low, &sampler(), &white, &display, &ctx);
        assert!(result.cancelled);
        assert!(result.buckets_rendered >= 1 && result.buckets_rendered <= 2);
        assert_eq!(display.updated.lock().unwrap().len(), result.buckets_rendered);
    }

    #[test]
    fn scheduler_can_run_again() {
        let s = BucketScheduler::prepare(40, 40, 16, &ScanOrder).unwrap();
        let ctx = RenderContext::default();
        let a = s.run(1, WorkerPriority::High, &sampler(), &white, &SilentDisplay, &ctx);
        let b = s.run(3, WorkerPriority::High, &sampler(), &white, &SilentDisplay, &ctx);
        assert_eq!(a.buckets_rendered, 9);
        assert_eq!(a, b);
    }

    #[test]
    fn panicking_worker_does_not_abort_render() {
        let s = BucketScheduler::prepare(64, 64, 16, &ScanOrder).unwrap();
        let oracle = |r: &SampleRequest| {
            if r.x < 16.0 && r.y < 16.0 {
                panic!("oracle failure");
            }
            white(r)
        };
        let result = s.run(2, WorkerPriority::Normal, &sampler(), &oracle, &SilentDisplay, &RenderContext::default());
        assert!(result.buckets_rendered < s.bucket_count());
        assert!(result.buckets_rendered >= s.bucket_count() - 2);
    }

    proptest! {
        #[test]
        fn buckets_tile_the_image(width in 1..300usize, height in 1..300usize, size in 1..600usize) {
            let s = BucketScheduler::prepare(width, height, size, &ScanOrder).unwrap();
            let mut covered = vec![0_u8; width * height];
            for b in s.buckets() {
                prop_assert!(!b.is_empty());
                prop_assert!(b.width() as usize <= s.bucket_size());
                prop_assert!(b.height() as usize <= s.bucket_size());
                for p in b {
                    covered[p.y as usize * width + p.x as usize] += 1;
                }
            }
            prop_assert!(covered.iter().all(|&c| c == 1));
        }
    }
}
