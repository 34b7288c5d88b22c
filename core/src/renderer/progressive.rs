//! Progressive Renderer

use super::RendererSettings;
use crate::color::*;
use crate::common::*;
use crate::context::*;
use crate::display::Display;
use crate::geometry::*;
use crate::oracle::*;
use crate::qmc::*;
use crate::sampler::SamplingStats;
use crate::scheduler::*;
use indicatif::HumanDuration;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Number of samples along each side of a tile.
pub const TILE_SAMPLES: usize = 16;

/// Size of the table that scrambles sample indices between rows.
const SIGMA_TABLE_SIZE: usize = 128;

/// Outcome of a progressive render.
#[derive(Copy, Clone, Debug)]
pub struct ProgressiveSummary {
    /// Sampling counters. `buckets` counts rendered tiles.
    pub stats: SamplingStats,

    /// Number of pixels that received their own sample.
    pub pixels_rendered: u64,

    /// Number of pixels in the image.
    pub pixel_count: u64,

    /// Number of tiles rendered.
    pub tiles_rendered: usize,

    /// True if the render stopped early because cancellation was requested.
    pub cancelled: bool,

    /// Wall clock time spent rendering.
    pub elapsed: Duration,
}

/// A square region sampled on a regular grid of `TILE_SAMPLES` x
/// `TILE_SAMPLES` points. Each sample paints the block up to the next
/// sample, so larger tiles give a coarse preview that their children refine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Tile {
    /// Left edge in pixels.
    x: usize,

    /// Top edge in pixels.
    y: usize,

    /// Side length in pixels; a power of 2.
    size: usize,
}

impl Tile {
    /// Returns the tile covering the whole image.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    fn root(width: usize, height: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            size: max(width, height).next_power_of_two(),
        }
    }

    /// Returns the distance between samples in pixels.
    fn step(&self) -> usize {
        max(self.size / TILE_SAMPLES, 1)
    }

    /// Returns the quadrants that still need refining and start inside the
    /// image. Tiles of `TILE_SAMPLES` pixels or less already sample every
    /// pixel.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    fn children(&self, width: usize, height: usize) -> Vec<Tile> {
        if self.size < 2 * TILE_SAMPLES {
            return Vec::new();
        }
        let half = self.size / 2;
        [(0, 0), (half, 0), (0, half), (half, half)]
            .iter()
            .map(|&(dx, dy)| Tile {
                x: self.x + dx,
                y: self.y + dy,
                size: half,
            })
            .filter(|t| t.x < width && t.y < height)
            .collect()
    }
}

impl Ord for Tile {
    /// Larger tiles come first, then rows from the top and columns from the
    /// left.
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.size
            .cmp(&other.size)
            .then_with(|| other.y.cmp(&self.y))
            .then_with(|| other.x.cmp(&self.x))
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

/// Tiles waiting to be rendered and the number being rendered.
struct QueueState {
    /// Pending tiles, largest first.
    tiles: BinaryHeap<Tile>,

    /// Tiles handed out whose children are not yet known.
    in_flight: usize,
}

/// Work queue shared by the progressive workers. The queue is drained when
/// no tiles are pending and none are in flight.
struct TileQueue {
    /// Queue contents.
    state: Mutex<QueueState>,

    /// Signalled whenever a tile is finished.
    finished: Condvar,
}

impl TileQueue {
    /// Create a queue holding one tile.
    ///
    /// * `root` - The first tile.
    fn new(root: Tile) -> Self {
        let mut tiles = BinaryHeap::new();
        tiles.push(root);
        Self {
            state: Mutex::new(QueueState { tiles, in_flight: 0 }),
            finished: Condvar::new(),
        }
    }

    /// Acquire the queue. A worker that panicked while holding the lock
    /// leaves the heap intact, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Take the largest pending tile. Blocks while the queue is empty but
    /// other workers may still add children. Returns `None` once the queue
    /// is drained.
    fn next(&self) -> Option<TileLease<'_>> {
        let mut state = self.lock();
        loop {
            if let Some(tile) = state.tiles.pop() {
                state.in_flight += 1;
                return Some(TileLease {
                    queue: self,
                    tile,
                    children: Vec::new(),
                });
            }
            if state.in_flight == 0 {
                return None;
            }
            state = self
                .finished
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }
}

/// A tile handed to one worker. Dropping the lease queues its children and
/// wakes the waiting workers, even if the worker panicked.
struct TileLease<'a> {
    /// The owning queue.
    queue: &'a TileQueue,

    /// The tile to render.
    tile: Tile,

    /// Tiles to queue once this one is done.
    children: Vec<Tile>,
}

impl Drop for TileLease<'_> {
    fn drop(&mut self) {
        let mut state = self.queue.lock();
        state.tiles.extend(self.children.drain(..));
        state.in_flight -= 1;
        drop(state);
        self.queue.finished.notify_all();
    }
}

/// Renders a low resolution preview of the whole image first and refines it
/// until every pixel carries one sample at its center. The anti-aliasing,
/// filter and bucket settings do not apply.
pub struct ProgressiveRenderer {
    /// Configuration.
    settings: RendererSettings,

    /// Scrambles the sample index of each row.
    sigma: Vec<usize>,
}

impl ProgressiveRenderer {
    /// Create a new `ProgressiveRenderer`.
    ///
    /// * `settings` - Configuration; only the thread count, priority and
    ///                background are used.
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            sigma: generate_sigma_table(SIGMA_TABLE_SIZE),
        }
    }

    /// Returns the configuration.
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Render an image into a display. Each finished tile is painted with
    /// `image_fill`, one block per sample.
    ///
    /// * `width`   - Image width in pixels.
    /// * `height`  - Image height in pixels.
    /// * `oracle`  - Source of radiance.
    /// * `display` - Receives the image.
    /// * `context` - Progress and cancellation.
    pub fn render(
        &self,
        width: usize,
        height: usize,
        oracle: &dyn RadianceOracle,
        display: &dyn Display,
        context: &RenderContext,
    ) -> Result<ProgressiveSummary, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid image resolution {width}x{height}"));
        }
        let threads = if self.settings.threads == 0 {
            warn!("Invalid thread count 0; using 1");
            1
        } else {
            self.settings.threads
        };

        let root = Tile::root(width, height);
        let pixel_count = (width * height) as u64;
        info!("Progressive renderer settings:");
        info!("  * Resolution:        {width}x{height}");
        info!("  * Initial tile:      {0}x{0}", root.size);
        info!("  * Threads:           {threads} ({} priority)", self.settings.priority);

        display.image_begin(width, height, 0);
        let progress = context.progress();
        progress.start(pixel_count, "pixels");

        let queue = TileQueue::new(root);
        let pixels = AtomicU64::new(0);
        let tiles = AtomicUsize::new(0);

        let start = Instant::now();
        let stats = run_workers(threads, self.settings.priority, "progressive", |worker_id| {
            let mut stats = SamplingStats::default();

            while !context.is_cancelled() {
                let Some(mut lease) = queue.next() else {
                    break;
                };
                let sampled = self.render_tile(&lease.tile, root.size, width, height, oracle, display, &mut stats);
                lease.children = lease.tile.children(width, height);
                drop(lease);

                stats.buckets += 1;
                tiles.fetch_add(1, Ordering::AcqRel);
                pixels.fetch_add(sampled, Ordering::AcqRel);
                progress.inc(sampled);
            }
            if context.is_cancelled() {
                debug!("Progressive worker {worker_id} stopping after cancellation");
            }
            stats
        });
        let elapsed = start.elapsed();

        display.image_end();

        let pixels_rendered = pixels.load(Ordering::SeqCst);
        let cancelled = pixels_rendered < pixel_count && context.is_cancelled();
        if cancelled {
            progress.finish("Render cancelled");
            warn!("Render cancelled after {pixels_rendered} of {pixel_count} pixels");
        } else {
            progress.finish("Render complete");
        }
        info!("Render time: {}", HumanDuration(elapsed));
        info!("Sampling: {stats}");
        if stats.invalid_radiance > 0 {
            warn!("{} non-finite radiance values were replaced", stats.invalid_radiance);
        }

        Ok(ProgressiveSummary {
            stats,
            pixels_rendered,
            pixel_count,
            tiles_rendered: tiles.load(Ordering::SeqCst),
            cancelled,
            elapsed,
        })
    }

    /// Sample one tile and paint its blocks. Returns the number of samples
    /// taken.
    ///
    /// * `tile`      - The tile.
    /// * `root_size` - Size of the tile covering the image.
    /// * `width`     - Image width in pixels.
    /// * `height`    - Image height in pixels.
    /// * `oracle`    - Source of radiance.
    /// * `display`   - Receives the blocks.
    /// * `stats`     - Counters to update.
    #[allow(clippy::too_many_arguments)]
    fn render_tile(
        &self,
        tile: &Tile,
        root_size: usize,
        width: usize,
        height: usize,
        oracle: &dyn RadianceOracle,
        display: &dyn Display,
        stats: &mut SamplingStats,
    ) -> u64 {
        let step = tile.step();
        // Points on the parent's grid were sampled by the parent.
        let parent_mask = 2 * step - 1;
        let refining = tile.size < root_size;
        let mut sampled = 0;

        for i in 0..TILE_SAMPLES {
            let y = tile.y + i * step;
            if y >= height {
                break;
            }
            for j in 0..TILE_SAMPLES {
                let x = tile.x + j * step;
                if x >= width {
                    break;
                }
                if refining && x & parent_mask == 0 && y & parent_mask == 0 {
                    continue;
                }

                let color = self.sample(x, y, oracle, stats);
                let bounds = Bounds2i::new(
                    Point2i::from(Point2::new(x, y)),
                    Point2i::from(Point2::new(min(x + step, width), min(y + step, height))),
                );
                display.image_fill(&bounds, color);
                sampled += 1;
            }
        }
        sampled
    }

    /// Trace one ray through the center of a pixel.
    ///
    /// * `x`      - Pixel column.
    /// * `y`      - Pixel row.
    /// * `oracle` - Source of radiance.
    /// * `stats`  - Counters to update.
    fn sample(&self, x: usize, y: usize, oracle: &dyn RadianceOracle, stats: &mut SamplingStats) -> Color {
        let mask = SIGMA_TABLE_SIZE - 1;
        let index = ((x & mask) * SIGMA_TABLE_SIZE + self.sigma[y & mask]) as u32;
        let request = SampleRequest {
            x: x as Float + 0.5,
            y: y as Float + 0.5,
            lens_u: halton(2, index),
            lens_v: halton(3, index),
            time: halton(1, index),
            seed: index,
        };

        stats.oracle_calls += 1;
        stats.evaluated_samples += 1;
        let background = self.settings.background;
        match oracle.radiance(&request) {
            None => background,
            Some(hit) if hit.color.is_finite() => hit.color,
            Some(hit) => {
                error!(
                    "Non-finite radiance value {} returned for sample {request}. Using background.",
                    hit.color
                );
                stats.invalid_radiance += 1;
                background
            }
        }
    }
}
