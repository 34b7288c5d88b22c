//! Adaptive Image Sampler
//!
//! Renders one bucket at a time. Each bucket is covered by a grid of
//! subpixel samples padded by the filter radius. Samples are traced on a
//! coarse lattice first; cells whose corners disagree are split recursively
//! down to the finest step and everything left is bilinearly interpolated.
//! The grid is then filtered into pixels.

mod image_sample;
mod settings;
mod stats;

use crate::color::*;
use crate::common::*;
use crate::filter::*;
use crate::geometry::*;
use crate::oracle::*;
use crate::qmc::*;
use itertools::iproduct;
use std::sync::Arc;

// Re-export
pub use image_sample::*;
pub use settings::*;
pub use stats::*;

/// Number of sigma table entries per subpixel.
const SIGMA_TABLE_SCALE: usize = 128;

/// The filtered pixels of a bucket.
#[derive(Clone, Debug)]
pub struct BucketResult {
    /// Colors of the bucket pixels in scanline order.
    pub colors: Vec<Color>,

    /// Counters collected while sampling the bucket.
    pub stats: SamplingStats,
}

/// Adaptive anti-aliasing sampler. Shared read-only by all render workers;
/// all per-bucket state lives in a `SampleGrid`.
pub struct AdaptiveSampler {
    /// Anti-aliasing settings.
    settings: AaSettings,

    /// Reconstruction filter.
    filter: ArcFilter,

    /// Subpixels along one side of a pixel.
    sub_pixel_size: usize,

    /// Finest refinement step in subpixels.
    min_step_size: usize,

    /// Coarsest refinement step in subpixels.
    max_step_size: usize,

    /// Contrast threshold for the coarsest cells.
    threshold: Float,

    /// Subpixels of padding around a bucket.
    filter_padding: usize,

    /// Half the filter width in pixels.
    filter_half_size: Float,

    /// Bit reversal table used to jitter samples and pick QMC indices.
    sigma: Vec<usize>,

    /// Output the sampled fraction of each pixel instead of its color.
    display_aa: bool,

    /// Color of samples that miss the scene.
    background: Color,
}

impl AdaptiveSampler {
    /// Create a new `AdaptiveSampler`.
    ///
    /// * `settings`   - Anti-aliasing settings.
    /// * `filter`     - Reconstruction filter.
    /// * `display_aa` - Output sampling density instead of color.
    /// * `background` - Color of samples that miss the scene.
    pub fn new(settings: AaSettings, filter: ArcFilter, display_aa: bool, background: Color) -> Self {
        let sub_pixel_size = settings.sub_pixel_size();
        let filter_size = filter.size();
        Self {
            settings,
            sub_pixel_size,
            min_step_size: settings.min_step_size(),
            max_step_size: settings.max_step_size(),
            threshold: settings.threshold(),
            filter_padding: settings.filter_padding(filter_size),
            filter_half_size: 0.5 * filter_size,
            sigma: generate_sigma_table(sub_pixel_size * SIGMA_TABLE_SCALE),
            filter: Arc::clone(&filter),
            display_aa,
            background,
        }
    }

    /// Returns the anti-aliasing settings.
    pub fn settings(&self) -> &AaSettings {
        &self.settings
    }

    /// Returns the reconstruction filter.
    pub fn filter(&self) -> &ArcFilter {
        &self.filter
    }

    /// Returns the subpixels of padding added around each bucket.
    pub fn filter_padding(&self) -> usize {
        self.filter_padding
    }

    /// Returns the dimensions of the subpixel grid for a bucket.
    ///
    /// * `bucket_width`  - Bucket width in pixels.
    /// * `bucket_height` - Bucket height in pixels.
    pub fn grid_size(&self, bucket_width: usize, bucket_height: usize) -> (usize, usize) {
        let step = self.max_step_size;
        let pad = |n: usize| {
            // Round up to whole coarse cells, plus the far corners.
            let n = (n * self.sub_pixel_size + 2 * self.filter_padding + step - 1) & !(step - 1);
            if step > 1 {
                n + 1
            } else {
                n
            }
        };
        (pad(bucket_width), pad(bucket_height))
    }

    /// Sample and filter one bucket.
    ///
    /// * `bounds` - Pixel bounds of the bucket.
    /// * `oracle` - Source of radiance.
    pub fn render_bucket(&self, bounds: &Bounds2i, oracle: &dyn RadianceOracle) -> BucketResult {
        let mut grid = SampleGrid::new(self, bounds, oracle);
        grid.refine_all();

        let colors = if self.display_aa {
            grid.coverage()
        } else {
            grid.reconstruct()
        };

        let mut stats = grid.stats;
        stats.buckets = 1;
        BucketResult { colors, stats }
    }
}

/// Subpixel samples of one bucket and its filter padding, in row-major order.
struct SampleGrid<'a> {
    /// Sampler settings.
    sampler: &'a AdaptiveSampler,

    /// Source of radiance.
    oracle: &'a dyn RadianceOracle,

    /// Pixel bounds of the bucket.
    bounds: Bounds2i,

    /// Grid width in subpixels.
    width: usize,

    /// Grid height in subpixels.
    height: usize,

    /// The samples.
    samples: Vec<ImageSample>,

    /// Counters.
    stats: SamplingStats,
}

impl<'a> SampleGrid<'a> {
    /// Allocate the samples of a bucket and compute their jittered positions
    /// and QMC indices.
    ///
    /// * `sampler` - Sampler settings.
    /// * `bounds`  - Pixel bounds of the bucket.
    /// * `oracle`  - Source of radiance.
    fn new(sampler: &'a AdaptiveSampler, bounds: &Bounds2i, oracle: &'a dyn RadianceOracle) -> Self {
        let sub = sampler.sub_pixel_size;
        let (width, height) = sampler.grid_size(bounds.width() as usize, bounds.height() as usize);

        // Global subpixel coordinates of the first sample.
        let sx0 = bounds.p_min.x * sub as Int - sampler.filter_padding as Int;
        let sy0 = bounds.p_min.y * sub as Int - sampler.filter_padding as Int;

        let sigma = &sampler.sigma;
        let len = sigma.len();
        let mask = (len - 1) as Int;
        let inv_len = 1.0 / len as Float;
        let inv_sub = 1.0 / sub as Float;
        let jitter = sampler.settings.max_depth < 0;

        let samples = iproduct!(0..height, 0..width)
            .map(|(y, x)| {
                let sx = sx0 + x as Int;
                let sy = sy0 + y as Int;
                let j = (sx & mask) as usize;
                let k = (sy & mask) as usize;
                let index = (j * len + sigma[k]) as u32;
                let (dx, dy) = if jitter {
                    (sigma[k] as Float * inv_len, sigma[j] as Float * inv_len)
                } else {
                    (0.5, 0.5)
                };
                let p = Point2f::new((sx as Float + dx) * inv_sub, (sy as Float + dy) * inv_sub);
                ImageSample::new(p, index)
            })
            .collect();

        Self {
            sampler,
            oracle,
            bounds: *bounds,
            width,
            height,
            samples,
            stats: SamplingStats::default(),
        }
    }

    /// Refine every coarse cell of the grid.
    fn refine_all(&mut self) {
        let step = self.sampler.max_step_size;
        let thresh = self.sampler.threshold;
        let xs = (0..self.width - 1).step_by(step);
        let ys = (0..self.height - 1).step_by(step);
        for (x, y) in iproduct!(xs, ys) {
            self.refine(x, y, step, thresh);
        }

        // A grid one sample wide or tall has no cells.
        for i in 0..self.samples.len() {
            if !self.samples[i].is_processed() {
                self.evaluate(i);
            }
        }
    }

    /// Trace the corners of a cell, then either split it or interpolate it.
    ///
    /// * `x`      - Column of the top-left corner.
    /// * `y`      - Row of the top-left corner.
    /// * `step`   - Cell size in subpixels.
    /// * `thresh` - Contrast threshold for this cell size.
    fn refine(&mut self, x: usize, y: usize, step: usize, thresh: Float) {
        let w = self.width;
        let i00 = x + y * w;
        let i01 = i00 + step * w;
        let i10 = i00 + step;
        let i11 = i01 + step;

        let s00 = self.ensure_evaluated(i00);
        let s01 = self.ensure_evaluated(i01);
        let s10 = self.ensure_evaluated(i10);
        let s11 = self.ensure_evaluated(i11);

        if step > self.sampler.min_step_size
            && (s00.is_different(&s01, thresh)
                || s00.is_different(&s10, thresh)
                || s00.is_different(&s11, thresh)
                || s01.is_different(&s11, thresh)
                || s10.is_different(&s11, thresh)
                || s01.is_different(&s10, thresh))
        {
            self.stats.subdivisions += 1;
            let half = step >> 1;
            let thresh = 2.0 * thresh;
            self.refine(x, y, half, thresh);
            self.refine(x + half, y, half, thresh);
            self.refine(x, y + half, half, thresh);
            self.refine(x + half, y + half, half, thresh);
            return;
        }

        let ds = 1.0 / step as Float;
        for (j, i) in iproduct!(0..=step, 0..=step) {
            let sample = &mut self.samples[x + i + (y + j) * w];
            if !sample.is_processed() {
                let c = bilerp(
                    &s00.color,
                    &s01.color,
                    &s10.color,
                    &s11.color,
                    i as Float * ds,
                    j as Float * ds,
                );
                sample.status = SampleStatus::Interpolated(c);
                self.stats.interpolated_samples += 1;
            }
        }
    }

    /// Returns the evaluation of a sample, tracing it if needed. Interpolated
    /// samples that become cell corners are traced.
    ///
    /// * `i` - Sample offset.
    fn ensure_evaluated(&mut self, i: usize) -> Evaluation {
        match self.samples[i].status {
            SampleStatus::Evaluated(e) => e,
            _ => self.evaluate(i),
        }
    }

    /// Trace a sample through the oracle, averaging super samples that vary
    /// time and lens position.
    ///
    /// * `i` - Sample offset.
    fn evaluate(&mut self, i: usize) -> Evaluation {
        let sample = self.samples[i];
        let q0 = halton(1, sample.index);
        let q1 = halton(2, sample.index);
        let q2 = halton(3, sample.index);

        let request = SampleRequest {
            x: sample.p.x,
            y: sample.p.y,
            lens_u: q1,
            lens_v: q2,
            time: q0,
            seed: sample.index,
        };
        let mut evaluation = self.trace(&request);

        let n = self.sampler.settings.super_sampling;
        if n > 1 {
            let inv_n = 1.0 / n as f64;
            for k in 1..n {
                let k32 = k as u32;
                let super_sample = SampleRequest {
                    lens_u: mod1(q1 + halton(0, k32)),
                    lens_v: mod1(q2 + halton(1, k32)),
                    time: mod1(q0 + k as f64 * inv_n),
                    seed: sample.index.wrapping_add(k32),
                    ..request
                };
                // Only the first ray's owner takes part in the contrast test.
                evaluation.color += self.trace(&super_sample).color;
            }
            evaluation.color *= inv_n as Float;
        }

        self.samples[i].status = SampleStatus::Evaluated(evaluation);
        self.stats.evaluated_samples += 1;
        evaluation
    }

    /// Call the oracle for one ray.
    ///
    /// * `request` - The sample request.
    fn trace(&mut self, request: &SampleRequest) -> Evaluation {
        self.stats.oracle_calls += 1;
        let background = self.sampler.background;

        match self.oracle.radiance(request) {
            None => Evaluation {
                color: background,
                owner: None,
            },
            Some(hit) => {
                let color = if hit.color.is_finite() {
                    hit.color
                } else {
                    error!(
                        "Non-finite radiance value {} returned for sample {request}. Using background.",
                        hit.color
                    );
                    self.stats.invalid_radiance += 1;
                    background
                };
                Evaluation {
                    color,
                    owner: Some(Owner::from(&hit)),
                }
            }
        }
    }

    /// Returns the samples covering a pixel.
    ///
    /// * `x` - Pixel column within the bucket.
    /// * `y` - Pixel row within the bucket.
    fn pixel_samples(&self, x: usize, y: usize) -> impl Iterator<Item = &ImageSample> + '_ {
        let sub = self.sampler.sub_pixel_size;
        let gx = x * sub + self.sampler.filter_padding;
        let gy = y * sub + self.sampler.filter_padding;
        iproduct!(gy..gy + sub, gx..gx + sub).map(move |(sy, sx)| &self.samples[sx + sy * self.width])
    }

    /// Returns the color of a sample.
    ///
    /// * `sample` - The sample.
    fn sample_color(&self, sample: &ImageSample) -> Color {
        sample.color().unwrap_or(self.sampler.background)
    }

    /// Filter the samples into pixels.
    fn reconstruct(&mut self) -> Vec<Color> {
        let sampler = self.sampler;
        let sub = sampler.sub_pixel_size;
        let window = sub + 2 * sampler.filter_padding;
        let fhs = sampler.filter_half_size;
        let bw = self.bounds.width() as usize;
        let bh = self.bounds.height() as usize;

        let mut zero_weight_pixels = 0;
        let colors: Vec<Color> = iproduct!(0..bh, 0..bw)
            .map(|(y, x)| {
                let center = Point2f::new(
                    (self.bounds.p_min.x + x as Int) as Float + 0.5,
                    (self.bounds.p_min.y + y as Int) as Float + 0.5,
                );

                let mut c = Color::BLACK;
                let mut weight = 0.0;
                for (sy, sx) in iproduct!(y * sub..y * sub + window, x * sub..x * sub + window) {
                    let sample = &self.samples[sx + sy * self.width];
                    let d = sample.p - center;
                    if abs(d.x) > fhs || abs(d.y) > fhs {
                        continue;
                    }
                    let f = sampler.filter.evaluate(&d);
                    c.madd(f, &self.sample_color(sample));
                    weight += f;
                }

                if weight != 0.0 {
                    c * (1.0 / weight)
                } else {
                    zero_weight_pixels += 1;
                    let mut mean = Color::BLACK;
                    for sample in self.pixel_samples(x, y) {
                        mean += self.sample_color(sample);
                    }
                    mean * (1.0 / (sub * sub) as Float)
                }
            })
            .collect();

        if zero_weight_pixels > 0 {
            warn!(
                "Filter weights summed to zero for {zero_weight_pixels} pixels of bucket {}; using unfiltered means",
                self.bounds
            );
            self.stats.zero_weight_pixels += zero_weight_pixels;
        }

        colors
    }

    /// Returns the fraction of traced subpixels of each pixel as a gray level.
    fn coverage(&self) -> Vec<Color> {
        let sub = self.sampler.sub_pixel_size;
        let inv_area = 1.0 / (sub * sub) as Float;
        let bw = self.bounds.width() as usize;
        let bh = self.bounds.height() as usize;

        iproduct!(0..bh, 0..bw)
            .map(|(y, x)| {
                let traced = self.pixel_samples(x, y).filter(|s| s.is_evaluated()).count();
                Color::gray(traced as Float * inv_area)
            })
            .collect()
    }
}
