//! Command line options

use clap::Parser;
use render_core::color::*;
use render_core::common::*;
use render_core::renderer::*;
use render_core::sampler::*;
use render_core::scheduler::*;

/// Command line options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Adaptive bucket renderer for a procedural test scene.", long_about = None)]
pub struct Options {
    /// Number of threads to use for rendering.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 0,
        help = "Use specified number of threads for rendering (0 uses all logical CPUs)."
    )]
    n_threads: usize,

    /// Bucket size.
    #[arg(
        long = "bucketsize",
        short = 'b',
        value_name = "NUM",
        default_value_t = DEFAULT_BUCKET_SIZE,
        help = "Size in pixels of square buckets rendered per thread."
    )]
    pub bucket_size: usize,

    /// Bucket order.
    #[arg(
        long = "bucketorder",
        value_name = "NAME",
        default_value = "hilbert",
        help = "Bucket order: row, column, diagonal, spiral, hilbert or random, optionally prefixed by 'reverse'."
    )]
    pub bucket_order: String,

    /// Minimum and maximum anti-aliasing depth.
    #[arg(
        long = "aa",
        num_args = 2,
        value_names = ["MIN", "MAX"],
        allow_negative_numbers = true,
        default_values_t = [0, 0],
        help = "Anti-aliasing depth range; negative values undersample."
    )]
    pub aa: Vec<Int>,

    /// Number of rays per image sample.
    #[arg(
        long = "aa-samples",
        value_name = "NUM",
        default_value_t = 1,
        help = "Number of rays traced per image sample (motion blur and depth of field)."
    )]
    pub super_sampling: usize,

    /// Contrast threshold.
    #[arg(
        long = "contrast",
        value_name = "FLOAT",
        default_value_t = DEFAULT_CONTRAST_THRESHOLD,
        help = "Contrast threshold that triggers subdivision."
    )]
    pub contrast: Float,

    /// Reconstruction filter.
    #[arg(
        long = "filter",
        value_name = "NAME",
        default_value = "box",
        help = "Reconstruction filter: box, triangle, gaussian, mitchell, catmull-rom, lanczos, sinc or blackman-harris."
    )]
    pub filter: String,

    /// Image resolution.
    #[arg(
        long = "resolution",
        num_args = 2,
        value_names = ["W", "H"],
        default_values_t = [640, 480],
        help = "Image width and height in pixels."
    )]
    pub resolution: Vec<usize>,

    /// Show sampling density.
    #[arg(long = "displayaa", help = "Output the sampling density instead of the image.")]
    pub display_aa: bool,

    /// Worker priority.
    #[arg(
        long = "priority",
        value_name = "PRIORITY",
        default_value_t = WorkerPriority::Normal,
        help = "Priority of the render threads: low, normal or high."
    )]
    pub priority: WorkerPriority,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Refine a preview of the whole image instead of rendering buckets.
    #[arg(long, help = "Render a progressively refined preview with one sample per pixel.")]
    pub progressive: bool,

    /// Path to the image file.
    #[arg(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        help = "Write the final image to the given filename (png, tga, exr or pfm)."
    )]
    pub image_file: Option<String>,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => max_threads,
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the image resolution.
    pub fn resolution(&self) -> Result<(usize, usize), String> {
        match self.resolution.as_slice() {
            [w, h] if *w > 0 && *h > 0 => Ok((*w, *h)),
            r => Err(format!("Invalid resolution {:?}", r)),
        }
    }

    /// Returns the anti-aliasing settings. Out of range values are clamped.
    pub fn aa_settings(&self) -> AaSettings {
        let (min_depth, max_depth) = match self.aa.as_slice() {
            [lo, hi] => (*lo, *hi),
            _ => (0, 0),
        };
        AaSettings::new(min_depth, max_depth, self.super_sampling, self.contrast)
    }

    /// Returns the renderer settings.
    pub fn renderer_settings(&self) -> RendererSettings {
        RendererSettings {
            aa: self.aa_settings(),
            bucket_size: self.bucket_size,
            threads: self.threads(),
            priority: self.priority,
            display_aa: self.display_aa,
            background: Color::BLACK,
        }
    }
}
