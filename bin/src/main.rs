#[macro_use]
extern crate log;

mod app;
mod scene;

use app::*;
use bucket_orders::*;
use clap::Parser;
use filters::*;
use render_core::context::*;
use render_core::display::*;
use render_core::renderer::*;
use scene::*;
use std::sync::Arc;

#[cfg(all(feature = "dhat-rs", feature = "jemalloc"))]
compile_error!("feature 'dhat-rs' and feature 'jemalloc' cannot be enabled at the same time");

#[cfg(feature = "dhat-rs")]
use dhat::{Dhat, DhatAlloc};

#[cfg(feature = "dhat-rs")]
#[global_allocator]
static ALLOCATOR: DhatAlloc = DhatAlloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

fn main() {
    #[cfg(feature = "dhat-rs")]
    let _dhat = Dhat::start_heap_profiling();

    let options = Options::parse();

    // Initialize `env_logger`.
    let mut logger = env_logger::Builder::from_default_env();
    if options.quiet {
        logger.filter_level(log::LevelFilter::Error);
    }
    logger.init();

    if let Err(e) = render(&options) {
        error!("{e}");
    }
}

fn render(options: &Options) -> Result<(), String> {
    let (width, height) = options.resolution()?;

    let progress: ArcProgressReporter = if options.quiet {
        Arc::new(NullProgress)
    } else {
        Arc::new(IndicatifProgress::new())
    };
    let cancel = CancelToken::new();
    if let Err(err) = ctrlc::set_handler(interrupt_handler(cancel.clone())) {
        warn!("Unable to install the Ctrl-C handler: {err}");
    }
    let context = RenderContext::new(cancel, progress);
    let scene = TestScene::new(width, height);

    let display: Box<dyn Display> = match &options.image_file {
        Some(path) => Box::new(FileDisplay::new(path)),
        None => {
            warn!("No output file given; the image is discarded");
            Box::new(SilentDisplay)
        }
    };

    if options.progressive {
        let renderer = ProgressiveRenderer::new(options.renderer_settings());
        let summary = renderer.render(width, height, &scene, display.as_ref(), &context)?;
        if summary.pixels_rendered < summary.pixel_count {
            return Err(format!(
                "Rendered {} of {} pixels",
                summary.pixels_rendered, summary.pixel_count
            ));
        }
        return Ok(());
    }

    let renderer = BucketRenderer::new(
        options.renderer_settings(),
        create_filter(&options.filter),
        create_bucket_order(&options.bucket_order),
    );
    let job = renderer.prepare(width, height)?;
    let summary = job.render(&scene, display.as_ref(), &context);

    if summary.buckets_rendered < summary.bucket_count {
        return Err(format!(
            "Rendered {} of {} buckets",
            summary.buckets_rendered, summary.bucket_count
        ));
    }
    Ok(())
}

/// Returns a Ctrl-C handler that lets the workers finish their current
/// bucket and then stops the render.
///
/// * `cancel` - Cancellation flag of the render.
fn interrupt_handler(cancel: CancelToken) -> impl FnMut() + Send + 'static {
    move || {
        warn!("Interrupted; stopping after the buckets in progress");
        cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_cancels_the_render() {
        let cancel = CancelToken::new();
        let context = RenderContext::new(cancel.clone(), Arc::new(NullProgress));
        let mut handler = interrupt_handler(cancel);
        assert!(!context.is_cancelled());
        handler();
        assert!(context.is_cancelled());
        handler();
        assert!(context.is_cancelled());
    }
}
