//! Render Context
//!
//! Progress reporting and cancellation shared by the render workers. The
//! context is created by the caller and passed down explicitly.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag. Clones share the same flag so one can be
/// handed to another thread while the render holds the other.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    /// Set once cancellation is requested.
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Workers stop after finishing their current
    /// bucket.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns true if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Receives render progress. Called concurrently from the render workers.
pub trait ProgressReporter: Send + Sync {
    /// A task with `total` steps is starting.
    ///
    /// * `total`   - Number of steps.
    /// * `message` - Task description.
    fn start(&self, total: u64, message: &str);

    /// `delta` more steps are done.
    ///
    /// * `delta` - Number of steps completed since the last call.
    fn inc(&self, delta: u64);

    /// The task is over.
    ///
    /// * `message` - Final status.
    fn finish(&self, message: &str);
}

/// Atomic reference counted `ProgressReporter`.
pub type ArcProgressReporter = Arc<dyn ProgressReporter>;

/// Discards progress.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn start(&self, _total: u64, _message: &str) {}

    fn inc(&self, _delta: u64) {}

    fn finish(&self, _message: &str) {}
}

/// Shows progress as a terminal progress bar.
pub struct IndicatifProgress {
    /// The progress bar.
    bar: ProgressBar,
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatifProgress {
    /// Create a new progress bar. It stays hidden until a task starts.
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg} ({eta})",
        )
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressReporter for IndicatifProgress {
    fn start(&self, total: u64, message: &str) {
        self.bar.reset();
        self.bar.set_length(total);
        self.bar.set_message(message.to_string());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Cancellation and progress for one render.
#[derive(Clone)]
pub struct RenderContext {
    /// Cancellation flag polled between buckets.
    cancel: CancelToken,

    /// Progress sink.
    progress: ArcProgressReporter,
}

impl Default for RenderContext {
    /// A context that is never cancelled and reports nothing.
    fn default() -> Self {
        Self::new(CancelToken::new(), Arc::new(NullProgress))
    }
}

impl RenderContext {
    /// Create a new `RenderContext`.
    ///
    /// * `cancel`   - Cancellation flag.
    /// * `progress` - Progress sink.
    pub fn new(cancel: CancelToken, progress: ArcProgressReporter) -> Self {
        Self { cancel, progress }
    }

    /// Returns the cancellation flag.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Returns true if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns the progress sink.
    pub fn progress(&self) -> &dyn ProgressReporter {
        self.progress.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());

        let ctx = RenderContext::new(other, Arc::new(NullProgress));
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn default_context_is_not_cancelled() {
        let ctx = RenderContext::default();
        assert!(!ctx.is_cancelled());
        ctx.progress().start(4, "test");
        ctx.progress().inc(1);
        ctx.progress().finish("done");
    }

    #[test]
    fn progress_bar_counts_every_step_across_threads() {
        const THREADS: u64 = 8;
        const STEPS: u64 = 20_000;

        let progress = IndicatifProgress::new();
        progress.bar.set_draw_target(ProgressDrawTarget::hidden());
        progress.start(THREADS * STEPS, "test");
        crossbeam::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|_| {
                    for _ in 0..STEPS {
                        progress.inc(1);
                    }
                });
            }
        })
        .unwrap();
        assert_eq!(progress.bar.position(), THREADS * STEPS);
        progress.finish("done");
    }

    #[test]
    fn progress_bar_restarts_from_zero() {
        let progress = IndicatifProgress::new();
        progress.bar.set_draw_target(ProgressDrawTarget::hidden());
        progress.start(10, "first");
        progress.inc(7);
        progress.start(4, "second");
        progress.inc(1);
        assert_eq!(progress.bar.position(), 1);
        assert_eq!(progress.bar.length(), Some(4));
    }
}
