//! Worker Pool

use super::WorkerPriority;
use crate::common::*;
use crate::sampler::SamplingStats;

/// Run `work` on a pool of scoped worker threads and return the sum of the
/// statistics they report. Each worker receives its id in `[0, workers)`.
/// Workers that fail to start or panic are logged and skipped. If no worker
/// could be started, `work(0)` runs on the calling thread.
///
/// * `workers`  - Number of worker threads; at least one is used.
/// * `priority` - Requested worker priority, recorded in thread names.
/// * `label`    - Prefix of the thread names.
/// * `work`     - The worker body.
pub fn run_workers<F>(workers: usize, priority: WorkerPriority, label: &str, work: F) -> SamplingStats
where
    F: Fn(usize) -> SamplingStats + Sync,
{
    let workers = max(workers, 1);
    let mut total = SamplingStats::default();

    let scoped = crossbeam::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let work = &work;
            let spawned = scope
                .builder()
                .name(format!("{label}-{priority}-{worker_id}"))
                .spawn(move |_| {
                    debug!("{label} worker {worker_id} started ({priority} priority)");
                    let stats = work(worker_id);
                    debug!("{label} worker {worker_id} finished");
                    stats
                });
            match spawned {
                Ok(handle) => handles.push((worker_id, handle)),
                Err(err) => error!("Failed to start {label} worker {} of {workers}: {err}", worker_id + 1),
            }
        }

        if handles.is_empty() {
            warn!("No {label} workers could be started; rendering on the calling thread");
            total += work(0);
        }

        for (worker_id, handle) in handles {
            match handle.join() {
                Ok(stats) => total += stats,
                Err(_) => error!("{label} worker {} of {workers} panicked", worker_id + 1),
            }
        }
    });
    if scoped.is_err() {
        error!("{label} workers did not shut down cleanly");
    }

    total
}
