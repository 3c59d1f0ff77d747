//! Concurrency management for pysift batch analysis.
//! Each file is analyzed independently; the pool only spreads whole calls.

use anyhow::{Context, Result};
use rayon::ThreadPool;

/// Worker count for a batch: `requested` if non-zero, else half the cores (at least 1).
pub fn worker_count(requested: usize) -> usize {
    if requested > 0 {
        return requested;
    }
    std::cmp::max(1, num_cpus::get() / 2)
}

/// Build a local rayon pool so repeated batches never fight over the global one.
pub fn build_pool(requested: usize) -> Result<ThreadPool> {
    let workers = worker_count(requested);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("pysift-worker-{i}"))
        .build()
        .context("Failed to build analysis thread pool")?;
    tracing::debug!(workers, cores = num_cpus::get(), "initialized thread pool");
    Ok(pool)
}
