use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{SvgsError, SvgsResult};

/// Default ceiling on in-flight file operations.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Bounded pool for per-file work (read, hash, transform, write).
///
/// Keeps large asset trees from exhausting file descriptors.
pub fn worker_pool(concurrency: usize) -> SvgsResult<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .thread_name(|idx| format!("svgs-worker-{}", idx))
        .build()
        .map_err(|e| SvgsError::InvalidInput(format!("Failed to start worker pool: {}", e)))
}
