// docmatch/src/workers/pool.rs
//
// Bounded CPU pool: a semaphore in front of spawn_blocking.
//
// Extraction, normalization and alignment are pure CPU work. Running them
// on the blocking pool keeps the reactor free; the semaphore caps how many
// run at once across every batch sharing this pool.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::CompareError;

pub const DEFAULT_WORKERS: usize = 4;

#[derive(Clone)]
pub struct CpuPool {
    permits: Arc<Semaphore>,
    size:    usize,
    stats:   Arc<PoolStats>,
}

#[derive(Debug, Default)]
pub struct PoolStats {
    pub completed: AtomicU64,
    pub failed:    AtomicU64,
}

impl CpuPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
            stats: Arc::new(PoolStats::default()),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Run `job` on a blocking thread once a permit is free.
    /// A panic inside `job` surfaces as `CompareError::Worker`.
    pub async fn run<F, T>(&self, job: F) -> Result<T, CompareError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| CompareError::Worker(e.to_string()))?;

        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await;

        match joined {
            Ok(out) => {
                self.stats.completed.fetch_add(1, Ordering::Relaxed);
                Ok(out)
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                Err(e.into())
            }
        }
    }
}
