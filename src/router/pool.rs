//! Bounded pool for blocking model calls.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoolError {
    #[error("timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("worker pool is closed")]
    Closed,

    #[error("worker panicked: {reason}")]
    Panicked { reason: String },
}

/// Runs blocking closures on tokio's blocking threads, at most `size` at a time, each
/// bounded by a deadline that includes time spent queueing for a slot.
///
/// A deadline abandons the caller's wait but cannot stop the closure; its slot stays
/// taken until the closure returns, so the concurrency bound holds under timeouts.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
    timeout: Duration,
}

impl WorkerPool {
    pub fn new(size: usize, timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
            timeout,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub async fn run<F, T>(&self, task: F) -> Result<T, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let work = async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|_| PoolError::Closed)?;

            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                task()
            })
            .await
            .map_err(|e| PoolError::Panicked {
                reason: e.to_string(),
            })
        };

        tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| PoolError::Timeout {
                after: self.timeout,
            })?
    }
}
