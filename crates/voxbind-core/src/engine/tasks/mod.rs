use crate::engine::error::PipelineError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod extraction;
pub mod generation;

/// Runs `task` once per item on a dedicated pool of `worker_count` threads.
///
/// Results come back in item order regardless of completion order. Without the
/// `parallel` feature the items run sequentially on the calling thread.
pub(crate) fn dispatch<T, R, F>(
    items: &[T],
    worker_count: usize,
    task: F,
) -> Result<Vec<R>, PipelineError>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|index| format!("voxbind-worker-{}", index))
            .build()
            .map_err(|e| PipelineError::WorkerPool(e.to_string()))?;
        Ok(pool.install(|| items.par_iter().map(&task).collect()))
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = worker_count;
        Ok(items.iter().map(task).collect())
    }
}
