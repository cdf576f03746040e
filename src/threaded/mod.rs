//! Multi-threaded multiplication on a fixed worker pool.
//!
//! Every call builds its own [`TaskQueue`] and [`WorkerPool`], enqueues one
//! [`RowTask`] per output row, stops the queue after the last enqueue and
//! joins every worker before returning. Nothing is shared between calls, so
//! a stop signal from one call can never reach the workers of another.
//!
//! Modules:
//! - `queue`: mutex + condvar FIFO of borrowed tasks
//! - `pool`: scoped worker threads draining a queue
//! - `row_task`: computes a single row of the product

pub mod pool;
pub mod queue;
pub mod row_task;

use std::{num::NonZeroUsize, thread};

use crate::{
    error::Result,
    matrix::{Matrix, check_dimensions},
};

pub use pool::{PoolReport, WorkerPool};
pub use queue::{Task, TaskQueue};
pub use row_task::RowTask;

/// Runs `tasks` to completion on a fresh pool of `threads` workers.
///
/// Tasks are enqueued in iteration order after the workers have started;
/// the queue is stopped once the iterator is exhausted and the call
/// returns only after every worker has been joined. Tasks may borrow
/// anything that outlives the call.
pub fn execute<'t, I, F>(threads: NonZeroUsize, tasks: I) -> Result<PoolReport>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() + Send + 't,
{
    let queue = TaskQueue::new();

    thread::scope(|s| {
        let pool = WorkerPool::start(s, &queue, threads)?;
        // Workers must be released even if the task iterator unwinds.
        let _guard = StopOnDrop(&queue);

        let mut enqueued = 0usize;
        for task in tasks {
            queue.enqueue(Box::new(task));
            enqueued += 1;
        }
        log::debug!("enqueued {enqueued} tasks on {} workers", pool.size());

        pool.stop();
        let report = pool.join_all()?;
        debug_assert_eq!(report.tasks, enqueued);
        Ok(report)
    })
}

struct StopOnDrop<'q, 't>(&'q TaskQueue<'t>);

impl Drop for StopOnDrop<'_, '_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Multiplies `a * b` with one task per row of `a`.
///
/// Dimensions are validated before the pool is created; on mismatch no
/// thread is spawned.
pub fn matmul_rows_mt(a: &Matrix, b: &Matrix, threads: NonZeroUsize) -> Result<Matrix> {
    check_dimensions(a, b)?;

    let mut result = Matrix::zeros(a.rows(), b.cols());
    let tasks = result.rows_mut().enumerate().map(|(index, out)| {
        let task = RowTask::new(index, a, b, out);
        move || task.run()
    });

    let report = execute(threads, tasks)?;
    debug_assert_eq!(report.tasks, a.rows());

    Ok(result)
}
