//! Fixed-size pool of scoped worker threads draining a [`TaskQueue`].
//!
//! Workers are spawned inside a [`thread::Scope`], which lets tasks borrow
//! the caller's matrices directly: the scope cannot end before every worker
//! is joined, so no task can outlive the data it points into.

use std::{
    num::NonZeroUsize,
    thread::{self, Scope, ScopedJoinHandle},
};

use super::queue::TaskQueue;
use crate::error::{Error, Result};

/// What a pool did between [`WorkerPool::start`] and [`WorkerPool::join_all`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolReport {
    /// Worker threads that were joined.
    pub workers: usize,
    /// Tasks executed across all workers.
    pub tasks: usize,
}

/// A running set of workers bound to one queue.
///
/// Lifecycle: [`start`](Self::start) → enqueue on the queue →
/// [`stop`](Self::stop) → [`join_all`](Self::join_all).
pub struct WorkerPool<'scope, 'q, 't> {
    queue: &'q TaskQueue<'t>,
    handles: Vec<ScopedJoinHandle<'scope, usize>>,
}

impl<'scope, 'q, 't> WorkerPool<'scope, 'q, 't>
where
    't: 'q,
    'q: 'scope,
{
    /// Spawns exactly `threads` workers on `scope`, all pulling from `queue`.
    ///
    /// If the OS refuses a thread, the queue is stopped so the workers that
    /// did start exit on their own, and [`Error::Spawn`] is returned.
    pub fn start<'env>(
        scope: &'scope Scope<'scope, 'env>,
        queue: &'q TaskQueue<'t>,
        threads: NonZeroUsize,
    ) -> Result<Self> {
        let mut handles = Vec::with_capacity(threads.get());

        for id in 0..threads.get() {
            let spawned = thread::Builder::new()
                .name(format!("matmul-worker-{id}"))
                .spawn_scoped(scope, move || worker_loop(id, queue));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    log::debug!("spawning worker {id} failed: {e}");
                    queue.stop();
                    return Err(Error::Spawn(e));
                }
            }
        }

        log::debug!("started {} workers", handles.len());
        Ok(Self { queue, handles })
    }

    /// Number of workers in the pool.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Signals that no more tasks will be enqueued.
    ///
    /// Workers finish what is already queued, then exit.
    pub fn stop(&self) {
        log::debug!("stopping pool with {} tasks still queued", self.queue.len());
        self.queue.stop();
    }

    /// Waits for every worker to terminate.
    ///
    /// All workers are joined even if some of them panicked; the first
    /// panicked worker is then reported as [`Error::WorkerPanicked`].
    pub fn join_all(self) -> Result<PoolReport> {
        let mut report = PoolReport::default();
        let mut panicked = None;

        for (id, handle) in self.handles.into_iter().enumerate() {
            match handle.join() {
                Ok(tasks) => report.tasks += tasks,
                Err(_) => {
                    panicked.get_or_insert(id);
                }
            }
            report.workers += 1;
        }

        log::debug!(
            "joined {} workers after {} tasks",
            report.workers,
            report.tasks
        );

        match panicked {
            Some(worker) => Err(Error::WorkerPanicked { worker }),
            None => Ok(report),
        }
    }
}

fn worker_loop(id: usize, queue: &TaskQueue<'_>) -> usize {
    log::trace!("worker {id} up");

    let mut executed = 0;
    while let Some(task) = queue.wait_and_take() {
        task();
        executed += 1;
    }

    log::trace!("worker {id} exiting after {executed} tasks");
    executed
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    fn threads(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_lifecycle_runs_every_task() {
        let counter = AtomicUsize::new(0);
        let queue = TaskQueue::new();

        let report = thread::scope(|s| {
            let pool = WorkerPool::start(s, &queue, threads(3)).unwrap();
            assert_eq!(pool.size(), 3);

            for _ in 0..100 {
                queue.enqueue(Box::new(|| {
                    counter.fetch_add(1, Ordering::Relaxed);
                }));
            }

            pool.stop();
            pool.join_all().unwrap()
        });

        assert_eq!(counter.load(Ordering::Relaxed), 100);
        assert_eq!(report, PoolReport { workers: 3, tasks: 100 });
        assert!(queue.is_empty());
    }

    #[test]
    fn test_idle_pool_shuts_down() {
        let queue = TaskQueue::new();

        let report = thread::scope(|s| {
            let pool = WorkerPool::start(s, &queue, threads(4)).unwrap();
            pool.stop();
            pool.join_all().unwrap()
        });

        assert_eq!(report, PoolReport { workers: 4, tasks: 0 });
    }

    #[test]
    fn test_tasks_run_on_worker_threads() {
        let names = Mutex::new(Vec::new());
        let queue = TaskQueue::new();

        thread::scope(|s| {
            let pool = WorkerPool::start(s, &queue, threads(2)).unwrap();
            for _ in 0..10 {
                queue.enqueue(Box::new(|| {
                    let name = thread::current().name().map(str::to_owned);
                    names.lock().unwrap().push(name);
                }));
            }
            pool.stop();
            pool.join_all().unwrap();
        });

        // The queue's boxed tasks borrow `names` until it is dropped.
        drop(queue);
        let names = names.into_inner().unwrap();
        assert_eq!(names.len(), 10);
        assert!(
            names
                .iter()
                .all(|n| n.as_deref().is_some_and(|n| n.starts_with("matmul-worker-")))
        );
    }

    #[test]
    fn test_panicking_task_is_reported() {
        let counter = AtomicUsize::new(0);
        let queue = TaskQueue::new();

        let result = thread::scope(|s| {
            let pool = WorkerPool::start(s, &queue, threads(2)).unwrap();
            queue.enqueue(Box::new(|| panic!("task failure")));
            for _ in 0..20 {
                queue.enqueue(Box::new(|| {
                    counter.fetch_add(1, Ordering::Relaxed);
                }));
            }
            pool.stop();
            pool.join_all()
        });

        assert!(matches!(result, Err(Error::WorkerPanicked { .. })));
        // The surviving worker drains the rest of the queue.
        assert_eq!(counter.load(Ordering::Relaxed), 20);
    }
}
