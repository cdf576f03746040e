//! FIFO task queue shared between the dispatcher and the workers.

use std::{
    collections::VecDeque,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
};

/// A one-shot unit of work borrowing data for `'t`.
pub type Task<'t> = Box<dyn FnOnce() + Send + 't>;

#[derive(Default)]
struct State<'t> {
    pending: VecDeque<Task<'t>>,
    stopped: bool,
}

/// Unbounded FIFO of [`Task`]s with a "no more work" flag.
///
/// The pending tasks and the flag live under a single mutex so workers
/// always check and act on both together. Each queue belongs to exactly
/// one dispatch; a stopped queue is never reopened.
#[derive(Default)]
pub struct TaskQueue<'t> {
    state: Mutex<State<'t>>,
    available: Condvar,
}

impl<'t> TaskQueue<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    // Tasks never run while the lock is held, so a poisoned lock still
    // guards consistent state.
    fn lock(&self) -> MutexGuard<'_, State<'t>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `task` to the back of the queue and wakes one waiting worker.
    pub fn enqueue(&self, task: Task<'t>) {
        let mut state = self.lock();
        debug_assert!(!state.stopped, "enqueue after stop");
        state.pending.push_back(task);
        drop(state);

        self.available.notify_one();
    }

    /// Blocks until a task is available or the queue is stopped.
    ///
    /// Returns the front task, or `None` once the queue is both stopped
    /// and empty. Pending tasks are still handed out after [`stop`].
    ///
    /// [`stop`]: Self::stop
    pub fn wait_and_take(&self) -> Option<Task<'t>> {
        let mut state = self.lock();
        loop {
            if let Some(task) = state.pending.pop_front() {
                return Some(task);
            }
            if state.stopped {
                return None;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Marks that no more tasks will arrive and wakes every worker.
    pub fn stop(&self) {
        self.lock().stopped = true;
        self.available.notify_all();
    }

    /// Number of tasks not yet taken by a worker.
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
