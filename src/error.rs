//! Errors reported by the multiplication entry points and the worker pool.

use std::io;

use thiserror::Error;

use crate::config::WORKER_THREADS_VAR;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The left matrix's column count does not match the right matrix's
    /// row count.
    #[error("cannot multiply: left matrix has {left_cols} columns but right matrix has {right_rows} rows")]
    DimensionMismatch { left_cols: usize, right_rows: usize },

    /// A matrix was built from rows of differing lengths.
    #[error("row {row} has {found} elements, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A pool was requested with zero worker threads.
    #[error("thread count must be at least 1")]
    NoThreads,

    /// The OS refused to create a worker thread.
    #[error("failed to spawn worker thread")]
    Spawn(#[source] io::Error),

    /// A worker thread terminated by panicking while running a task.
    #[error("worker {worker} panicked while running a task")]
    WorkerPanicked { worker: usize },

    /// The worker thread override in the environment is not a natural number.
    #[error("invalid value in {}; must be a natural number", WORKER_THREADS_VAR)]
    BadConfiguration,
}
