//! Integer matrix multiplication on a hand-built worker pool.
//!
//! The parallel path gives every output row its own task. Tasks go into a
//! mutex + condvar queue, a fixed set of worker threads drains it, and the
//! caller joins the workers before getting the result back. The sequential
//! triple loop is kept alongside as the baseline it is measured against.
//!
//! ## Usage
//!
//! ```
//! use matmul_pool::{Matrix, multiply, multiply_sequential};
//!
//! let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
//! let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
//!
//! let c = multiply(&a, &b, 4).unwrap();
//! assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
//! assert_eq!(c, multiply_sequential(&a, &b).unwrap());
//! ```
//!
//! ## What's inside
//!
//! - `matrix`: row-major storage with disjoint mutable rows, the i-j-k baseline
//! - `threaded`: task queue, worker pool, row tasks and the dispatcher
//! - `trial`: random operands, timing and the per-trial log used by the binary

pub mod config;
pub mod error;
pub mod matrix;
pub mod threaded;
pub mod trial;

pub use config::Config;
pub use error::{Error, Result};
pub use matrix::{Element, Matrix};

use matrix::{check_dimensions, naive_ijk::matmul_naive_ijk};

/// Matrix multiply on a pool of `threads` workers: returns A * B.
///
/// A is m×k, B is k×n, the result is m×n.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if `a.cols() != b.rows()` and
/// [`Error::NoThreads`] if `threads` is zero, both before any thread is
/// spawned. Worker spawn failures and worker panics are passed through.
pub fn multiply(a: &Matrix, b: &Matrix, threads: usize) -> Result<Matrix> {
    let config = Config::with_threads(threads)?;
    multiply_with(a, b, &config)
}

/// Same as [`multiply`] with the worker count taken from `config`.
pub fn multiply_with(a: &Matrix, b: &Matrix, config: &Config) -> Result<Matrix> {
    threaded::matmul_rows_mt(a, b, config.threads)
}

/// Single-threaded triple-loop multiply: returns A * B.
///
/// Produces exactly the same matrix as [`multiply`] for any valid input.
pub fn multiply_sequential(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_dimensions(a, b)?;

    let (m, n, k) = (a.rows(), b.cols(), a.cols());
    let mut c = Matrix::zeros(m, n);
    matmul_naive_ijk(a.as_slice(), b.as_slice(), c.as_mut_slice(), m, n, k);
    Ok(c)
}
