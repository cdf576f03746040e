//! The unit of work: one output row.

use crate::matrix::{Element, Matrix, row::multiply_row};

/// Computes row `index` of `a * b` into an exclusive slice of the result.
///
/// Holding `&mut` to its own row is what lets tasks run concurrently
/// without a lock on the result: no two tasks can ever be given the same
/// slice.
#[derive(Debug)]
pub struct RowTask<'t> {
    index: usize,
    a: &'t Matrix,
    b: &'t Matrix,
    out: &'t mut [Element],
}

impl<'t> RowTask<'t> {
    /// Creates the task for row `index`.
    ///
    /// `out` must be row `index` of a `a.rows() × b.cols()` result and
    /// `a.cols()` must equal `b.rows()`.
    pub fn new(index: usize, a: &'t Matrix, b: &'t Matrix, out: &'t mut [Element]) -> Self {
        debug_assert_eq!(a.cols(), b.rows());
        debug_assert_eq!(out.len(), b.cols());
        Self { index, a, b, out }
    }

    /// Row of the result this task writes.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn run(self) {
        multiply_row(
            self.a.row(self.index),
            self.b.as_slice(),
            self.out,
            self.b.cols(),
            self.a.cols(),
        );
    }
}
