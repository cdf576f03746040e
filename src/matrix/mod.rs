//! Dense integer matrices and the sequential baseline.
//!
//! A [`Matrix`] is stored row-major in one pre-sized buffer, so every row
//! is a disjoint slot that can be handed out as its own `&mut [i64]`. The
//! threaded path relies on this to write rows without any locking.

pub mod naive_ijk;
pub mod row;

use std::{mem, ops::Index, ops::RangeInclusive};

use rand::{
    Rng,
    distributions::{Distribution, Uniform},
};

use crate::error::{Error, Result};

/// Element type of every matrix in this crate.
///
/// All arithmetic on elements wraps on overflow.
pub type Element = i64;

/// A rectangular, row-major matrix of [`Element`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    data: Vec<Element>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Creates a `rows × cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates the `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        m
    }

    /// Builds a matrix from nested rows.
    ///
    /// Every row must have the length of the first one, otherwise
    /// [`Error::RaggedRows`] names the offending row. An empty outer
    /// vector gives a `0 × 0` matrix.
    pub fn from_rows(rows: Vec<Vec<Element>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);

        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(Error::RaggedRows {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            data.extend_from_slice(values);
        }

        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Creates a matrix whose entries are drawn uniformly from `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        range: RangeInclusive<Element>,
        rng: &mut R,
    ) -> Self {
        let dist = Uniform::from(range);
        let data = (0..rows * cols).map(|_| dist.sample(rng)).collect();
        Self { data, rows, cols }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[Element] {
        assert!(i < self.rows, "row {} out of bounds ({} rows)", i, self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Element at row `i`, column `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Element {
        self.row(i)[j]
    }

    /// The underlying row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[Element] {
        &self.data
    }

    /// The underlying row-major storage, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Element] {
        &mut self.data
    }

    /// Splits the matrix into one exclusive slice per row, in row order.
    ///
    /// Always yields exactly `self.rows()` items, even when the matrix has
    /// no columns.
    pub fn rows_mut(&mut self) -> RowsMut<'_> {
        RowsMut {
            rest: &mut self.data,
            cols: self.cols,
            remaining: self.rows,
        }
    }

    /// Copies the matrix back out into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<Element>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }
}

impl Index<usize> for Matrix {
    type Output = [Element];

    fn index(&self, i: usize) -> &[Element] {
        self.row(i)
    }
}

/// Iterator over disjoint mutable rows, created by [`Matrix::rows_mut`].
#[derive(Debug)]
pub struct RowsMut<'a> {
    rest: &'a mut [Element],
    cols: usize,
    remaining: usize,
}

impl<'a> Iterator for RowsMut<'a> {
    type Item = &'a mut [Element];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let (row, rest) = mem::take(&mut self.rest).split_at_mut(self.cols);
        self.rest = rest;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RowsMut<'_> {}

/// Checks that `a * b` is defined.
pub(crate) fn check_dimensions(a: &Matrix, b: &Matrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(Error::DimensionMismatch {
            left_cols: a.cols(),
            right_rows: b.rows(),
        });
    }
    Ok(())
}
