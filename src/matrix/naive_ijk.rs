use super::Element;

/// Naive matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple-loop implementation and the sequential
/// baseline the threaded path is timed against. The innermost loop walks
/// B with stride `n` (column-wise), so it misses cache on every step.
///
/// Unlike an accumulating GEMM this overwrites C, and all arithmetic wraps.
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `b` - Matrix B (k × n), row-major
/// * `c` - Matrix C (m × n), row-major, overwritten with A * B
/// * `m` - Rows of A and C
/// * `n` - Columns of B and C
/// * `k` - Columns of A, rows of B
pub fn matmul_naive_ijk(
    a: &[Element],
    b: &[Element],
    c: &mut [Element],
    m: usize,
    n: usize,
    k: usize,
) {
    for i in 0..m {
        for j in 0..n {
            let mut sum: Element = 0;
            for p in 0..k {
                sum = sum.wrapping_add(a[i * k + p].wrapping_mul(b[p * n + j]));
            }
            c[i * n + j] = sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2x3_times_3x2() {
        let a = [1, 2, 3, 4, 5, 6];
        let b = [7, 8, 9, 10, 11, 12];
        let mut c = [-1; 4];

        matmul_naive_ijk(&a, &b, &mut c, 2, 2, 3);

        assert_eq!(c, [58, 64, 139, 154]);
    }

    #[test]
    fn test_overflow_wraps() {
        let a = [Element::MAX, 1];
        let b = [2, 1];
        let mut c = [0];

        matmul_naive_ijk(&a, &b, &mut c, 1, 1, 2);

        assert_eq!(c[0], Element::MAX.wrapping_mul(2).wrapping_add(1));
    }
}
