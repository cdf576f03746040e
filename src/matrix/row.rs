use super::Element;

/// Computes one row of C = A * B using i-k-j loop order.
///
/// `out` receives `a_row * B`: for every column `j`,
/// `out[j] = Σ_p a_row[p] * b[p * n + j]`. Walking `p` in the outer loop
/// keeps the inner loop sequential over both B and `out`.
///
/// Addition wraps, so the result is bit-identical to
/// [`matmul_naive_ijk`](super::naive_ijk::matmul_naive_ijk) regardless of
/// summation order.
///
/// # Arguments
///
/// * `a_row` - Row i of A (length k)
/// * `b` - Matrix B (k × n), row-major
/// * `out` - Row i of C (length n), overwritten
pub fn multiply_row(a_row: &[Element], b: &[Element], out: &mut [Element], n: usize, k: usize) {
    debug_assert_eq!(a_row.len(), k);
    debug_assert_eq!(b.len(), k * n);
    debug_assert_eq!(out.len(), n);

    out.fill(0);
    for (p, &a_ip) in a_row.iter().enumerate() {
        let b_row = &b[p * n..(p + 1) * n];
        for (c_ij, &b_pj) in out.iter_mut().zip(b_row) {
            *c_ij = c_ij.wrapping_add(a_ip.wrapping_mul(b_pj));
        }
    }
}
