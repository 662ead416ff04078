use num_complex::Complex64;
use std::f64::consts::PI;

/// The `k`-th complex root of unity for size `n`: `exp(-2*pi*i * k / n)`.
pub(crate) fn w(k: usize, n: usize) -> Complex64 {
    let angle = -2.0 * PI * (k as f64) / (n as f64);
    Complex64::new(angle.cos(), angle.sin())
}

/// Canonical twiddle table for size `n`: `W[k] = exp(-2*pi*i * k / n)` for
/// `k = 0..n`.
///
/// Only the first half is computed through sin/cos; the back half follows
/// from conjugate symmetry, `W[n - k] = conj(W[k])`.
pub fn twiddle_factors(n: usize) -> Vec<Complex64> {
    let mut table = vec![Complex64::new(1.0, 0.0); n];
    for k in 1..=n / 2 {
        table[k] = w(k, n);
    }
    for k in 1..n.div_ceil(2) {
        table[n - k] = table[k].conj();
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_direct_evaluation() {
        for n in [1usize, 2, 3, 4, 5, 8, 12, 17, 32] {
            let table = twiddle_factors(n);
            assert_eq!(table.len(), n);
            for k in 0..n {
                let direct = w(k, n);
                assert!((table[k] - direct).norm() < 1e-12, "n={} k={}", n, k);
            }
        }
    }

    #[test]
    fn conjugate_symmetry() {
        let table = twiddle_factors(20);
        for k in 1..20 {
            assert!((table[20 - k] - table[k].conj()).norm() < 1e-15);
        }
    }
}
