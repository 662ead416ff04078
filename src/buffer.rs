//! Helpers for complex sample buffers: real/complex conversion, magnitude
//! extraction, pointwise products, and Hermitian half-spectrum handling.

use crate::error::FftError;
use num_complex::Complex64;
use num_traits::Zero;

/// Widens a real sequence to complex samples with zero imaginary parts.
pub fn from_reals(reals: &[f64]) -> Vec<Complex64> {
    reals.iter().map(|&r| Complex64::new(r, 0.0)).collect()
}

/// Widens a real sequence to exactly `len` complex samples, truncating or
/// zero-padding as needed.
pub fn from_reals_sized(reals: &[f64], len: usize) -> Vec<Complex64> {
    let mut buf = vec![Complex64::zero(); len];
    for (slot, &r) in buf.iter_mut().zip(reals.iter()) {
        *slot = Complex64::new(r, 0.0);
    }
    buf
}

/// Real parts of a complex buffer.
pub fn reals(buf: &[Complex64]) -> Vec<f64> {
    buf.iter().map(|c| c.re).collect()
}

/// Element magnitudes.
pub fn magnitudes(buf: &[Complex64]) -> Vec<f64> {
    buf.iter().map(|c| c.norm()).collect()
}

/// Element squared magnitudes.
pub fn squared_magnitudes(buf: &[Complex64]) -> Vec<f64> {
    buf.iter().map(|c| c.norm_sqr()).collect()
}

/// Pointwise complex product, accumulated into `a`.
pub fn pointwise_multiply(a: &mut [Complex64], b: &[Complex64]) -> Result<(), FftError> {
    if a.len() != b.len() {
        return Err(FftError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x *= y;
    }
    Ok(())
}

/// The non-redundant half of a real-input spectrum: a view of the first
/// `N/2 + 1` bins.
///
/// Works for both parities; the Nyquist bin exists only for even `N`.
pub fn discard_conjugates(buf: &[Complex64]) -> &[Complex64] {
    if buf.is_empty() {
        return buf;
    }
    &buf[..buf.len() / 2 + 1]
}

/// Rebuilds a full Hermitian spectrum of `output_len` bins from its
/// non-redundant half.
///
/// With `L = half.len()`, `output_len` must be `2L - 2` (even, the last
/// half bin is the Nyquist term) or `2L - 1` (odd).
pub fn create_conjugates(
    half: &[Complex64],
    output_len: usize,
) -> Result<Vec<Complex64>, FftError> {
    let l = half.len();
    if l == 0 {
        return Err(FftError::LengthMismatch {
            expected: 1,
            actual: 0,
        });
    }
    if output_len + 2 != 2 * l && output_len + 1 != 2 * l {
        return Err(FftError::LengthMismatch {
            expected: 2 * l - 1,
            actual: output_len,
        });
    }
    let mut full = vec![Complex64::zero(); output_len];
    full[..l.min(output_len)].copy_from_slice(&half[..l.min(output_len)]);
    for k in l..output_len {
        full[k] = half[output_len - k].conj();
    }
    Ok(full)
}
