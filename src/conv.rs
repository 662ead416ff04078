//! Convolution through the frequency domain.

use crate::buffer;
use crate::error::FftError;
use crate::fft::{find_fft, Fft};

/// Circular convolution of `a` and `b` at length `len`: both inputs are
/// zero-padded (or truncated) to `len`, multiplied spectrally, and
/// inverse-transformed.
pub fn circular_convolve(a: &[f64], b: &[f64], len: usize) -> Result<Vec<f64>, FftError> {
    let fft = find_fft(len)?;
    let mut fa = buffer::from_reals_sized(a, len);
    let mut fb = buffer::from_reals_sized(b, len);
    fft.forward_inplace(&mut fa)?;
    fft.forward_inplace(&mut fb)?;
    buffer::pointwise_multiply(&mut fa, &fb)?;
    fft.real_inverse(&mut fa)
}

/// Linear convolution: circular at `2 * max(|a|, |b|)`, truncated to the
/// exact result length `|a| + |b| - 1`.
pub fn convolve(a: &[f64], b: &[f64]) -> Result<Vec<f64>, FftError> {
    if a.is_empty() || b.is_empty() {
        return Ok(Vec::new());
    }
    let len = 2 * a.len().max(b.len());
    let mut out = circular_convolve(a, b, len)?;
    out.truncate(a.len() + b.len() - 1);
    Ok(out)
}
