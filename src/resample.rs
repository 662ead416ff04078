//! Frequency-domain resampling of real sequences.

use crate::buffer;
use crate::error::FftError;
use crate::fft::{find_fft, Fft};
use num_complex::Complex64;
use num_traits::Zero;

/// Resamples a real sequence to `output_len` points by truncating or
/// zero-padding its spectrum.
///
/// The surgery happens on the non-redundant half of the spectrum; the full
/// Hermitian spectrum is rebuilt for the inverse transform and the result
/// rescaled by the length ratio so amplitudes are preserved.
pub fn resample(input: &[f64], output_len: usize) -> Result<Vec<f64>, FftError> {
    if input.is_empty() {
        return Err(FftError::SizeInvalid(0));
    }
    let fft_in = find_fft(input.len())?;
    let spectrum = fft_in.real_forward(input)?;

    let mut half: Vec<Complex64> = buffer::discard_conjugates(&spectrum).to_vec();
    half.resize(output_len / 2 + 1, Complex64::zero());

    let mut full = buffer::create_conjugates(&half, output_len)?;
    let fft_out = find_fft(output_len)?;
    let reals = fft_out.real_inverse(&mut full)?;

    let scale = output_len as f64 / input.len() as f64;
    Ok(reals.into_iter().map(|r| r * scale).collect())
}
