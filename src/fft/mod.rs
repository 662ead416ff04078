pub mod composite;
pub mod fixed;
pub mod naive;
pub mod prime;
pub mod radix2;
pub mod twiddle;

use crate::error::FftError;
use crate::primes;
use lazy_static::lazy_static;
use num_complex::Complex64;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Largest supported transform size.
const MAX_SIZE: u64 = 1 << 32;

/// Sizes below this always get the O(N²) kernel, both from the dispatcher
/// and as composite sub-transforms; the bookkeeping of the fast kernels is
/// not worth it down there.
pub(crate) const ALWAYS_NAIVE_BELOW: usize = 16;

/// Common interface for all DFT kernels.
///
/// A kernel is immutable after construction and owns its twiddle tables and
/// scratch, so a transform call allocates nothing. Instances come out of
/// [`find_fft`] shared; calls on one instance serialize on its scratch.
pub trait Fft: Send + Sync {
    /// Transform size `N`.
    fn size(&self) -> usize;

    /// Human-readable kernel description, e.g. `Radix2FFT(64)`.
    fn name(&self) -> String;

    /// In-place forward DFT. `buf` must hold exactly `size` elements.
    fn forward_inplace(&self, buf: &mut [Complex64]) -> Result<(), FftError>;

    /// In-place inverse DFT: forward transform, then scale by 1/N and
    /// reverse-swap elements `i` and `N - i`.
    fn inverse_inplace(&self, buf: &mut [Complex64]) -> Result<(), FftError> {
        self.forward_inplace(buf)?;
        let n = buf.len();
        let scale = 1.0 / n as f64;
        for value in buf.iter_mut() {
            *value = *value * scale;
        }
        let mut i = 1;
        while i < n - i {
            buf.swap(i, n - i);
            i += 1;
        }
        Ok(())
    }

    /// Forward DFT of a real sequence, returned as a fresh complex buffer.
    fn real_forward(&self, reals: &[f64]) -> Result<Vec<Complex64>, FftError> {
        let mut buf: Vec<Complex64> =
            reals.iter().map(|&r| Complex64::new(r, 0.0)).collect();
        self.forward_inplace(&mut buf)?;
        Ok(buf)
    }

    /// Inverse DFT returning the real sequence only.
    ///
    /// Runs a forward transform on the caller's buffer (mutating it); pass a
    /// copy to keep the spectrum. `r[i] = buf[(N - i) % N].re / N`.
    fn real_inverse(&self, buf: &mut [Complex64]) -> Result<Vec<f64>, FftError> {
        self.forward_inplace(buf)?;
        let n = buf.len();
        Ok((0..n).map(|i| buf[(n - i) % n].re / n as f64).collect())
    }

    /// Frequency of spectrum index `k` at the given sample rate.
    fn frequency_of_index(&self, index: f64, sample_rate: f64) -> f64 {
        index * sample_rate / self.size() as f64
    }

    /// Spectrum index of the given frequency; inverse of
    /// [`Fft::frequency_of_index`].
    fn index_of_frequency(&self, frequency: f64, sample_rate: f64) -> f64 {
        frequency * self.size() as f64 / sample_rate
    }
}

/// Strided transform entry used by the composite kernel's stages.
///
/// Transforms the logical sequence at `off + k * stride` of `input`,
/// writing the same strided positions of `output`; the two buffers must be
/// distinct. When `twiddle_stride` is nonzero, input element `k` is first
/// multiplied by `twiddles[(k * twiddle_stride) % twiddles.len()]`.
pub(crate) trait Strided: Send + Sync {
    fn xform_strided(
        &self,
        input: &[Complex64],
        output: &mut [Complex64],
        off: usize,
        stride: usize,
        twiddles: &[Complex64],
        twiddle_stride: usize,
    ) -> Result<(), FftError>;
}

/// Fails with [`FftError::LengthMismatch`] unless `actual == expected`.
pub(crate) fn check_length(expected: usize, actual: usize) -> Result<(), FftError> {
    if expected == actual {
        Ok(())
    } else {
        Err(FftError::LengthMismatch { expected, actual })
    }
}

lazy_static! {
    static ref PLAN_CACHE: Mutex<HashMap<usize, Arc<dyn Fft>>> = Mutex::new(HashMap::new());
}

/// Returns a transform plan for size `n`, using caching and heuristic
/// kernel selection.
///
/// Fails with [`FftError::SizeInvalid`] for `n == 0` or `n > 2^32`.
pub fn find_fft(n: usize) -> Result<Arc<dyn Fft>, FftError> {
    if n == 0 || n as u64 > MAX_SIZE {
        return Err(FftError::SizeInvalid(n));
    }

    //
    // Cached plan lookup. The lock is released before construction:
    // composite and prime kernels recurse into find_fft for their
    // sub-transforms.
    //
    {
        let cache = PLAN_CACHE.lock();
        if let Some(plan) = cache.get(&n) {
            return Ok(plan.clone());
        }
    }

    //
    // Kernel selection.
    //
    let plan: Arc<dyn Fft> = match n {
        2 => Arc::new(fixed::Fixed2Fft),
        3 => Arc::new(fixed::Fixed3Fft),
        _ if n < ALWAYS_NAIVE_BELOW => Arc::new(naive::NaiveFft::new(n)),
        _ if primes::is_power_of_two(n) => Arc::new(radix2::Radix2Fft::new(n)?),
        _ if n < 24 => Arc::new(naive::NaiveFft::new(n)),
        _ if primes::is_prime(n as u64) => {
            let padded = primes::prime_padding_heuristic(n as u64);
            Arc::new(prime::PrimeFft::new(n, padded)?)
        }
        _ => Arc::new(composite::CompositeFft::new(n)?),
    };

    log::debug!("constructed plan {} for size {}", plan.name(), n);

    let mut cache = PLAN_CACHE.lock();
    Ok(cache.entry(n).or_insert(plan).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_sizes() {
        assert!(matches!(find_fft(0), Err(FftError::SizeInvalid(0))));
        let too_big = (MAX_SIZE as usize) + 1;
        assert!(matches!(
            find_fft(too_big),
            Err(FftError::SizeInvalid(n)) if n == too_big
        ));
    }

    #[test]
    fn selection_ladder() {
        assert_eq!(find_fft(1).unwrap().name(), "NaiveFFT(1)");
        assert_eq!(find_fft(2).unwrap().name(), "Fixed2FFT()");
        assert_eq!(find_fft(3).unwrap().name(), "Fixed3FFT()");
        // Small powers of two still go naive.
        assert_eq!(find_fft(8).unwrap().name(), "NaiveFFT(8)");
        assert_eq!(find_fft(64).unwrap().name(), "Radix2FFT(64)");
        // Below 24, non-powers of two stay naive even when prime.
        assert_eq!(find_fft(17).unwrap().name(), "NaiveFFT(17)");
        assert_eq!(find_fft(22).unwrap().name(), "NaiveFFT(22)");
        // 28 = 2^2 * 7 is the first composite size.
        assert_eq!(find_fft(28).unwrap().name(), "CompositeFFT(28)");
        // 29 - 1 has the factor 7, so Rader pads; 37 - 1 factors smoothly.
        assert_eq!(find_fft(29).unwrap().name(), "PrimeFFT(29, padded)");
        assert_eq!(find_fft(37).unwrap().name(), "PrimeFFT(37, unpadded)");
    }

    #[test]
    fn plans_are_memoized() {
        let a = find_fft(360).unwrap();
        let b = find_fft(360).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
