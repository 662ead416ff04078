use super::twiddle::w;
use super::{check_length, find_fft, Fft, FftError, Strided};
use crate::primes;
use num_complex::Complex64;
use num_traits::Zero;
use parking_lot::Mutex;
use std::sync::Arc;

//
// Rader's algorithm: a DFT of odd prime size N is a cyclic convolution of
// length N-1 once indices are walked through a primitive root mod N. The
// convolution runs through an internal sub-FFT, either of size N-1 directly
// or zero-padded to a power of two when N-1 factors badly.
//
pub struct PrimeFft {
    n: usize,
    padded: bool,
    // Internal convolution length.
    pn: usize,
    // Forward and inverse primitive-root walks: perm[q] = g^q mod n,
    // inv_perm[q] = g^-q mod n.
    perm: Vec<usize>,
    inv_perm: Vec<usize>,
    // Spectrum of the reordered twiddle kernel, FFT'd at construction.
    bspec: Vec<Complex64>,
    sub: Arc<dyn Fft>,
    scratch: Mutex<Vec<Complex64>>,
}

impl PrimeFft {
    pub fn new(n: usize, padded: bool) -> Result<Self, FftError> {
        if n <= 2 || !primes::is_prime(n as u64) {
            return Err(FftError::SizeInvalid(n));
        }

        let pn = if padded {
            primes::next_power_of_two(2 * (n - 1))
        } else {
            n - 1
        };
        log::debug!(
            "rader plan for {}: {} convolution of size {}",
            n,
            if padded { "padded" } else { "unpadded" },
            pn
        );

        //
        // Primitive-root walks in both directions.
        //
        let g = primes::primitive_root_of_prime(n as u64);
        let g_inv = primes::multiplicative_inverse_of_prime(g, n as u64);
        let mut perm = vec![0usize; n - 1];
        let mut inv_perm = vec![0usize; n - 1];
        let (mut gp, mut jp) = (1u64, 1u64);
        for q in 0..n - 1 {
            perm[q] = gp as usize;
            inv_perm[q] = jp as usize;
            gp = gp * g % n as u64;
            jp = jp * g_inv % n as u64;
        }

        //
        // Reordered twiddle kernel b[q] = exp(-2*pi*i * g^-q / n), zero
        // padded to the convolution length and transformed once.
        //
        let sub = find_fft(pn)?;
        let mut bspec = vec![Complex64::zero(); pn];
        for q in 0..n - 1 {
            bspec[q] = w(inv_perm[q], n);
        }
        sub.forward_inplace(&mut bspec)?;

        Ok(Self {
            n,
            padded,
            pn,
            perm,
            inv_perm,
            bspec,
            sub,
            scratch: Mutex::new(vec![Complex64::zero(); pn]),
        })
    }

    /// Permutes the strided input into `a` through the primitive root,
    /// applying any outer twiddles. Returns the first input element and the
    /// full input sum, which the scatter step needs.
    fn gather(
        &self,
        a: &mut [Complex64],
        input: &[Complex64],
        off: usize,
        stride: usize,
        twiddles: &[Complex64],
        twiddle_stride: usize,
    ) -> (Complex64, Complex64) {
        let x0 = input[off];
        let mut dc = x0;
        for q in 0..self.n - 1 {
            let mut value = input[off + self.perm[q] * stride];
            if twiddle_stride != 0 {
                value *= twiddles[(self.perm[q] * twiddle_stride) % twiddles.len()];
            }
            a[q] = value;
            dc += value;
        }
        for slot in a[self.n - 1..].iter_mut() {
            *slot = Complex64::zero();
        }
        (x0, dc)
    }

    /// Cyclic convolution against the precomputed kernel spectrum.
    fn convolve(&self, a: &mut [Complex64]) -> Result<(), FftError> {
        self.sub.forward_inplace(a)?;
        for (value, b) in a.iter_mut().zip(self.bspec.iter()) {
            *value *= b;
        }
        self.sub.inverse_inplace(a)
    }

    /// Writes the DC bin and unpermutes the convolution result. In padded
    /// mode the linear convolution folds back onto period N-1.
    fn scatter(
        &self,
        a: &[Complex64],
        x0: Complex64,
        dc: Complex64,
        output: &mut [Complex64],
        off: usize,
        stride: usize,
    ) {
        output[off] = dc;
        for q in 0..self.n - 1 {
            let mut sum = x0;
            let mut j = q;
            while j < self.pn {
                sum += a[j];
                j += self.n - 1;
            }
            output[off + self.inv_perm[q] * stride] = sum;
        }
    }
}

impl Strided for PrimeFft {
    fn xform_strided(
        &self,
        input: &[Complex64],
        output: &mut [Complex64],
        off: usize,
        stride: usize,
        twiddles: &[Complex64],
        twiddle_stride: usize,
    ) -> Result<(), FftError> {
        let mut scratch = self.scratch.lock();
        let (x0, dc) = self.gather(&mut scratch[..], input, off, stride, twiddles, twiddle_stride);
        self.convolve(&mut scratch[..])?;
        self.scatter(&scratch[..], x0, dc, output, off, stride);
        Ok(())
    }
}

impl Fft for PrimeFft {
    fn size(&self) -> usize {
        self.n
    }

    fn name(&self) -> String {
        format!(
            "PrimeFFT({}, {})",
            self.n,
            if self.padded { "padded" } else { "unpadded" }
        )
    }

    fn forward_inplace(&self, buf: &mut [Complex64]) -> Result<(), FftError> {
        check_length(self.n, buf.len())?;

        //
        // In place is safe here: the gather reads everything before the
        // scatter stores anything.
        //
        let mut scratch = self.scratch.lock();
        let (x0, dc) = self.gather(&mut scratch[..], buf, 0, 1, &[], 0);
        self.convolve(&mut scratch[..])?;
        self.scatter(&scratch[..], x0, dc, buf, 0, 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::naive::NaiveFft;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_matches_naive(n: usize, padded: bool) {
        let mut rng = StdRng::seed_from_u64(n as u64);
        let input: Vec<Complex64> = (0..n)
            .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect();

        let mut expected = input.clone();
        NaiveFft::new(n).forward_inplace(&mut expected).unwrap();

        let fft = PrimeFft::new(n, padded).unwrap();
        let mut got = input;
        fft.forward_inplace(&mut got).unwrap();

        for k in 0..n {
            assert!(
                (got[k] - expected[k]).norm() < 1e-6,
                "n={} padded={} k={}",
                n,
                padded,
                k
            );
        }
    }

    #[test]
    fn constructor_rejects_non_primes() {
        for n in [0usize, 1, 2, 4, 9, 15, 21] {
            assert!(matches!(
                PrimeFft::new(n, false),
                Err(FftError::SizeInvalid(m)) if m == n
            ));
        }
    }

    #[test]
    fn size_five_constant_and_impulse() {
        let fft = PrimeFft::new(5, false).unwrap();

        let mut ones = vec![Complex64::new(1.0, 0.0); 5];
        fft.forward_inplace(&mut ones).unwrap();
        assert!((ones[0] - Complex64::new(5.0, 0.0)).norm() < 1e-9);
        for value in &ones[1..] {
            assert!(value.norm() < 1e-9);
        }

        let mut impulse = vec![Complex64::zero(); 5];
        impulse[0] = Complex64::new(1.0, 0.0);
        fft.forward_inplace(&mut impulse).unwrap();
        for value in &impulse {
            assert!((value - Complex64::new(1.0, 0.0)).norm() < 1e-9);
        }
    }

    #[test]
    fn both_padding_modes_match_naive() {
        for n in [5usize, 7, 11, 13, 17, 23, 29, 31, 37, 61, 101] {
            assert_matches_naive(n, false);
            assert_matches_naive(n, true);
        }
    }

    #[test]
    fn unpadded_convolution_size_is_n_minus_one() {
        let unpadded = PrimeFft::new(17, false).unwrap();
        assert_eq!(unpadded.pn, 16);
        let padded = PrimeFft::new(17, true).unwrap();
        assert_eq!(padded.pn, 32);
        assert_eq!(padded.name(), "PrimeFFT(17, padded)");
    }
}
