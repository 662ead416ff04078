use super::twiddle::twiddle_factors;
use super::{check_length, Fft, FftError, Strided};
use num_complex::Complex64;
use num_traits::Zero;
use parking_lot::Mutex;

//
// O(N²) DFT, the base case for small sizes and the reference the fast
// kernels are tested against.
//
pub struct NaiveFft {
    n: usize,
    wtable: Vec<Complex64>,
    scratch: Mutex<Vec<Complex64>>,
}

impl NaiveFft {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            wtable: twiddle_factors(n),
            scratch: Mutex::new(vec![Complex64::zero(); n]),
        }
    }

    /// Straight summation against the size-N twiddle table, with
    /// independent input and output offsets/strides.
    fn dft_core(
        &self,
        input: &[Complex64],
        ioff: usize,
        istride: usize,
        output: &mut [Complex64],
        ooff: usize,
        ostride: usize,
    ) {
        for k in 0..self.n {
            let mut acc = Complex64::zero();
            for j in 0..self.n {
                acc += input[ioff + j * istride] * self.wtable[(j * k) % self.n];
            }
            output[ooff + k * ostride] = acc;
        }
    }
}

impl Strided for NaiveFft {
    fn xform_strided(
        &self,
        input: &[Complex64],
        output: &mut [Complex64],
        off: usize,
        stride: usize,
        twiddles: &[Complex64],
        twiddle_stride: usize,
    ) -> Result<(), FftError> {
        if twiddle_stride == 0 {
            self.dft_core(input, off, stride, output, off, stride);
            return Ok(());
        }

        //
        // Premultiply the outer twiddles into scratch once, then transform
        // scratch contiguously.
        //
        let mut scratch = self.scratch.lock();
        for j in 0..self.n {
            scratch[j] =
                input[off + j * stride] * twiddles[(j * twiddle_stride) % twiddles.len()];
        }
        self.dft_core(&scratch[..], 0, 1, output, off, stride);
        Ok(())
    }
}

impl Fft for NaiveFft {
    fn size(&self) -> usize {
        self.n
    }

    fn name(&self) -> String {
        format!("NaiveFFT({})", self.n)
    }

    fn forward_inplace(&self, buf: &mut [Complex64]) -> Result<(), FftError> {
        check_length(self.n, buf.len())?;
        let mut scratch = self.scratch.lock();
        scratch.copy_from_slice(buf);
        self.dft_core(&scratch[..], 0, 1, buf, 0, 1);
        Ok(())
    }
}
