use super::twiddle::w;
use super::{check_length, Fft, FftError};
use crate::primes;
use num_complex::Complex64;

//
// Iterative in-place Cooley–Tukey for powers of two: bit-reversal
// permutation followed by log2(N) butterfly stages.
//
pub struct Radix2Fft {
    n: usize,
    bits: u32,
    wtable: Vec<Complex64>,
}

/// Half-size twiddle table, `W[k] = exp(-2*pi*i * k / n)` for `k < n/2`.
///
/// Only the first eighth of the circle goes through sin/cos; the first
/// quarter follows by reflection and the second by negated-real symmetry.
fn half_table(n: usize) -> Vec<Complex64> {
    let half = n / 2;
    let quarter = n / 4;
    let eighth = n / 8;
    let mut table = vec![Complex64::new(1.0, 0.0); half];
    for k in 1..=eighth {
        table[k] = w(k, n);
    }
    for k in 0..=eighth {
        let j = quarter - k;
        if j > eighth && j < half {
            table[j] = Complex64::new(-table[k].im, -table[k].re);
        }
    }
    for k in 1..quarter {
        table[half - k] = Complex64::new(-table[k].re, table[k].im);
    }
    table
}

impl Radix2Fft {
    pub fn new(n: usize) -> Result<Self, FftError> {
        if n == 0 {
            return Err(FftError::SizeInvalid(n));
        }
        if !primes::is_power_of_two(n) {
            return Err(FftError::PowerOfTwoRequired(n));
        }
        Ok(Self {
            n,
            bits: primes::highest_bit(n),
            wtable: half_table(n),
        })
    }
}

impl Fft for Radix2Fft {
    fn size(&self) -> usize {
        self.n
    }

    fn name(&self) -> String {
        format!("Radix2FFT({})", self.n)
    }

    fn forward_inplace(&self, buf: &mut [Complex64]) -> Result<(), FftError> {
        check_length(self.n, buf.len())?;
        if self.bits == 0 {
            return Ok(());
        }

        //
        // Bit-reversal permutation.
        //
        for i in 0..self.n {
            let j = ((i as u64).reverse_bits() >> (64 - self.bits)) as usize;
            if j > i {
                buf.swap(i, j);
            }
        }

        //
        // Butterfly stages. At stage s the half-transforms are m = 2^s
        // apart and the twiddle index advances by n/2/m per butterfly.
        //
        let half = self.n / 2;
        for s in 0..self.bits {
            let m = 1usize << s;
            let step = half / m;
            let mut base = 0;
            while base < self.n {
                let mut t = 0;
                for k in base..base + m {
                    let even = buf[k];
                    let odd = buf[k + m] * self.wtable[t];
                    buf[k] = even + odd;
                    buf[k + m] = even - odd;
                    t += step;
                }
                base += 2 * m;
            }
        }
        Ok(())
    }
}
