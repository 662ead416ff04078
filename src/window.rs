//! Window functions applied to a chunk ahead of the transform.

use crate::error::FftError;
use crate::fft::check_length;
use num_complex::Complex64;
use std::f64::consts::PI;

/// A precomputed length-N real window.
pub struct Window {
    values: Vec<f64>,
}

impl Window {
    fn from_fn(n: usize, f: impl Fn(f64, f64) -> f64) -> Self {
        let values = if n == 1 {
            vec![1.0]
        } else {
            let last = (n - 1) as f64;
            (0..n).map(|i| f(i as f64, last)).collect()
        };
        Self { values }
    }

    /// Hanning window: `0.5 * (1 - cos(2*pi*i / (N-1)))`.
    pub fn hanning(n: usize) -> Self {
        Self::from_fn(n, |i, last| 0.5 * (1.0 - (2.0 * PI * i / last).cos()))
    }

    /// Hamming window: `0.54 - 0.46 * cos(2*pi*i / (N-1))`.
    pub fn hamming(n: usize) -> Self {
        Self::from_fn(n, |i, last| 0.54 - 0.46 * (2.0 * PI * i / last).cos())
    }

    /// Bartlett (triangular) window.
    pub fn bartlett(n: usize) -> Self {
        Self::from_fn(n, |i, last| {
            let half = last / 2.0;
            1.0 - ((i - half) / half).abs()
        })
    }

    /// Blackman window:
    /// `0.42 - 0.5 * cos(2*pi*i / (N-1)) + 0.08 * cos(4*pi*i / (N-1))`.
    pub fn blackman(n: usize) -> Self {
        Self::from_fn(n, |i, last| {
            0.42 - 0.5 * (2.0 * PI * i / last).cos() + 0.08 * (4.0 * PI * i / last).cos()
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Scales each element of `buf` by the window; lengths must match.
    pub fn apply(&self, buf: &mut [Complex64]) -> Result<(), FftError> {
        check_length(self.values.len(), buf.len())?;
        for (sample, &weight) in buf.iter_mut().zip(self.values.iter()) {
            *sample = *sample * weight;
        }
        Ok(())
    }
}
