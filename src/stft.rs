//! Short-time Fourier transform: drives a fixed-size kernel across a real
//! sample stream with a configurable hop, reporting each spectrum through a
//! caller callback.

use crate::error::FftError;
use crate::fft::Fft;
use crate::window::Window;
use num_complex::Complex64;
use num_traits::Zero;
use std::sync::Arc;

pub struct Stft {
    fft: Arc<dyn Fft>,
    stride: usize,
    window: Option<Window>,
    // Samples not yet consumed by a full chunk; carried across stream
    // calls so overlapping chunks can span call boundaries.
    tail: Vec<f64>,
    chunk: Vec<Complex64>,
}

impl Stft {
    /// Chunk size is the kernel size; `stride` is the hop between chunk
    /// starts. A window, when given, must match the chunk size.
    pub fn new(
        fft: Arc<dyn Fft>,
        stride: usize,
        window: Option<Window>,
    ) -> Result<Self, FftError> {
        if stride == 0 {
            return Err(FftError::SizeInvalid(0));
        }
        let chunk_size = fft.size();
        if let Some(w) = &window {
            if w.len() != chunk_size {
                return Err(FftError::LengthMismatch {
                    expected: chunk_size,
                    actual: w.len(),
                });
            }
        }
        Ok(Self {
            fft,
            stride,
            window,
            tail: Vec::new(),
            chunk: vec![Complex64::zero(); chunk_size],
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.fft.size()
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Feeds samples in streaming mode: every complete chunk is reported
    /// and the unconsumed tail is retained for the next call.
    pub fn stream(
        &mut self,
        input: &[f64],
        mut report: impl FnMut(&[Complex64]),
    ) -> Result<(), FftError> {
        self.tail.extend_from_slice(input);
        let chunk_size = self.chunk.len();
        let mut offset = 0;
        while offset + chunk_size <= self.tail.len() {
            let Self {
                fft,
                window,
                tail,
                chunk,
                ..
            } = self;
            emit(
                fft.as_ref(),
                window.as_ref(),
                chunk,
                &tail[offset..offset + chunk_size],
                &mut report,
            )?;
            offset += self.stride;
        }
        self.tail.drain(..offset.min(self.tail.len()));
        Ok(())
    }

    /// Reports the retained tail as one final zero-padded chunk.
    pub fn flush(&mut self, mut report: impl FnMut(&[Complex64])) -> Result<(), FftError> {
        if self.tail.is_empty() {
            return Ok(());
        }
        let samples = std::mem::take(&mut self.tail);
        emit(
            self.fft.as_ref(),
            self.window.as_ref(),
            &mut self.chunk,
            &samples,
            &mut report,
        )
    }

    /// One-shot convenience: stream `input`, then flush.
    pub fn run(
        &mut self,
        input: &[f64],
        mut report: impl FnMut(&[Complex64]),
    ) -> Result<(), FftError> {
        self.stream(input, &mut report)?;
        self.flush(report)
    }
}

/// Widens, windows, and transforms one chunk, then reports it. Short
/// chunks are zero-padded to the transform size.
fn emit(
    fft: &dyn Fft,
    window: Option<&Window>,
    chunk: &mut [Complex64],
    samples: &[f64],
    report: &mut impl FnMut(&[Complex64]),
) -> Result<(), FftError> {
    for (slot, &s) in chunk.iter_mut().zip(samples.iter()) {
        *slot = Complex64::new(s, 0.0);
    }
    for slot in chunk.iter_mut().skip(samples.len()) {
        *slot = Complex64::zero();
    }
    if let Some(w) = window {
        w.apply(chunk)?;
    }
    fft.forward_inplace(chunk)?;
    report(chunk);
    Ok(())
}
