//! Discrete Fourier transforms of any length.
//!
//! The core is a kernel dispatch engine: [`find_fft`] factors the requested
//! size and hands back a precomputed plan composed of specialized kernels
//! (hand-unrolled sizes 2 and 3, an O(N²) base case, iterative radix-2,
//! mixed-radix Cooley–Tukey, and Rader's algorithm for odd primes). Plans
//! are memoized process-wide; a transform call allocates nothing.
//!
//! On top of the kernels sit the usual derived utilities: windowing
//! functions, a streaming short-time Fourier transform, linear and circular
//! convolution, and a frequency-domain resampler.

pub mod buffer;
pub mod conv;
mod error;
pub mod fft;
pub mod matrix;
pub mod primes;
pub mod resample;
pub mod stft;
pub mod window;

pub use error::FftError;
pub use fft::{find_fft, twiddle::twiddle_factors, Fft};
pub use num_complex::Complex64;
