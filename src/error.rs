use thiserror::Error;

/// Argument errors surfaced by the transform kernels and their helpers.
///
/// Nothing is recovered internally; every error propagates to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FftError {
    /// Transform size is zero or above the library ceiling.
    #[error("invalid transform size {0}")]
    SizeInvalid(usize),

    /// The radix-2 kernel was handed a size that is not a power of two.
    #[error("size {0} is not a power of two")]
    PowerOfTwoRequired(usize),

    /// A buffer, window, or operand length does not match what the
    /// operation was constructed for.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A matrix test-vector stream did not parse cleanly.
    #[error("matrix data corrupt: {0}")]
    FormatCorruption(String),
}
