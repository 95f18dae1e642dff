//! Error types shared by all fallible operations in this crate.

use thiserror::Error;

/// Errors arising from vetKD client operations.
///
/// Every fallible operation either returns a fully validated value or one of
/// these errors; no partially validated or unverified data is ever exposed to
/// callers, and no error is retryable from within this crate.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum VetKdError {
    /// A byte string could not be decoded into the expected value.
    ///
    /// Raised for undersized or oversized encodings, for bytes that are not a
    /// valid compressed curve point, for points outside the prime-order
    /// subgroup, and for non-canonical scalar encodings.
    #[error("deserialization failed: {0}")]
    Deserialization(&'static str),

    /// An input had a different length than the operation requires.
    #[error("invalid input length: {0}")]
    InvalidInputLength(&'static str),

    /// The encrypted key did not decrypt to a valid BLS signature over the
    /// derivation input, so the candidate key was discarded.
    #[error("invalid encrypted vetKey: verification failed")]
    InvalidVetKey,

    /// An IBE or authenticated-encryption ciphertext failed its integrity
    /// check.
    #[error("Decryption failed")]
    DecryptionFailed,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, VetKdError>;
