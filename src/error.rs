// rust-dilithium/src/error.rs

use thiserror::Error;

/// Error taxonomy for the crate.
///
/// Authentication and signature failures are distinct variants so callers can
/// tell "someone tampered with this" apart from plumbing problems. None of the
/// variants carry key material or plaintext.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// A construction-time invariant was violated (bad lengths, bad level).
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// The signing loop hit its attempt cap without finding an acceptable
    /// response. Recoverable only by calling sign again.
    #[error("rejection sampling exhausted after {0} attempts")]
    RejectionLimitExceeded(usize),

    /// The chaotic cipher's authentication tag did not match.
    #[error("authentication tag mismatch")]
    AuthenticationFailed,

    /// Signature verification failed during hybrid decryption.
    #[error("signature verification failed")]
    SignatureInvalid,

    /// The freshly produced signature failed its own verification.
    #[error("post-sign self check failed")]
    SelfCheckFailed,

    /// The operating system RNG could not produce bytes. Fatal.
    #[error("random source unavailable")]
    RandomnessUnavailable,

    /// A serialized payload or wire frame could not be parsed.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
