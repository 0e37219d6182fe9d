//! Cryptographic error types.

use thiserror::Error;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    /// AEAD encryption failed
    #[error("encryption failed")]
    EncryptionFailed,

    /// AEAD decryption failed (authentication failure)
    ///
    /// Tampered ciphertext, tag, nonce, or associated data are
    /// indistinguishable here. GCM reveals nothing about which input
    /// was wrong, and neither does this error.
    #[error("decryption failed: authentication failure")]
    AuthenticationFailed,

    /// Invalid key length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Nonce counter exhausted; the key must be replaced before any
    /// further encryption
    #[error("nonce counter exhausted, rekey required")]
    NonceExhausted,

    /// Random number generation failed
    #[error("random number generation failed")]
    RandomFailed,
}
