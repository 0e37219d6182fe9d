//! Error types for the PULSE session layer.

use thiserror::Error;

/// Session-layer errors
#[derive(Debug, Error)]
pub enum Error {
    /// Envelope parsing error
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Cryptographic error
    #[error("crypto error: {0}")]
    Crypto(#[from] pulse_crypto::CryptoError),
}

/// Envelope-level errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Buffer too short to contain a nonce and tag
    #[error("envelope too short: expected at least {expected}, got {actual}")]
    TooShort {
        /// Minimum size for the agreed layout
        expected: usize,
        /// Actual size received
        actual: usize,
    },

    /// Parsed layout cannot carry an AES-GCM nonce and tag
    #[error("unsupported envelope layout: nonce {nonce_len}, tag {tag_len}")]
    UnsupportedLayout {
        /// Nonce length the buffer was split with
        nonce_len: usize,
        /// Tag length the buffer was split with
        tag_len: usize,
    },
}
