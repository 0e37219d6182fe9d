//! # PULSE Core
//!
//! Session layer for PULSE (Portable Ultra-Lightweight Session
//! Encryption): nonce-disciplined AES-GCM sessions and the
//! sealed-envelope wire format for constrained telemetry links.
//!
//! This crate provides:
//! - Session state machine (key ownership, nonce discipline, rekeying)
//! - Sealed-envelope encoding and decoding (zero-copy parsing)
//! - Error types and handling
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Session                                  │
//! │   (one key, one nonce sequence, explicit rekey on exhaustion)   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                         Envelopes                                │
//! │   (nonce | ciphertext | tag, lengths agreed out of band)        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                         AEAD engine                              │
//! │   (AES-GCM via pulse-crypto, detached ciphertext and tag)       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod envelope;
pub mod error;
pub mod session;

pub use envelope::{Envelope, EnvelopeRef};
pub use error::{EnvelopeError, Error};
pub use session::{Session, SessionConfig};

// The cryptographic vocabulary of the session API, for callers that do
// not need the rest of pulse-crypto.
pub use pulse_crypto::CryptoError;
pub use pulse_crypto::aead::{KeySize, Nonce, NonceMode, Tag};

/// Envelope nonce length in bytes
pub const NONCE_LEN: usize = pulse_crypto::GCM_NONCE_SIZE;

/// Envelope tag length in bytes
pub const TAG_LEN: usize = pulse_crypto::GCM_TAG_SIZE;

/// Fixed per-message envelope overhead in bytes
pub const ENVELOPE_OVERHEAD: usize = NONCE_LEN + TAG_LEN;
