//! # PULSE Crypto
//!
//! Cryptographic core for PULSE (Portable Ultra-Lightweight Session
//! Encryption).
//!
//! This crate provides:
//! - AES-GCM authenticated encryption at 128/192/256-bit key sizes
//! - Counter-based nonce discipline for long-lived keys
//! - Secure random number generation
//!
//! ## Cryptographic Suite
//!
//! | Function | Algorithm | Parameters |
//! |----------|-----------|------------|
//! | AEAD | AES-GCM | 128/192/256-bit key, 96-bit nonce, 128-bit tag |
//! | Nonce discipline | random prefix + counter | 64-bit prefix, 32-bit counter |
//! | Randomness | OS CSPRNG | via `getrandom` |
//!
//! The nonce discipline is the point of this crate: a device that holds
//! one key across many messages pays a single CSPRNG draw per key and a
//! counter increment per message, and the no-repeat invariant that GCM
//! depends on holds deterministically until the counter space runs out.
//! Exhaustion is a hard error; the caller rekeys.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod aead;
pub mod error;
pub mod random;

pub use error::CryptoError;

/// AES-GCM nonce size in bytes
pub const GCM_NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size in bytes
pub const GCM_TAG_SIZE: usize = 16;

/// Nonce counter prefix size in bytes
pub const IV_PREFIX_SIZE: usize = 8;
