//! AES-GCM AEAD encryption with nonce discipline.
//!
//! Provides authenticated encryption with associated data (AEAD) using
//! AES-GCM at the three standard key sizes. Features include:
//! - 128/192/256-bit keys
//! - 96-bit nonces with a counter discipline for long-lived keys
//! - 128-bit authentication tags, detached from the ciphertext
//! - Associated data authentication
//!
//! ## Module Organization
//!
//! - [`cipher`] - Core AEAD types (`KeySize`, `GcmKey`, `Nonce`, `Tag`)
//! - [`nonce`] - Nonce discipline (`NonceMode`, `CounterIv`, `IvSequence`)
//!
//! ## Usage
//!
//! ```ignore
//! use pulse_crypto::aead::{GcmKey, IvSequence, KeySize, NonceMode};
//!
//! let key = GcmKey::generate(KeySize::Aes128, &mut OsRng);
//! let mut ivs = IvSequence::new(NonceMode::PersistentCounter);
//!
//! let nonce = ivs.next()?;
//! let (ciphertext, tag) = key.encrypt_detached(&nonce, b"secret", b"aad")?;
//! let plaintext = key.decrypt_detached(&nonce, &ciphertext, &tag, b"aad")?;
//! ```

pub mod cipher;
pub mod nonce;

pub use cipher::{GcmKey, KeySize, NONCE_SIZE, Nonce, TAG_SIZE, Tag};
pub use nonce::{CounterIv, IvSequence, NonceMode};
