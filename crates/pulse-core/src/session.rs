//! Nonce-disciplined AES-GCM session.
//!
//! A [`Session`] owns one AES key and the nonce state for that key's
//! lifetime, and guarantees that no nonce is used twice under the key.
//! Key establishment is explicit: a session is never without a key, and
//! a new key always starts a fresh nonce sequence.
//!
//! Lifecycle:
//!
//! ```text
//! new / with_key      fresh key, empty nonce state
//! encrypt / seal      first call draws the nonce prefix, every call
//!                     advances the counter
//! set_key / rekey     replaces the key, discards nonce state
//! counter exhausted   encrypt fails with NonceExhausted until the
//!                     caller rekeys
//! ```
//!
//! A session is a single logical owner: the counter's
//! read-increment-write is serialized by `&mut self`. Wrap the session
//! in a mutex to share it across threads; handing one key's counter to
//! two independent owners is exactly the nonce-reuse failure this type
//! exists to prevent.

use pulse_crypto::CryptoError;
use pulse_crypto::aead::{GcmKey, IvSequence, KeySize, Nonce, NonceMode, Tag};
use serde::{Deserialize, Serialize};

use crate::envelope::{Envelope, EnvelopeRef};
use crate::error::Error;

/// Session configuration.
///
/// The defaults (AES-128, persistent counter) match the constrained
/// device profile this crate is built for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// AES key size
    pub key_size: KeySize,
    /// Nonce derivation strategy
    pub nonce_mode: NonceMode,
}

/// Nonce-disciplined AES-GCM session.
///
/// Owns the key; key material is zeroized when the session drops.
pub struct Session {
    config: SessionConfig,
    key: GcmKey,
    ivs: IvSequence,
}

impl Session {
    /// Create a session with a freshly generated key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS CSPRNG fails.
    pub fn new(config: SessionConfig) -> Result<Self, CryptoError> {
        let key = GcmKey::random(config.key_size)?;
        tracing::debug!(
            key_bits = config.key_size.bits(),
            mode = ?config.nonce_mode,
            "session created"
        );
        Ok(Self {
            config,
            key,
            ivs: IvSequence::new(config.nonce_mode),
        })
    }

    /// Create a session around caller-supplied key material.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if `key` does not match
    /// the configured key size.
    pub fn with_key(config: SessionConfig, key: &[u8]) -> Result<Self, CryptoError> {
        let key = GcmKey::from_slice(key, config.key_size)?;
        Ok(Self {
            config,
            key,
            ivs: IvSequence::new(config.nonce_mode),
        })
    }

    /// Replace the key with caller-supplied material.
    ///
    /// Discards the current nonce state; the next encryption starts a
    /// fresh sequence under the new key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if `key` does not match
    /// the configured key size. The session is unchanged on error.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        self.key = GcmKey::from_slice(key, self.config.key_size)?;
        self.ivs.invalidate();
        tracing::debug!("session key replaced, nonce state reset");
        Ok(())
    }

    /// Replace the key with a freshly generated one.
    ///
    /// Discards the current nonce state. This is the required response
    /// to [`CryptoError::NonceExhausted`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS CSPRNG fails. The
    /// session is unchanged on error.
    pub fn rekey(&mut self) -> Result<(), CryptoError> {
        self.key = GcmKey::random(self.config.key_size)?;
        self.ivs.invalidate();
        tracing::debug!(key_bits = self.config.key_size.bits(), "session rekeyed");
        Ok(())
    }

    /// Advance the nonce discipline and return the next nonce.
    ///
    /// Exposed so the discipline is observable; [`Self::encrypt`] calls
    /// this internally. Every returned nonce is consumed whether or not
    /// the caller encrypts with it.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NonceExhausted`] once the counter space is
    /// consumed, or [`CryptoError::RandomFailed`] if the OS CSPRNG fails.
    pub fn next_nonce(&mut self) -> Result<Nonce, CryptoError> {
        let nonce = self.ivs.next();
        if matches!(nonce, Err(CryptoError::NonceExhausted)) {
            tracing::warn!("nonce counter exhausted, rekey required");
        }
        nonce
    }

    /// Encrypt a message under the next nonce.
    ///
    /// Returns the nonce, ciphertext, and tag as an [`Envelope`]. The
    /// ciphertext length equals the plaintext length. Pass `b""` for no
    /// associated data.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NonceExhausted`] when the counter space is
    /// consumed, [`CryptoError::RandomFailed`] on CSPRNG failure, or
    /// [`CryptoError::EncryptionFailed`] on engine failure.
    pub fn encrypt(&mut self, plaintext: &[u8], aad: &[u8]) -> Result<Envelope, CryptoError> {
        let nonce = self.next_nonce()?;
        let (ciphertext, tag) = self.key.encrypt_detached(&nonce, plaintext, aad)?;
        Ok(Envelope {
            nonce,
            ciphertext,
            tag,
        })
    }

    /// Decrypt a message, verifying its tag.
    ///
    /// Decryption does not touch nonce state, so `&self` suffices.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::AuthenticationFailed`] if verification
    /// fails: tampered ciphertext, tag, or associated data, a wrong key,
    /// or a wrong nonce are all indistinguishable. No plaintext is
    /// returned on failure.
    pub fn decrypt(
        &self,
        nonce: &Nonce,
        ciphertext: &[u8],
        tag: &Tag,
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.key.decrypt_detached(nonce, ciphertext, tag, aad)
    }

    /// Encrypt and encode into a single transmission buffer.
    ///
    /// The buffer layout is `nonce(12) | ciphertext | tag(16)`; see
    /// [`Envelope::encode`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::encrypt`].
    pub fn seal(&mut self, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.encrypt(plaintext, aad)?.encode())
    }

    /// Decrypt a sealed buffer with the standard 12/16 layout.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EnvelopeError::TooShort`] if the buffer cannot
    /// contain a nonce and tag, or [`CryptoError::AuthenticationFailed`]
    /// if verification fails.
    pub fn open(&self, sealed: &[u8], aad: &[u8]) -> Result<Vec<u8>, Error> {
        self.open_with(sealed, pulse_crypto::GCM_NONCE_SIZE, pulse_crypto::GCM_TAG_SIZE, aad)
    }

    /// Decrypt a sealed buffer with explicitly agreed lengths.
    ///
    /// The lengths are part of the out-of-band wire agreement. Only the
    /// 12/16 AES-GCM layout can verify; anything else fails before the
    /// engine is consulted.
    ///
    /// # Errors
    ///
    /// Same as [`Self::open`], plus
    /// [`crate::EnvelopeError::UnsupportedLayout`] for non-GCM lengths.
    pub fn open_with(
        &self,
        sealed: &[u8],
        nonce_len: usize,
        tag_len: usize,
        aad: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let view = EnvelopeRef::parse_with(sealed, nonce_len, tag_len)?;
        let nonce = view.nonce()?;
        let tag = view.tag()?;
        Ok(self.decrypt(&nonce, view.ciphertext(), &tag, aad)?)
    }

    /// The configured key size.
    #[must_use]
    pub fn key_size(&self) -> KeySize {
        self.config.key_size
    }

    /// The configured nonce strategy.
    #[must_use]
    pub fn nonce_mode(&self) -> NonceMode {
        self.config.nonce_mode
    }

    /// Messages available before the counter space runs out, or `None`
    /// when the strategy is unbounded. For rekey scheduling.
    #[must_use]
    pub fn messages_remaining(&self) -> Option<u64> {
        self.ivs.remaining()
    }

    /// Whether the session must be rekeyed before it can encrypt again.
    #[must_use]
    pub fn needs_rekey(&self) -> bool {
        matches!(self.ivs.remaining(), Some(0))
    }

    /// Get raw key bytes, e.g. to provision the receiving side.
    ///
    /// # Security
    ///
    /// Handle with extreme care - this exposes the raw key material.
    #[must_use]
    pub fn key_bytes(&self) -> &[u8] {
        self.key.as_bytes()
    }
}
