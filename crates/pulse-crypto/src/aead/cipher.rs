//! AES-GCM key, nonce, and tag types.
//!
//! Thin wrapper over the RustCrypto `aes-gcm` implementation. The wrapper
//! fixes the GCM parameters the rest of the workspace relies on: 96-bit
//! nonces, 128-bit tags, and detached ciphertext/tag output so the wire
//! layer controls placement.

use aes_gcm::aead::generic_array::typenum::{U12, U16};
use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::{CryptoError, random};

/// GCM nonce size (12 bytes / 96 bits).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size (16 bytes / 128 bits).
pub const TAG_SIZE: usize = 16;

/// AES-GCM with a 192-bit key (the `aes-gcm` crate only aliases 128/256).
type Aes192Gcm = AesGcm<Aes192, U12>;

/// Supported AES key sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeySize {
    /// AES-128 (16-byte key)
    #[default]
    Aes128,
    /// AES-192 (24-byte key)
    Aes192,
    /// AES-256 (32-byte key)
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    #[must_use]
    pub fn bytes(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Key length in bits.
    #[must_use]
    pub fn bits(self) -> usize {
        self.bytes() * 8
    }
}

/// AES-GCM nonce (12 bytes).
///
/// GCM's standard 96-bit nonce. Small enough that random generation is
/// only safe for a bounded number of operations per key; the counter
/// discipline in [`crate::aead::nonce`] exists for exactly that reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// Create a nonce from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a nonce from a slice.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != NONCE_SIZE {
            return None;
        }
        let mut bytes = [0u8; NONCE_SIZE];
        bytes.copy_from_slice(slice);
        Some(Self(bytes))
    }

    /// Generate a random nonce.
    #[must_use]
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Assemble a nonce from an 8-byte prefix and a 32-bit counter.
    ///
    /// The counter occupies bytes 8..12 in big-endian order, so
    /// consecutive counter values produce lexicographically adjacent
    /// nonces under a fixed prefix.
    #[must_use]
    pub fn from_parts(prefix: &[u8; 8], counter: u32) -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        bytes[..8].copy_from_slice(prefix);
        bytes[8..].copy_from_slice(&counter.to_be_bytes());
        Self(bytes)
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }

    /// The 8-byte prefix portion.
    #[must_use]
    pub fn prefix(&self) -> &[u8] {
        &self.0[..8]
    }

    /// The counter portion, decoded big-endian.
    #[must_use]
    pub fn counter(&self) -> u32 {
        u32::from_be_bytes([self.0[8], self.0[9], self.0[10], self.0[11]])
    }

    /// Get as a reference for aes-gcm.
    fn as_generic(&self) -> &aes_gcm::Nonce<U12> {
        aes_gcm::Nonce::from_slice(&self.0)
    }
}

/// Authentication tag (16 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag([u8; TAG_SIZE]);

impl Tag {
    /// Create a tag from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; TAG_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from slice.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != TAG_SIZE {
            return None;
        }
        let mut bytes = [0u8; TAG_SIZE];
        bytes.copy_from_slice(slice);
        Some(Self(bytes))
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }
}

/// AES-GCM encryption key.
///
/// Holds the raw key material for one of the three AES key sizes and
/// provides detached encryption/decryption. Key bytes are zeroized on
/// drop and never appear in `Debug` output or serialized forms.
#[derive(Clone, ZeroizeOnDrop)]
pub enum GcmKey {
    /// AES-128 key material
    Aes128([u8; 16]),
    /// AES-192 key material
    Aes192([u8; 24]),
    /// AES-256 key material
    Aes256([u8; 32]),
}

impl GcmKey {
    /// Generate a random key of the given size.
    #[must_use]
    pub fn generate<R: RngCore + CryptoRng>(size: KeySize, rng: &mut R) -> Self {
        match size {
            KeySize::Aes128 => {
                let mut bytes = [0u8; 16];
                rng.fill_bytes(&mut bytes);
                Self::Aes128(bytes)
            }
            KeySize::Aes192 => {
                let mut bytes = [0u8; 24];
                rng.fill_bytes(&mut bytes);
                Self::Aes192(bytes)
            }
            KeySize::Aes256 => {
                let mut bytes = [0u8; 32];
                rng.fill_bytes(&mut bytes);
                Self::Aes256(bytes)
            }
        }
    }

    /// Generate a random key of the given size from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS CSPRNG fails.
    pub fn random(size: KeySize) -> Result<Self, CryptoError> {
        match size {
            KeySize::Aes128 => {
                let mut bytes = [0u8; 16];
                random::fill_random(&mut bytes)?;
                Ok(Self::Aes128(bytes))
            }
            KeySize::Aes192 => {
                let mut bytes = [0u8; 24];
                random::fill_random(&mut bytes)?;
                Ok(Self::Aes192(bytes))
            }
            KeySize::Aes256 => {
                let mut bytes = [0u8; 32];
                random::fill_random(&mut bytes)?;
                Ok(Self::Aes256(bytes))
            }
        }
    }

    /// Create a key from caller-supplied bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice length does
    /// not match `size`.
    pub fn from_slice(slice: &[u8], size: KeySize) -> Result<Self, CryptoError> {
        if slice.len() != size.bytes() {
            return Err(CryptoError::InvalidKeyLength {
                expected: size.bytes(),
                actual: slice.len(),
            });
        }
        Ok(match size {
            KeySize::Aes128 => {
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(slice);
                Self::Aes128(bytes)
            }
            KeySize::Aes192 => {
                let mut bytes = [0u8; 24];
                bytes.copy_from_slice(slice);
                Self::Aes192(bytes)
            }
            KeySize::Aes256 => {
                let mut bytes = [0u8; 32];
                bytes.copy_from_slice(slice);
                Self::Aes256(bytes)
            }
        })
    }

    /// The key size this key was built for.
    #[must_use]
    pub fn size(&self) -> KeySize {
        match self {
            Self::Aes128(_) => KeySize::Aes128,
            Self::Aes192(_) => KeySize::Aes192,
            Self::Aes256(_) => KeySize::Aes256,
        }
    }

    /// Get raw key bytes.
    ///
    /// # Security
    ///
    /// Handle with extreme care - this exposes the raw key material.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Aes128(bytes) => bytes,
            Self::Aes192(bytes) => bytes,
            Self::Aes256(bytes) => bytes,
        }
    }

    /// Encrypt plaintext with associated data.
    ///
    /// Returns the ciphertext and authentication tag separately. The
    /// ciphertext length always equals the plaintext length; GCM is a
    /// stream construction and adds no padding.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EncryptionFailed`] if AEAD encryption fails.
    pub fn encrypt_detached(
        &self,
        nonce: &Nonce,
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, Tag), CryptoError> {
        match self {
            Self::Aes128(key) => seal::<Aes128Gcm>(key, nonce, plaintext, aad),
            Self::Aes192(key) => seal::<Aes192Gcm>(key, nonce, plaintext, aad),
            Self::Aes256(key) => seal::<Aes256Gcm>(key, nonce, plaintext, aad),
        }
    }

    /// Decrypt ciphertext, verifying the authentication tag.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::AuthenticationFailed`] if the tag does not
    /// verify. No plaintext is ever returned on failure.
    pub fn decrypt_detached(
        &self,
        nonce: &Nonce,
        ciphertext: &[u8],
        tag: &Tag,
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Aes128(key) => open::<Aes128Gcm>(key, nonce, ciphertext, tag, aad),
            Self::Aes192(key) => open::<Aes192Gcm>(key, nonce, ciphertext, tag, aad),
            Self::Aes256(key) => open::<Aes256Gcm>(key, nonce, ciphertext, tag, aad),
        }
    }
}

fn seal<C>(
    key: &[u8],
    nonce: &Nonce,
    plaintext: &[u8],
    aad: &[u8],
) -> Result<(Vec<u8>, Tag), CryptoError>
where
    C: KeyInit + AeadInPlace + AeadCore<NonceSize = U12, TagSize = U16>,
{
    let cipher = C::new_from_slice(key).map_err(|_| CryptoError::EncryptionFailed)?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(nonce.as_generic(), aad, &mut buffer)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(&tag);
    Ok((buffer, Tag(tag_bytes)))
}

fn open<C>(
    key: &[u8],
    nonce: &Nonce,
    ciphertext: &[u8],
    tag: &Tag,
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError>
where
    C: KeyInit + AeadInPlace + AeadCore<NonceSize = U12, TagSize = U16>,
{
    let cipher = C::new_from_slice(key).map_err(|_| CryptoError::AuthenticationFailed)?;

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            nonce.as_generic(),
            aad,
            &mut buffer,
            aes_gcm::Tag::from_slice(&tag.0),
        )
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn test_roundtrip_all_key_sizes() {
        for size in [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256] {
            let key = GcmKey::generate(size, &mut OsRng);
            let nonce = Nonce::generate(&mut OsRng);
            let plaintext = b"heartrate:75,steps:8541,calories:325";
            let aad = b"Additional authenticated data";

            let (ciphertext, tag) = key.encrypt_detached(&nonce, plaintext, aad).unwrap();
            assert_eq!(ciphertext.len(), plaintext.len());

            let decrypted = key.decrypt_detached(&nonce, &ciphertext, &tag, aad).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn test_empty_plaintext() {
        let key = GcmKey::generate(KeySize::Aes128, &mut OsRng);
        let nonce = Nonce::generate(&mut OsRng);

        let (ciphertext, tag) = key.encrypt_detached(&nonce, b"", b"aad").unwrap();
        assert!(ciphertext.is_empty());

        let decrypted = key.decrypt_detached(&nonce, &ciphertext, &tag, b"aad").unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_tamper_detection() {
        let key = GcmKey::generate(KeySize::Aes256, &mut OsRng);
        let nonce = Nonce::generate(&mut OsRng);

        let (mut ciphertext, tag) = key.encrypt_detached(&nonce, b"secret", b"").unwrap();
        ciphertext[0] ^= 0x01;

        assert!(matches!(
            key.decrypt_detached(&nonce, &ciphertext, &tag, b""),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let key = GcmKey::generate(KeySize::Aes128, &mut OsRng);
        let nonce = Nonce::generate(&mut OsRng);

        let (ciphertext, tag) = key.encrypt_detached(&nonce, b"secret", b"").unwrap();
        let mut tag_bytes = *tag.as_bytes();
        tag_bytes[15] ^= 0x80;
        let bad_tag = Tag::from_bytes(tag_bytes);

        assert!(key.decrypt_detached(&nonce, &ciphertext, &bad_tag, b"").is_err());
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = GcmKey::generate(KeySize::Aes128, &mut OsRng);
        let key2 = GcmKey::generate(KeySize::Aes128, &mut OsRng);
        let nonce = Nonce::generate(&mut OsRng);

        let (ciphertext, tag) = key1.encrypt_detached(&nonce, b"secret", b"").unwrap();
        assert!(key2.decrypt_detached(&nonce, &ciphertext, &tag, b"").is_err());
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let key = GcmKey::generate(KeySize::Aes128, &mut OsRng);
        let nonce1 = Nonce::generate(&mut OsRng);
        let nonce2 = Nonce::generate(&mut OsRng);

        let (ciphertext, tag) = key.encrypt_detached(&nonce1, b"secret", b"").unwrap();
        assert!(key.decrypt_detached(&nonce2, &ciphertext, &tag, b"").is_err());
    }

    #[test]
    fn test_wrong_aad_fails() {
        let key = GcmKey::generate(KeySize::Aes128, &mut OsRng);
        let nonce = Nonce::generate(&mut OsRng);

        let (ciphertext, tag) = key.encrypt_detached(&nonce, b"secret", b"aad1").unwrap();
        assert!(key.decrypt_detached(&nonce, &ciphertext, &tag, b"aad2").is_err());
    }

    #[test]
    fn test_key_from_slice_length_check() {
        assert!(GcmKey::from_slice(&[0u8; 16], KeySize::Aes128).is_ok());
        assert!(GcmKey::from_slice(&[0u8; 24], KeySize::Aes192).is_ok());
        assert!(GcmKey::from_slice(&[0u8; 32], KeySize::Aes256).is_ok());

        match GcmKey::from_slice(&[0u8; 16], KeySize::Aes256) {
            Ok(_) => panic!("expected InvalidKeyLength error"),
            Err(err) => assert!(matches!(
                err,
                CryptoError::InvalidKeyLength {
                    expected: 32,
                    actual: 16
                }
            )),
        }
    }

    #[test]
    fn test_nonce_from_parts_layout() {
        let prefix = [0xAA; 8];
        let nonce = Nonce::from_parts(&prefix, 0x0102_0304);

        assert_eq!(&nonce.as_bytes()[..8], &prefix);
        assert_eq!(&nonce.as_bytes()[8..], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(nonce.prefix(), &prefix);
        assert_eq!(nonce.counter(), 0x0102_0304);
    }

    #[test]
    fn test_nonce_from_slice() {
        let bytes = [0x42u8; NONCE_SIZE];
        let nonce = Nonce::from_slice(&bytes).unwrap();
        assert_eq!(nonce.as_bytes(), &bytes);

        assert!(Nonce::from_slice(&[0u8; 11]).is_none());
    }

    #[test]
    fn test_tag_from_slice() {
        let bytes = [0x42u8; TAG_SIZE];
        let tag = Tag::from_slice(&bytes).unwrap();
        assert_eq!(tag.as_bytes(), &bytes);

        assert!(Tag::from_slice(&[0u8; 15]).is_none());
    }
}
