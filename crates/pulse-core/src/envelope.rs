//! Sealed-envelope encoding and decoding for the PULSE wire format.
//!
//! An envelope is the byte-exact concatenation
//!
//! ```text
//! [ nonce (12) | ciphertext (variable) | tag (16) ]
//! ```
//!
//! with no length prefixes, version field, or padding. Both ends must
//! know the nonce and tag lengths out of band; the ciphertext occupies
//! whatever remains between them. An envelope with an empty ciphertext
//! (28 bytes total for the standard layout) is valid.

use pulse_crypto::aead::{NONCE_SIZE, Nonce, TAG_SIZE, Tag};

use crate::error::EnvelopeError;

/// Owned (nonce, ciphertext, tag) triple produced by one encryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Nonce the message was sealed under
    pub nonce: Nonce,
    /// Encrypted payload, same length as the plaintext
    pub ciphertext: Vec<u8>,
    /// GCM authentication tag
    pub tag: Tag,
}

impl Envelope {
    /// Length of the encoded envelope in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        NONCE_SIZE + self.ciphertext.len() + TAG_SIZE
    }

    /// Encode into a single transmission buffer.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(self.nonce.as_bytes());
        buf.extend_from_slice(&self.ciphertext);
        buf.extend_from_slice(self.tag.as_bytes());
        buf
    }

    /// Decode a buffer with the standard 12/16 layout.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::TooShort`] if the buffer cannot contain a
    /// nonce and tag.
    pub fn decode(data: &[u8]) -> Result<Self, EnvelopeError> {
        EnvelopeRef::parse(data)?.to_owned()
    }
}

/// Zero-copy view into an encoded envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeRef<'a> {
    nonce: &'a [u8],
    ciphertext: &'a [u8],
    tag: &'a [u8],
}

impl<'a> EnvelopeRef<'a> {
    /// Parse a buffer with the standard 12/16 layout (zero-copy).
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::TooShort`] if the buffer cannot contain a
    /// nonce and tag.
    pub fn parse(data: &'a [u8]) -> Result<Self, EnvelopeError> {
        Self::parse_with(data, NONCE_SIZE, TAG_SIZE)
    }

    /// Parse a buffer with explicitly agreed nonce and tag lengths.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::TooShort`] if
    /// `data.len() < nonce_len + tag_len`.
    pub fn parse_with(
        data: &'a [u8],
        nonce_len: usize,
        tag_len: usize,
    ) -> Result<Self, EnvelopeError> {
        let min = nonce_len + tag_len;
        if data.len() < min {
            return Err(EnvelopeError::TooShort {
                expected: min,
                actual: data.len(),
            });
        }
        Ok(Self {
            nonce: &data[..nonce_len],
            ciphertext: &data[nonce_len..data.len() - tag_len],
            tag: &data[data.len() - tag_len..],
        })
    }

    /// Raw nonce bytes.
    #[must_use]
    pub fn nonce_bytes(&self) -> &'a [u8] {
        self.nonce
    }

    /// Ciphertext slice (zero-copy).
    #[must_use]
    pub fn ciphertext(&self) -> &'a [u8] {
        self.ciphertext
    }

    /// Raw tag bytes.
    #[must_use]
    pub fn tag_bytes(&self) -> &'a [u8] {
        self.tag
    }

    /// The nonce as a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::UnsupportedLayout`] if the view was parsed
    /// with a nonce length other than 12.
    pub fn nonce(&self) -> Result<Nonce, EnvelopeError> {
        Nonce::from_slice(self.nonce).ok_or(EnvelopeError::UnsupportedLayout {
            nonce_len: self.nonce.len(),
            tag_len: self.tag.len(),
        })
    }

    /// The tag as a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::UnsupportedLayout`] if the view was parsed
    /// with a tag length other than 16.
    pub fn tag(&self) -> Result<Tag, EnvelopeError> {
        Tag::from_slice(self.tag).ok_or(EnvelopeError::UnsupportedLayout {
            nonce_len: self.nonce.len(),
            tag_len: self.tag.len(),
        })
    }

    /// Copy into an owned [`Envelope`]. Requires the standard layout.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::UnsupportedLayout`] for any other layout.
    pub fn to_owned(&self) -> Result<Envelope, EnvelopeError> {
        Ok(Envelope {
            nonce: self.nonce()?,
            ciphertext: self.ciphertext.to_vec(),
            tag: self.tag()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            nonce: Nonce::from_bytes([0x11; NONCE_SIZE]),
            ciphertext: vec![0x22; 5],
            tag: Tag::from_bytes([0x33; TAG_SIZE]),
        }
    }

    #[test]
    fn test_encode_layout() {
        let env = sample();
        let bytes = env.encode();

        assert_eq!(bytes.len(), env.encoded_len());
        assert_eq!(&bytes[..12], &[0x11; 12]);
        assert_eq!(&bytes[12..17], &[0x22; 5]);
        assert_eq!(&bytes[17..], &[0x33; 16]);
    }

    #[test]
    fn test_parse_roundtrip() {
        let env = sample();
        let bytes = env.encode();

        let parsed = EnvelopeRef::parse(&bytes).unwrap();
        assert_eq!(parsed.nonce_bytes(), env.nonce.as_bytes());
        assert_eq!(parsed.ciphertext(), &env.ciphertext[..]);
        assert_eq!(parsed.tag_bytes(), env.tag.as_bytes());

        assert_eq!(parsed.to_owned().unwrap(), env);
        assert_eq!(Envelope::decode(&bytes).unwrap(), env);
    }

    #[test]
    fn test_empty_ciphertext_is_valid() {
        let bytes = [0u8; NONCE_SIZE + TAG_SIZE];
        let parsed = EnvelopeRef::parse(&bytes).unwrap();
        assert!(parsed.ciphertext().is_empty());
    }

    #[test]
    fn test_too_short() {
        let bytes = [0u8; NONCE_SIZE + TAG_SIZE - 1];
        assert_eq!(
            EnvelopeRef::parse(&bytes),
            Err(EnvelopeError::TooShort {
                expected: 28,
                actual: 27
            })
        );

        assert!(matches!(
            EnvelopeRef::parse(&[]),
            Err(EnvelopeError::TooShort { actual: 0, .. })
        ));
    }

    #[test]
    fn test_parse_with_custom_layout() {
        // 8-byte nonce, 4-byte tag, 3-byte ciphertext
        let data = [1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 3, 3, 3, 3];
        let parsed = EnvelopeRef::parse_with(&data, 8, 4).unwrap();

        assert_eq!(parsed.nonce_bytes(), &[1u8; 8]);
        assert_eq!(parsed.ciphertext(), &[2u8; 3]);
        assert_eq!(parsed.tag_bytes(), &[3u8; 4]);

        // The nonstandard layout cannot carry typed GCM values
        assert!(matches!(
            parsed.nonce(),
            Err(EnvelopeError::UnsupportedLayout {
                nonce_len: 8,
                tag_len: 4
            })
        ));
        assert!(parsed.to_owned().is_err());
    }
}
