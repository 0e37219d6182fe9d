//! Nonce discipline for long-lived keys.
//!
//! GCM's 96-bit nonce must never repeat under a given key. Two
//! disciplines are provided:
//!
//! - [`NonceMode::PersistentCounter`]: an 8-byte random prefix drawn once
//!   per key, followed by a 32-bit big-endian counter. One CSPRNG call
//!   per key instead of one per message, and uniqueness is deterministic
//!   for the full counter range.
//! - [`NonceMode::RandomPerMessage`]: 12 fresh random bytes every call.
//!   No state, but uniqueness is only statistical (birthday bound around
//!   2^48 messages per key).
//!
//! Nonce layout under the counter discipline:
//!
//! ```text
//! [ prefix (8, random per key) | counter (4, big-endian) ]
//! ```
//!
//! The counter range is [1, 2^32 - 1]. When it is consumed the sequence
//! refuses to produce further nonces until the caller rekeys; a fresh
//! prefix under the same key would only be statistically distinct from
//! earlier prefixes, which is not good enough to rest the no-repeat
//! invariant on.

use serde::{Deserialize, Serialize};

use super::cipher::Nonce;
use crate::{CryptoError, IV_PREFIX_SIZE, random};

/// How a session derives the nonce for each encryption.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonceMode {
    /// Per-key random prefix plus a monotonic counter. Cheapest per
    /// message; the default for constrained devices.
    #[default]
    PersistentCounter,
    /// Full random nonce per message. Stateless, but spends 12 CSPRNG
    /// bytes per call and is only birthday-bound safe.
    RandomPerMessage,
}

/// Counter-based nonce state for one key's lifetime.
///
/// Not `Clone`: duplicating counter state would let two owners emit the
/// same nonce under the same key.
#[derive(Debug)]
pub struct CounterIv {
    prefix: [u8; IV_PREFIX_SIZE],
    counter: u32,
}

impl CounterIv {
    /// Create a fresh state with a random prefix and the counter at zero.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS CSPRNG fails.
    pub fn new() -> Result<Self, CryptoError> {
        Ok(Self {
            prefix: random::random_8()?,
            counter: 0,
        })
    }

    /// Reconstruct state from explicit parts.
    ///
    /// The caller asserts that no nonce with this prefix and a counter
    /// greater than `counter` has been used under the current key.
    #[must_use]
    pub fn from_parts(prefix: [u8; IV_PREFIX_SIZE], counter: u32) -> Self {
        Self { prefix, counter }
    }

    /// Advance the counter and produce the next nonce.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NonceExhausted`] once the 32-bit counter
    /// space is consumed. The state stays exhausted; only rekeying (and
    /// with it a fresh [`CounterIv`]) restores operation.
    pub fn next(&mut self) -> Result<Nonce, CryptoError> {
        if self.counter == u32::MAX {
            return Err(CryptoError::NonceExhausted);
        }
        self.counter += 1;
        Ok(Nonce::from_parts(&self.prefix, self.counter))
    }

    /// The per-key random prefix.
    #[must_use]
    pub fn prefix(&self) -> &[u8; IV_PREFIX_SIZE] {
        &self.prefix
    }

    /// The last counter value emitted (zero before the first draw).
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Number of nonces still available before exhaustion.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        u64::from(u32::MAX - self.counter)
    }
}

/// Nonce source for one key's lifetime, per the configured mode.
///
/// Under the counter discipline the prefix is drawn lazily on the first
/// draw, so constructing a sequence is infallible and costs nothing.
#[derive(Debug)]
pub enum IvSequence {
    /// Counter discipline; `None` until the first draw under this key
    Counter(Option<CounterIv>),
    /// Fresh randomness each draw
    Random,
}

impl IvSequence {
    /// Create an empty sequence for the given mode.
    #[must_use]
    pub fn new(mode: NonceMode) -> Self {
        match mode {
            NonceMode::PersistentCounter => Self::Counter(None),
            NonceMode::RandomPerMessage => Self::Random,
        }
    }

    /// Produce the next nonce, advancing any counter state.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NonceExhausted`] when the counter space is
    /// consumed, or [`CryptoError::RandomFailed`] if the OS CSPRNG fails.
    pub fn next(&mut self) -> Result<Nonce, CryptoError> {
        match self {
            Self::Counter(state) => {
                let iv = match state {
                    Some(iv) => iv,
                    slot => slot.insert(CounterIv::new()?),
                };
                iv.next()
            }
            Self::Random => Ok(Nonce::from_bytes(random::random_12()?)),
        }
    }

    /// Nonces left before exhaustion, or `None` when unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        match self {
            Self::Counter(Some(iv)) => Some(iv.remaining()),
            Self::Counter(None) => Some(u64::from(u32::MAX)),
            Self::Random => None,
        }
    }

    /// Discard counter state so the next draw starts over with a fresh
    /// prefix. Must only be called together with a key change.
    pub fn invalidate(&mut self) {
        if let Self::Counter(state) = self {
            *state = None;
        }
    }

    /// The mode this sequence implements.
    #[must_use]
    pub fn mode(&self) -> NonceMode {
        match self {
            Self::Counter(_) => NonceMode::PersistentCounter,
            Self::Random => NonceMode::RandomPerMessage,
        }
    }
}
