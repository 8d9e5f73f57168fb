//! Owned secret storage that is wiped from memory when dropped

use std::fmt;
use std::mem;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ErrorCategory, ErrorKind, PromptError, Result};

/// Maximum number of bytes accepted while a password is being entered.
pub const MAX_PASSWORD_SIZE: usize = 1000;

const MIN_GROWTH: usize = 16;

/// A byte buffer holding secret plaintext.
///
/// The full backing allocation, including spare capacity, is overwritten
/// with zeros before it is released: on drop, on [`SecretBuffer::scrub`],
/// and whenever the buffer has to move to a larger allocation. The buffer
/// cannot be cloned, `Debug` never prints the content, and equality is
/// evaluated in constant time.
pub struct SecretBuffer {
    bytes: Vec<u8>,
    max_len: usize,
}

impl SecretBuffer {
    /// Creates an empty buffer with room reserved for [`MAX_PASSWORD_SIZE`] bytes.
    pub fn new() -> Self {
        Self::with_max_len(MAX_PASSWORD_SIZE)
    }

    /// Creates an empty buffer that accepts at most `max_len` appended bytes.
    ///
    /// Up to [`MAX_PASSWORD_SIZE`] bytes are reserved upfront. Larger limits
    /// grow the allocation on demand, wiping each one it leaves behind.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(max_len.min(MAX_PASSWORD_SIZE)),
            max_len,
        }
    }

    /// Takes ownership of existing bytes without copying them.
    ///
    /// The length limit applies only to later appends; `bytes` may already
    /// be longer than [`MAX_PASSWORD_SIZE`].
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            max_len: MAX_PASSWORD_SIZE,
        }
    }

    /// Appends one byte. Returns `false`, leaving the buffer untouched, once
    /// the buffer holds `max_len` bytes.
    #[must_use]
    pub fn append(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        if self.bytes.len() == self.bytes.capacity() {
            self.grow();
        }
        self.bytes.push(byte);
        true
    }

    /// Zeroes and removes the last byte. Returns `false` if the buffer is empty.
    #[must_use]
    pub fn remove_last(&mut self) -> bool {
        match self.bytes.last_mut() {
            Some(last) => {
                last.zeroize();
                self.bytes.truncate(self.bytes.len() - 1);
                true
            }
            None => false,
        }
    }

    /// Read-only view of the secret.
    pub fn expose(&self) -> &[u8] {
        &self.bytes
    }

    /// Read-only view of the secret as text.
    pub fn expose_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.bytes).map_err(|e| {
            PromptError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::InvalidUtf8,
                "secret is not valid UTF-8",
                e,
            )
        })
    }

    /// Overwrites the whole backing allocation with zeros and empties the buffer.
    ///
    /// The allocation itself is kept; it is released when the buffer drops.
    pub fn scrub(&mut self) {
        self.bytes.zeroize();
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn is_full(&self) -> bool {
        self.bytes.len() >= self.max_len
    }

    // Vec::push would copy into a new allocation and free the old one
    // without wiping it, so move the content by hand.
    fn grow(&mut self) {
        let capacity = self
            .bytes
            .capacity()
            .saturating_mul(2)
            .max(MIN_GROWTH)
            .min(self.max_len.max(MIN_GROWTH));
        drop(self.relocate(capacity));
    }

    /// Moves the content into a fresh allocation of `capacity` bytes and
    /// returns the previous one, already zeroed over its full capacity.
    fn relocate(&mut self, capacity: usize) -> Vec<u8> {
        let mut moved = Vec::with_capacity(capacity.max(self.bytes.len()));
        moved.extend_from_slice(&self.bytes);
        let mut old = mem::replace(&mut self.bytes, moved);
        old.zeroize();
        old
    }
}

impl Default for SecretBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for SecretBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<String> for SecretBuffer {
    fn from(s: String) -> Self {
        Self::from_bytes(s.into_bytes())
    }
}

impl PartialEq for SecretBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.as_slice().ct_eq(other.bytes.as_slice()).into()
    }
}

impl Eq for SecretBuffer {}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer([REDACTED])")
    }
}

impl Zeroize for SecretBuffer {
    fn zeroize(&mut self) {
        self.scrub();
    }
}

impl ZeroizeOnDrop for SecretBuffer {}

impl Drop for SecretBuffer {
    fn drop(&mut self) {
        self.scrub();
    }
}
