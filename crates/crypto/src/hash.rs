//! SHA-256 hashing utilities.
//!
//! This module provides the SHA-256 hash function in both single-shot and
//! streaming modes. All functions return [`Hash256`], a 32-byte hash value.
//!
//! # SHA-256
//!
//! ```
//! use hayashi_crypto::sha256;
//!
//! let hash = sha256(b"hello world");
//! ```
//!
//! # Streaming
//!
//! ```
//! use hayashi_crypto::Sha256Hasher;
//!
//! let mut hasher = Sha256Hasher::new();
//! hasher.update(b"chunk 1");
//! hasher.update(b"chunk 2");
//! let hash = hasher.finalize();
//! ```

use hayashi_common::Hash256;
use sha2::{Digest, Sha256};

/// Computes the SHA-256 hash of the given data.
///
/// This is a convenience function for single-shot hashing. For streaming
/// hashing of large or chunked data, use [`Sha256Hasher`] instead.
pub fn sha256(data: &[u8]) -> Hash256 {
    Hash256::hash(data)
}

/// Computes the SHA-256 hash of multiple data chunks.
///
/// This is equivalent to concatenating all chunks and hashing the result,
/// but avoids the memory allocation of creating an intermediate buffer.
///
/// # Example
///
/// ```
/// use hayashi_crypto::{sha256, sha256_multi};
///
/// let hash1 = sha256(b"helloworld");
/// let hash2 = sha256_multi(&[b"hello", b"world"]);
/// assert_eq!(hash1, hash2);
/// ```
pub fn sha256_multi(chunks: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    Hash256(bytes)
}

/// Compares two hashes after XORing each with a third.
///
/// Returns `true` iff `(a XOR k) < (b XOR k)` lexicographically. Sorting by
/// this relation with `k` set to a value unknown at submission time yields an
/// order that is deterministic across replicas but unpredictable to the
/// parties that produced `a` and `b`.
pub fn less_than_xored(a: &Hash256, b: &Hash256, k: &Hash256) -> bool {
    for i in 0..32 {
        let xa = a.0[i] ^ k.0[i];
        let xb = b.0[i] ^ k.0[i];
        if xa != xb {
            return xa < xb;
        }
    }
    false
}

/// A streaming SHA-256 hasher for incremental hash computation.
///
/// Use this when you need to hash data that is not available all at once,
/// such as a ledger hash followed by a sequence of wire envelopes.
pub struct Sha256Hasher {
    inner: Sha256,
}

impl Sha256Hasher {
    /// Creates a new SHA-256 hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Resets the hasher to its initial state.
    pub fn reset(&mut self) {
        self.inner = Sha256::new();
    }

    /// Feeds data into the hasher.
    ///
    /// This method can be called multiple times to incrementally add data.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Consumes the hasher and returns the computed hash.
    ///
    /// After calling this method, the hasher cannot be used again.
    pub fn finalize(self) -> Hash256 {
        let result = self.inner.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        Hash256(bytes)
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}
