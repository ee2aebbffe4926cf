//! Cryptographic hashing utilities for hayashi.
//!
//! This crate wraps the SHA-256 primitives used for consensus-critical
//! digests and provides the XOR-distance ordering used to shuffle
//! transaction apply order deterministically.

pub mod hash;
pub mod hex;

pub use hash::{less_than_xored, sha256, sha256_multi, Sha256Hasher};
pub use self::hex::{bin_to_hex, hex_abbrev, hex_to_bin, hex_to_bin_256};
