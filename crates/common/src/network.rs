//! Network identity types.

use crate::types::Hash256;

/// Network identifier derived from a network passphrase.
///
/// The network id participates in every transaction's full hash, so a
/// transaction set built for one network can never be mistaken for a set
/// built for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(pub Hash256);

impl NetworkId {
    /// Create a network ID from a passphrase.
    pub fn from_passphrase(passphrase: &str) -> Self {
        Self(Hash256::hash(passphrase.as_bytes()))
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Development network used by the test suites.
    pub fn devnet() -> Self {
        Self::from_passphrase("hayashi development network ; March 2026")
    }
}
