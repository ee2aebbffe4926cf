//! Ledger header types.

use hayashi_common::Hash256;

/// Header of a closed ledger.
///
/// Only the fields consulted by transaction set construction and validation
/// are carried here; execution-level state lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerHeader {
    /// Sequence number of this ledger.
    pub ledger_seq: u32,

    /// Fee charged per operation, in the network's smallest unit.
    pub base_fee: u32,

    /// Reserve required per ledger entry, in the network's smallest unit.
    pub base_reserve: u32,

    /// Maximum number of transactions a set targeting the next ledger may
    /// contain.
    pub max_tx_set_size: u32,

    /// Hash of the previous ledger.
    pub previous_ledger_hash: Hash256,
}

impl LedgerHeader {
    /// A genesis-like header used as the starting point in tests and tools.
    pub fn genesis() -> Self {
        Self {
            ledger_seq: 1,
            base_fee: 100,
            base_reserve: 5_000_000,
            max_tx_set_size: 100,
            previous_ledger_hash: Hash256::ZERO,
        }
    }
}

/// The last-closed ledger: a header paired with its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastClosedLedger {
    /// Hash of the closed ledger.
    pub hash: Hash256,

    /// The closed header.
    pub header: LedgerHeader,
}
