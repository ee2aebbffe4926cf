//! The ledger manager.

use parking_lot::RwLock;
use tracing::debug;

use hayashi_common::Hash256;

use crate::header::{LastClosedLedger, LedgerHeader};

/// Publishes the last-closed ledger to the rest of the node.
///
/// Transaction set construction reads the current capacity limit and base
/// fee from here; the consensus driver advances it when a ledger closes.
pub struct LedgerManager {
    lcl: RwLock<LastClosedLedger>,
}

impl LedgerManager {
    /// Create a manager positioned on the given last-closed ledger.
    pub fn new(lcl: LastClosedLedger) -> Self {
        Self {
            lcl: RwLock::new(lcl),
        }
    }

    /// Create a manager positioned on a genesis ledger with the given hash.
    pub fn genesis(hash: Hash256) -> Self {
        Self::new(LastClosedLedger {
            hash,
            header: LedgerHeader::genesis(),
        })
    }

    /// Snapshot of the last-closed ledger.
    pub fn last_closed_ledger(&self) -> LastClosedLedger {
        self.lcl.read().clone()
    }

    /// Hash of the last-closed ledger.
    pub fn last_closed_ledger_hash(&self) -> Hash256 {
        self.lcl.read().hash
    }

    /// Maximum number of transactions a set for the next ledger may contain.
    pub fn max_tx_set_size(&self) -> usize {
        self.lcl.read().header.max_tx_set_size as usize
    }

    /// Fee charged per operation.
    pub fn base_fee(&self) -> u32 {
        self.lcl.read().header.base_fee
    }

    /// Advance to a newly closed ledger.
    pub fn set_last_closed_ledger(&self, lcl: LastClosedLedger) {
        debug!(
            ledger_seq = lcl.header.ledger_seq,
            hash = %lcl.hash,
            "advancing last-closed ledger"
        );
        *self.lcl.write() = lcl;
    }
}
