//! The transaction frame.

use std::sync::Arc;

use tracing::trace;

use hayashi_common::{AccountId, Hash256, NetworkId, SequenceNumber};
use hayashi_crypto::Sha256Hasher;
use hayashi_ledger::{LedgerManager, ReadScope};

use crate::envelope::TransactionEnvelope;
use crate::whitelist::Whitelist;

/// Shared handle to an immutable transaction frame.
///
/// Transactions are referenced both from transaction sets and from candidate
/// pools; the reference count keeps identity stable across both.
pub type TransactionFramePtr = Arc<TransactionFrame>;

/// An immutable transaction bound to a network.
///
/// The full hash covers the network id and the canonical wire bytes of the
/// envelope, so it identifies one transaction on one network. It is distinct
/// from any semantic content hash: two envelopes differing only in their
/// signatures still have different full hashes.
#[derive(Debug)]
pub struct TransactionFrame {
    envelope: TransactionEnvelope,
    full_hash: Hash256,
}

impl TransactionFrame {
    /// Build a frame from a wire envelope.
    ///
    /// This is the factory used when decoding transaction sets: the network
    /// id participates in the full hash so sets cannot migrate across
    /// networks.
    pub fn make_from_wire(network_id: NetworkId, envelope: TransactionEnvelope) -> TransactionFramePtr {
        let mut hasher = Sha256Hasher::new();
        hasher.update(network_id.as_bytes());
        hasher.update(&envelope.to_wire());
        let full_hash = hasher.finalize();
        Arc::new(Self {
            envelope,
            full_hash,
        })
    }

    /// The account this transaction spends from.
    pub fn source_id(&self) -> AccountId {
        self.envelope.source
    }

    /// The transaction's sequence number.
    pub fn seq_num(&self) -> SequenceNumber {
        self.envelope.seq_num
    }

    /// The declared fee.
    pub fn fee(&self) -> i64 {
        self.envelope.fee
    }

    /// The transaction's unique byte-identity on its network.
    pub fn full_hash(&self) -> Hash256 {
        self.full_hash
    }

    /// The wire envelope.
    pub fn envelope(&self) -> &TransactionEnvelope {
        &self.envelope
    }

    /// Minimum fee for this transaction under the given ledger.
    ///
    /// Floored at 1 so fee ratios stay finite.
    pub fn min_fee(&self, lm: &LedgerManager) -> i64 {
        (self.envelope.op_count.max(1) as i64 * lm.base_fee() as i64).max(1)
    }

    /// Declared fee normalized by the minimum fee.
    ///
    /// Higher ratios buy priority during surge pricing; a ratio below 1.0
    /// never passes validity in the first place.
    pub fn fee_ratio(&self, lm: &LedgerManager) -> f64 {
        self.envelope.fee as f64 / self.min_fee(lm) as f64
    }

    /// Whether the whitelist grants this transaction priority inclusion.
    pub fn is_whitelisted(&self, whitelist: &Whitelist) -> bool {
        whitelist.contains(&self.envelope.source)
    }

    /// Check the transaction against current account state.
    ///
    /// `last_seq` is the sequence number of the previous transaction admitted
    /// for the same account within the set being checked, or 0 when this is
    /// the account's first; in that case the account's stored sequence number
    /// is the baseline. The sequence must follow its baseline with no gap.
    pub fn check_valid(
        &self,
        scope: &ReadScope<'_>,
        lm: &LedgerManager,
        last_seq: SequenceNumber,
    ) -> bool {
        let Some(account) = scope.account(&self.envelope.source) else {
            trace!(tx = %self.full_hash, "source account does not exist");
            return false;
        };

        let baseline = if last_seq == 0 {
            account.seq_num
        } else {
            last_seq
        };
        if self.envelope.seq_num != baseline + 1 {
            trace!(
                tx = %self.full_hash,
                seq_num = self.envelope.seq_num,
                baseline,
                "bad sequence number"
            );
            return false;
        }

        if self.envelope.fee < self.min_fee(lm) {
            trace!(tx = %self.full_hash, fee = self.envelope.fee, "fee below minimum");
            return false;
        }

        if self.envelope.signature.is_empty() {
            trace!(tx = %self.full_hash, "missing signature");
            return false;
        }

        true
    }
}
