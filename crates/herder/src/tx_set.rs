//! The transaction set frame.
//!
//! A [`TxSetFrame`] collects the candidate transactions proposed for the
//! next ledger. Replicas vote on its content hash, so everything here is
//! consensus-binding: the canonical order is ascending full hash, the hash
//! covers the parent ledger hash followed by the canonical-order wire
//! envelopes, and the apply order is derived from the content hash so no
//! submitter can predict it ahead of time.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use hayashi_common::{Hash256, NetworkId, Result, SequenceNumber, WireReader, WireWriter};
use hayashi_crypto::{hex_abbrev, less_than_xored, Sha256Hasher};
use hayashi_ledger::{LedgerManager, ReadScope};
use hayashi_tx::{TransactionEnvelope, TransactionFrame, TransactionFramePtr};

use crate::context::AppContext;
use crate::surge_pricing::{account_fee_ratios, surge_order};

/// Wire form of a transaction set.
///
/// `previous_ledger_hash` followed by a length-prefixed array of envelope
/// bytes. Carries whatever order the sender chose; decoding does not
/// canonicalize.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionSet {
    /// Hash of the ledger this set builds on.
    pub previous_ledger_hash: Hash256,

    /// Envelopes in sender order.
    pub txs: Vec<TransactionEnvelope>,
}

impl TransactionSet {
    /// Encode to canonical wire bytes.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.put_hash(&self.previous_ledger_hash);
        w.put_u32(self.txs.len() as u32);
        for tx in &self.txs {
            w.put_var_opaque(&tx.to_wire());
        }
        w.into_bytes()
    }

    /// Decode from wire bytes.
    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        let mut r = WireReader::new(bytes);
        let previous_ledger_hash = r.get_hash()?;
        let count = r.get_u32()? as usize;
        let mut txs = Vec::new();
        for _ in 0..count {
            let payload = r.get_var_opaque()?;
            txs.push(TransactionEnvelope::from_wire(&payload)?);
        }
        r.finish()?;
        Ok(Self {
            previous_ledger_hash,
            txs,
        })
    }
}

/// Decides what happens when a check finds a bad transaction.
///
/// Both operations return `true` to continue scanning and `false` to abort
/// the whole check as failed.
pub(crate) trait CheckTxPolicy {
    /// A transaction failed its validity check. `last_seq` is the sequence
    /// number of the previous transaction admitted for the same account, or
    /// 0 if none was.
    fn on_invalid_tx(&mut self, tx: &TransactionFramePtr, last_seq: SequenceNumber) -> bool;

    /// An account cannot cover the fees of its transactions. `txs` is the
    /// account's full list.
    fn on_insufficient_balance(&mut self, txs: &[TransactionFramePtr]) -> bool;
}

/// Abort-on-any policy backing [`TxSetFrame::check_valid`].
struct AbortOnInvalid {
    previous_ledger_hash: Hash256,
}

impl CheckTxPolicy for AbortOnInvalid {
    fn on_invalid_tx(&mut self, tx: &TransactionFramePtr, last_seq: SequenceNumber) -> bool {
        debug!(
            tx_set = %hex_abbrev(self.previous_ledger_hash.as_bytes()),
            tx = %tx.full_hash(),
            source = %tx.source_id(),
            seq_num = tx.seq_num(),
            last_seq,
            "bad tx set: tx invalid"
        );
        false
    }

    fn on_insufficient_balance(&mut self, txs: &[TransactionFramePtr]) -> bool {
        debug!(
            tx_set = %hex_abbrev(self.previous_ledger_hash.as_bytes()),
            source = %txs[0].source_id(),
            "bad tx set: account can't pay fee"
        );
        false
    }
}

/// Trim-and-continue policy backing [`TxSetFrame::trim_invalid`].
///
/// Offenders are collected here and removed from the set after the scan; the
/// scan itself walks a snapshot, so collection order is stable.
struct TrimAndContinue {
    previous_ledger_hash: Hash256,
    seen: BTreeSet<Hash256>,
    trimmed: Vec<TransactionFramePtr>,
}

impl TrimAndContinue {
    fn new(previous_ledger_hash: Hash256) -> Self {
        Self {
            previous_ledger_hash,
            seen: BTreeSet::new(),
            trimmed: Vec::new(),
        }
    }

    fn collect(&mut self, tx: &TransactionFramePtr) {
        if self.seen.insert(tx.full_hash()) {
            self.trimmed.push(tx.clone());
        }
    }
}

impl CheckTxPolicy for TrimAndContinue {
    fn on_invalid_tx(&mut self, tx: &TransactionFramePtr, last_seq: SequenceNumber) -> bool {
        debug!(
            tx_set = %hex_abbrev(self.previous_ledger_hash.as_bytes()),
            tx = %tx.full_hash(),
            source = %tx.source_id(),
            seq_num = tx.seq_num(),
            last_seq,
            "bad tx set: trimming invalid tx"
        );
        self.collect(tx);
        true
    }

    fn on_insufficient_balance(&mut self, txs: &[TransactionFramePtr]) -> bool {
        debug!(
            tx_set = %hex_abbrev(self.previous_ledger_hash.as_bytes()),
            source = %txs[0].source_id(),
            count = txs.len(),
            "bad tx set: trimming account that can't pay fee"
        );
        // Dropping only the tail would leave a sequence gap, so the whole
        // account goes.
        for tx in txs {
            self.collect(tx);
        }
        true
    }
}

/// The set of transactions proposed for the next ledger.
///
/// Single-owner value: the consensus driver owns it exclusively from
/// construction through apply-order emission. The content hash is memoized
/// and every mutating entry point invalidates the memo before returning.
pub struct TxSetFrame {
    previous_ledger_hash: Hash256,
    transactions: Vec<TransactionFramePtr>,
    hash: Hash256,
    hash_is_valid: bool,
}

impl TxSetFrame {
    /// Create an empty set building on the given ledger.
    pub fn new(previous_ledger_hash: Hash256) -> Self {
        Self {
            previous_ledger_hash,
            transactions: Vec::new(),
            hash: Hash256::ZERO,
            hash_is_valid: false,
        }
    }

    /// Reconstruct a set from its wire form.
    ///
    /// Envelopes are rebuilt into frames in wire order; the result is not
    /// canonical until [`TxSetFrame::sort_for_hash`] runs.
    pub fn from_wire(network_id: NetworkId, wire: &TransactionSet) -> Self {
        let transactions = wire
            .txs
            .iter()
            .map(|env| TransactionFrame::make_from_wire(network_id, env.clone()))
            .collect();
        Self {
            previous_ledger_hash: wire.previous_ledger_hash,
            transactions,
            hash: Hash256::ZERO,
            hash_is_valid: false,
        }
    }

    /// Serialize into `out` in the set's current order.
    ///
    /// No implicit sorting: callers that need canonical wire output call
    /// [`TxSetFrame::sort_for_hash`] first.
    pub fn to_wire(&self, out: &mut TransactionSet) {
        out.previous_ledger_hash = self.previous_ledger_hash;
        out.txs = self
            .transactions
            .iter()
            .map(|tx| tx.envelope().clone())
            .collect();
    }

    /// The transactions in their current order.
    pub fn transactions(&self) -> &[TransactionFramePtr] {
        &self.transactions
    }

    /// Number of transactions in the set.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Hash of the ledger this set builds on.
    pub fn previous_ledger_hash(&self) -> Hash256 {
        self.previous_ledger_hash
    }

    /// Re-parent the set onto a different ledger.
    pub fn set_previous_ledger_hash(&mut self, hash: Hash256) {
        self.previous_ledger_hash = hash;
        self.hash_is_valid = false;
    }

    /// Append a transaction.
    pub fn add_tx(&mut self, tx: TransactionFramePtr) {
        self.transactions.push(tx);
        self.hash_is_valid = false;
    }

    /// Remove a transaction by its full-hash identity, if present.
    pub fn remove_tx(&mut self, tx: &TransactionFramePtr) {
        if let Some(pos) = self
            .transactions
            .iter()
            .position(|t| t.full_hash() == tx.full_hash())
        {
            self.transactions.remove(pos);
        }
        self.hash_is_valid = false;
    }

    /// Sort into canonical order: ascending by full hash.
    ///
    /// The full hash is used rather than any content digest because multiple
    /// transactions could share identical contents.
    pub fn sort_for_hash(&mut self) {
        self.transactions.sort_by_key(|tx| tx.full_hash());
        self.hash_is_valid = false;
    }

    /// The consensus-binding identity of this set.
    ///
    /// Canonicalizes the set, then digests the parent ledger hash followed by
    /// every envelope's wire bytes in canonical order. Memoized until the
    /// next mutation.
    pub fn contents_hash(&mut self) -> Hash256 {
        if !self.hash_is_valid {
            self.sort_for_hash();
            let mut hasher = Sha256Hasher::new();
            hasher.update(self.previous_ledger_hash.as_bytes());
            for tx in &self.transactions {
                hasher.update(&tx.envelope().to_wire());
            }
            self.hash = hasher.finalize();
            self.hash_is_valid = true;
        }
        self.hash
    }

    /// Build the list of transactions in the order they will be applied.
    ///
    /// The order satisfies:
    /// * transactions for an account are sorted by sequence number (ascending)
    /// * the order between accounts is randomized by the set's content hash,
    ///   which nobody knows until the set is complete
    pub fn sort_for_apply(&mut self) -> Vec<TransactionFramePtr> {
        let set_hash = self.contents_hash();

        let mut work = self.transactions.clone();
        work.sort_by_key(|tx| tx.seq_num());

        // batch[i] holds the i-th transaction of every account that has one
        let mut batches: Vec<Vec<TransactionFramePtr>> = vec![Vec::new(); 4];
        let mut account_tx_count: BTreeMap<_, usize> = BTreeMap::new();
        for tx in &work {
            let rank = account_tx_count.entry(tx.source_id()).or_insert(0);
            if *rank >= batches.len() {
                batches.resize(*rank + 4, Vec::new());
            }
            batches[*rank].push(tx.clone());
            *rank += 1;
        }

        let mut apply_list = Vec::with_capacity(work.len());
        for batch in &mut batches {
            batch.sort_by(|tx1, tx2| {
                if less_than_xored(&tx1.full_hash(), &tx2.full_hash(), &set_hash) {
                    Ordering::Less
                } else if less_than_xored(&tx2.full_hash(), &tx1.full_hash(), &set_hash) {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            });
            apply_list.extend(batch.iter().cloned());
        }
        apply_list
    }

    /// Trim the set to the ledger's capacity, by fee when oversubscribed.
    ///
    /// Whitelisted transactions are admitted first into the capacity left
    /// after the unwhitelisted reserve, with the whitelist holder winning any
    /// contention. Non-whitelisted transactions then compete by account fee
    /// ratio for the reserve plus whatever whitelist capacity went unused.
    pub fn surge_pricing_filter(&mut self, lm: &LedgerManager, ctx: &AppContext) {
        let max = lm.max_tx_set_size();
        if self.transactions.len() <= max {
            return;
        }

        // surge pricing in effect!
        warn!(count = self.transactions.len(), max, "surge pricing in effect");

        let whitelist = ctx.whitelist();
        let mut reserve = whitelist.unwhitelisted_reserve(max);

        let (mut whitelisted, unwhitelisted): (Vec<_>, Vec<_>) = self
            .transactions
            .iter()
            .cloned()
            .partition(|tx| tx.is_whitelisted(whitelist));

        // Don't hold empty seats when there aren't enough non-whitelisted
        // candidates to fill the reserve.
        if unwhitelisted.len() < reserve {
            reserve = unwhitelisted.len();
        }

        let fee_ratios = account_fee_ratios(&self.transactions, lm);

        let whitelist_capacity = max.saturating_sub(reserve);
        whitelisted
            .sort_by(|a, b| surge_order(a, b, &fee_ratios, true, whitelist.account_id()));
        if whitelisted.len() > whitelist_capacity {
            // The partitioned list is a snapshot, so removal is safe mid-walk.
            for tx in &whitelisted[whitelist_capacity..] {
                self.remove_tx(tx);
            }
        }

        let extra_whitelist_room =
            whitelist_capacity.saturating_sub(whitelisted.len().min(whitelist_capacity));
        let total_unwhitelisted_capacity = reserve + extra_whitelist_room;

        // Unused whitelist slack absorbs the rest.
        if unwhitelisted.len() <= total_unwhitelisted_capacity {
            return;
        }

        let mut ranked = unwhitelisted;
        ranked.sort_by(|a, b| surge_order(a, b, &fee_ratios, false, whitelist.account_id()));
        for tx in &ranked[total_unwhitelisted_capacity..] {
            self.remove_tx(tx);
        }
    }

    /// Shared engine behind [`TxSetFrame::trim_invalid`] and
    /// [`TxSetFrame::check_valid`].
    ///
    /// Requires canonical order as a precondition; walks each account's
    /// transactions in sequence order, checking validity and accumulating
    /// non-whitelisted fees, then checks the account can cover them above its
    /// minimum balance. The policy decides whether offenders abort the check.
    fn check_or_trim(
        &self,
        ctx: &AppContext,
        scope: &ReadScope<'_>,
        policy: &mut dyn CheckTxPolicy,
    ) -> bool {
        let mut account_txs: BTreeMap<_, Vec<TransactionFramePtr>> = BTreeMap::new();

        let mut last_hash = Hash256::ZERO;
        for tx in &self.transactions {
            if tx.full_hash() < last_hash {
                debug!(
                    tx_set = %hex_abbrev(self.previous_ledger_hash.as_bytes()),
                    "bad tx set: not sorted correctly"
                );
                return false;
            }
            account_txs.entry(tx.source_id()).or_default().push(tx.clone());
            last_hash = tx.full_hash();
        }

        let lm = ctx.ledger_manager();
        let header = lm.last_closed_ledger().header;
        let whitelist = ctx.whitelist();

        for (account_id, txs) in account_txs.iter_mut() {
            txs.sort_by_key(|tx| tx.seq_num());

            let mut any_valid = false;
            let mut last_seq: SequenceNumber = 0;
            let mut tot_fee: i64 = 0;
            for tx in txs.iter() {
                if !tx.check_valid(scope, lm, last_seq) {
                    if policy.on_invalid_tx(tx, last_seq) {
                        continue;
                    }
                    return false;
                }
                tot_fee += if tx.is_whitelisted(whitelist) { 0 } else { tx.fee() };

                any_valid = true;
                last_seq = tx.seq_num();
            }

            if any_valid {
                // make sure the account can pay the fees for all these txs
                if let Some(account) = scope.account(account_id) {
                    let new_balance = account.balance - tot_fee;
                    if new_balance < account.minimum_balance(&header)
                        && !policy.on_insufficient_balance(txs)
                    {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Remove every transaction the next ledger would reject.
    ///
    /// Sorts the set canonical first, then scans with continue-semantics:
    /// invalid transactions are dropped individually, and an account that
    /// cannot cover its fees loses all of its transactions. Offenders are
    /// appended to `trimmed`.
    pub fn trim_invalid(&mut self, ctx: &AppContext, trimmed: &mut Vec<TransactionFramePtr>) {
        // Read-only view of account state for the duration of the scan.
        let scope = ctx.store().read_only_scope();

        self.sort_for_hash();

        let mut policy = TrimAndContinue::new(self.previous_ledger_hash);
        self.check_or_trim(ctx, &scope, &mut policy);
        drop(scope);

        for tx in policy.trimmed {
            self.remove_tx(&tx);
            trimmed.push(tx);
        }
    }

    /// Whether the set is acceptable for the next ledger as it stands.
    ///
    /// Verifies the parent ledger hash and the size limit up front, then
    /// runs the shared check with abort-semantics. Never repairs anything.
    pub fn check_valid(&self, ctx: &AppContext) -> bool {
        // Read-only view of account state for the duration of the scan.
        let scope = ctx.store().read_only_scope();

        let lcl = ctx.ledger_manager().last_closed_ledger();
        if lcl.hash != self.previous_ledger_hash {
            debug!(
                tx_set = %hex_abbrev(self.previous_ledger_hash.as_bytes()),
                expected = %hex_abbrev(lcl.hash.as_bytes()),
                "bad tx set: wrong previous ledger"
            );
            return false;
        }

        if self.transactions.len() > lcl.header.max_tx_set_size as usize {
            debug!(
                tx_set = %hex_abbrev(self.previous_ledger_hash.as_bytes()),
                count = self.transactions.len(),
                max = lcl.header.max_tx_set_size,
                "bad tx set: too many txs"
            );
            return false;
        }

        let mut policy = AbortOnInvalid {
            previous_ledger_hash: self.previous_ledger_hash,
        };
        self.check_or_trim(ctx, &scope, &mut policy)
    }

    /// Summarize the set for logging.
    pub fn summary(&self) -> String {
        if self.transactions.is_empty() {
            return "empty tx set".to_string();
        }
        let tx_count = self.transactions.len();
        let op_count: u64 = self
            .transactions
            .iter()
            .map(|tx| tx.envelope().op_count as u64)
            .sum();
        let min_fee = self
            .transactions
            .iter()
            .map(|tx| tx.fee())
            .min()
            .unwrap_or(0);
        format!("txs:{}, ops:{}, min_fee:{}", tx_count, op_count, min_fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use hayashi_common::AccountId;
    use hayashi_crypto::sha256_multi;
    use hayashi_ledger::{AccountEntry, LastClosedLedger, LedgerHeader, LedgerManager, LedgerStore};
    use hayashi_tx::Whitelist;

    fn network() -> NetworkId {
        NetworkId::devnet()
    }

    fn make_tx(seed: u8, seq_num: u64, fee: i64) -> TransactionFramePtr {
        TransactionFrame::make_from_wire(
            network(),
            TransactionEnvelope {
                source: AccountId([seed; 32]),
                seq_num,
                fee,
                op_count: 1,
                signature: vec![seed; 64],
            },
        )
    }

    fn make_context(max_tx_set_size: u32, whitelist: Whitelist) -> AppContext {
        let lcl = LastClosedLedger {
            hash: Hash256::hash(b"last closed"),
            header: LedgerHeader {
                ledger_seq: 7,
                base_fee: 100,
                base_reserve: 5_000_000,
                max_tx_set_size,
                previous_ledger_hash: Hash256::ZERO,
            },
        };
        AppContext::new(
            network(),
            Arc::new(LedgerManager::new(lcl)),
            Arc::new(LedgerStore::new()),
            whitelist,
        )
    }

    fn fund(ctx: &AppContext, seed: u8, balance: i64, seq_num: u64) {
        ctx.store().upsert_account(AccountEntry {
            account_id: AccountId([seed; 32]),
            balance,
            seq_num,
            num_sub_entries: 0,
        });
    }

    // =========================================================================
    // Canonicalization and content hash
    // =========================================================================

    #[test]
    fn test_sort_for_hash_orders_by_full_hash() {
        let mut set = TxSetFrame::new(Hash256::ZERO);
        for seed in [5u8, 1, 3, 2, 4] {
            set.add_tx(make_tx(seed, 1, 100));
        }
        set.sort_for_hash();
        let hashes: Vec<_> = set.transactions().iter().map(|t| t.full_hash()).collect();
        for pair in hashes.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_contents_hash_matches_manual_digest() {
        let prev = Hash256::hash(b"prev");
        let mut set = TxSetFrame::new(prev);
        let a = make_tx(1, 1, 100);
        let b = make_tx(2, 1, 100);
        set.add_tx(a.clone());
        set.add_tx(b.clone());

        let hash = set.contents_hash();

        let mut canonical = vec![a, b];
        canonical.sort_by_key(|t| t.full_hash());
        let env0 = canonical[0].envelope().to_wire();
        let env1 = canonical[1].envelope().to_wire();
        let expected = sha256_multi(&[prev.as_bytes(), &env0, &env1]);
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_contents_hash_is_memoized_and_stable() {
        let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
        set.add_tx(make_tx(1, 1, 100));
        let first = set.contents_hash();
        assert_eq!(set.contents_hash(), first);
    }

    #[test]
    fn test_contents_hash_changes_on_mutation() {
        let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
        set.add_tx(make_tx(1, 1, 100));
        let before = set.contents_hash();

        set.add_tx(make_tx(2, 1, 100));
        assert_ne!(set.contents_hash(), before);

        let with_two = set.contents_hash();
        set.remove_tx(&make_tx(2, 1, 100));
        assert_ne!(set.contents_hash(), with_two);
        assert_eq!(set.contents_hash(), before);
    }

    #[test]
    fn test_contents_hash_changes_on_reparent() {
        let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
        set.add_tx(make_tx(1, 1, 100));
        let before = set.contents_hash();
        set.set_previous_ledger_hash(Hash256::hash(b"other"));
        assert_ne!(set.contents_hash(), before);
    }

    #[test]
    fn test_contents_hash_independent_of_insertion_order() {
        let prev = Hash256::hash(b"prev");
        let mut forward = TxSetFrame::new(prev);
        let mut backward = TxSetFrame::new(prev);
        for seed in 1..=5u8 {
            forward.add_tx(make_tx(seed, 1, 100));
            backward.add_tx(make_tx(6 - seed, 1, 100));
        }
        assert_eq!(forward.contents_hash(), backward.contents_hash());
    }

    #[test]
    fn test_empty_set_hash_is_digest_of_parent() {
        let prev = Hash256([0x11; 32]);
        let mut set = TxSetFrame::new(prev);
        assert_eq!(set.contents_hash(), Hash256::hash(prev.as_bytes()));
    }

    #[test]
    fn test_remove_tx_absent_is_noop_on_contents() {
        let mut set = TxSetFrame::new(Hash256::ZERO);
        set.add_tx(make_tx(1, 1, 100));
        set.remove_tx(&make_tx(2, 1, 100));
        assert_eq!(set.len(), 1);
    }

    // =========================================================================
    // Apply order
    // =========================================================================

    #[test]
    fn test_sort_for_apply_preserves_per_account_seq_order() {
        let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
        for seed in 1..=3u8 {
            for seq in 1..=4u64 {
                set.add_tx(make_tx(seed, seq, 100));
            }
        }
        let apply = set.sort_for_apply();
        assert_eq!(apply.len(), 12);

        for seed in 1..=3u8 {
            let seqs: Vec<_> = apply
                .iter()
                .filter(|tx| tx.source_id() == AccountId([seed; 32]))
                .map(|tx| tx.seq_num())
                .collect();
            assert_eq!(seqs, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_sort_for_apply_is_a_permutation() {
        let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
        for seed in 1..=5u8 {
            set.add_tx(make_tx(seed, 1, 100));
            set.add_tx(make_tx(seed, 2, 100));
        }
        let apply = set.sort_for_apply();

        let mut expected: Vec<_> = set.transactions().iter().map(|t| t.full_hash()).collect();
        let mut actual: Vec<_> = apply.iter().map(|t| t.full_hash()).collect();
        expected.sort();
        actual.sort();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_sort_for_apply_is_deterministic() {
        let build = || {
            let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
            for seed in [4u8, 2, 5, 1, 3] {
                set.add_tx(make_tx(seed, 1, 100));
            }
            set
        };
        let a: Vec<_> = build().sort_for_apply().iter().map(|t| t.full_hash()).collect();
        let b: Vec<_> = build().sort_for_apply().iter().map(|t| t.full_hash()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sort_for_apply_batches_by_rank() {
        // A has seqs 1,2; B has seq 5. Batch 0 holds A's first and B's only
        // tx; batch 1 holds A's second, which must come after all of batch 0.
        let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
        let a1 = make_tx(1, 1, 100);
        let a2 = make_tx(1, 2, 100);
        let b5 = make_tx(2, 5, 100);
        set.add_tx(a1.clone());
        set.add_tx(a2.clone());
        set.add_tx(b5.clone());

        let apply = set.sort_for_apply();
        assert_eq!(apply.len(), 3);
        assert_eq!(apply[2].full_hash(), a2.full_hash());
        let batch0: BTreeSet<_> = apply[..2].iter().map(|t| t.full_hash()).collect();
        assert!(batch0.contains(&a1.full_hash()));
        assert!(batch0.contains(&b5.full_hash()));
    }

    #[test]
    fn test_sort_for_apply_does_not_change_membership() {
        let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
        set.add_tx(make_tx(1, 1, 100));
        set.add_tx(make_tx(2, 1, 100));
        let before = set.len();
        let _ = set.sort_for_apply();
        assert_eq!(set.len(), before);
    }

    // =========================================================================
    // Surge pricing
    // =========================================================================

    #[test]
    fn test_surge_noop_at_or_under_capacity() {
        let ctx = make_context(3, Whitelist::default());
        let mut set = TxSetFrame::new(Hash256::ZERO);
        for seed in 1..=3u8 {
            set.add_tx(make_tx(seed, 1, 100));
        }
        set.surge_pricing_filter(ctx.ledger_manager(), &ctx);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_surge_drops_lowest_fee_ratio_accounts() {
        let ctx = make_context(2, Whitelist::default());
        let mut set = TxSetFrame::new(Hash256::ZERO);
        set.add_tx(make_tx(1, 1, 100)); // ratio 1.0
        set.add_tx(make_tx(2, 1, 200)); // ratio 2.0
        set.add_tx(make_tx(3, 1, 300)); // ratio 3.0

        set.surge_pricing_filter(ctx.ledger_manager(), &ctx);

        assert_eq!(set.len(), 2);
        let sources: BTreeSet<_> = set.transactions().iter().map(|t| t.source_id()).collect();
        assert!(!sources.contains(&AccountId([1; 32])));
        assert!(sources.contains(&AccountId([2; 32])));
        assert!(sources.contains(&AccountId([3; 32])));
    }

    #[test]
    fn test_surge_account_ranked_by_its_worst_tx() {
        // Account 1 pays well on seq 1 but badly on seq 2; account 2 and 3
        // pay evenly. The account-level ratio is the minimum, so account 1
        // loses both its transactions.
        let ctx = make_context(2, Whitelist::default());
        let mut set = TxSetFrame::new(Hash256::ZERO);
        set.add_tx(make_tx(1, 1, 1_000));
        set.add_tx(make_tx(1, 2, 110));
        set.add_tx(make_tx(2, 1, 200));
        set.add_tx(make_tx(3, 1, 300));

        set.surge_pricing_filter(ctx.ledger_manager(), &ctx);

        assert_eq!(set.len(), 2);
        let sources: BTreeSet<_> = set.transactions().iter().map(|t| t.source_id()).collect();
        assert!(!sources.contains(&AccountId([1; 32])));
    }

    #[test]
    fn test_surge_whitelist_holder_and_reserve() {
        // max=2, reserve=1: one whitelist seat, one unwhitelisted seat.
        // Holder W beats whitelisted X for the whitelist seat; Y (5.0)
        // beats Z (1.0) for the reserve seat.
        let holder = AccountId([9; 32]);
        let member = AccountId([8; 32]);
        let whitelist = Whitelist::new([member], Some(holder), 50);
        let ctx = make_context(2, whitelist);

        let mut set = TxSetFrame::new(Hash256::ZERO);
        set.add_tx(make_tx(9, 1, 100)); // holder
        set.add_tx(make_tx(8, 1, 100)); // whitelisted non-holder
        set.add_tx(make_tx(1, 1, 500)); // ratio 5.0
        set.add_tx(make_tx(2, 1, 100)); // ratio 1.0

        set.surge_pricing_filter(ctx.ledger_manager(), &ctx);

        assert_eq!(set.len(), 2);
        let sources: BTreeSet<_> = set.transactions().iter().map(|t| t.source_id()).collect();
        assert!(sources.contains(&holder));
        assert!(sources.contains(&AccountId([1; 32])));
    }

    #[test]
    fn test_surge_unused_whitelist_room_goes_to_unwhitelisted() {
        // max=4, reserve=1, only one whitelisted candidate: three
        // unwhitelisted seats remain.
        let member = AccountId([8; 32]);
        let whitelist = Whitelist::new([member], None, 25);
        let ctx = make_context(4, whitelist);

        let mut set = TxSetFrame::new(Hash256::ZERO);
        set.add_tx(make_tx(8, 1, 100));
        set.add_tx(make_tx(1, 1, 200));
        set.add_tx(make_tx(2, 1, 300));
        set.add_tx(make_tx(3, 1, 400));
        set.add_tx(make_tx(4, 1, 500));

        set.surge_pricing_filter(ctx.ledger_manager(), &ctx);

        assert_eq!(set.len(), 4);
        let sources: BTreeSet<_> = set.transactions().iter().map(|t| t.source_id()).collect();
        assert!(sources.contains(&member));
        // lowest unwhitelisted ratio dropped
        assert!(!sources.contains(&AccountId([1; 32])));
    }

    #[test]
    fn test_surge_reserve_shrinks_to_unwhitelisted_count() {
        // Reserve would be 2, but only one unwhitelisted candidate exists:
        // whitelisted transactions take the slack instead of leaving a hole.
        let whitelist = Whitelist::new(
            [AccountId([7; 32]), AccountId([8; 32]), AccountId([9; 32])],
            None,
            50,
        );
        let ctx = make_context(4, whitelist);

        let mut set = TxSetFrame::new(Hash256::ZERO);
        set.add_tx(make_tx(7, 1, 100));
        set.add_tx(make_tx(8, 1, 100));
        set.add_tx(make_tx(9, 1, 100));
        set.add_tx(make_tx(9, 2, 100));
        set.add_tx(make_tx(1, 1, 100));

        set.surge_pricing_filter(ctx.ledger_manager(), &ctx);

        assert_eq!(set.len(), 4);
        let sources: BTreeSet<_> = set.transactions().iter().map(|t| t.source_id()).collect();
        assert!(sources.contains(&AccountId([1; 32])));
    }

    #[test]
    fn test_surge_result_fits_capacity() {
        let ctx = make_context(5, Whitelist::default());
        let mut set = TxSetFrame::new(Hash256::ZERO);
        for seed in 1..=20u8 {
            set.add_tx(make_tx(seed, 1, 100 + seed as i64));
        }
        set.surge_pricing_filter(ctx.ledger_manager(), &ctx);
        assert!(set.len() <= 5);
    }

    // =========================================================================
    // check_valid / trim_invalid
    // =========================================================================

    #[test]
    fn test_check_valid_empty_set() {
        let ctx = make_context(10, Whitelist::default());
        let lcl_hash = ctx.ledger_manager().last_closed_ledger_hash();

        let good = TxSetFrame::new(lcl_hash);
        assert!(good.check_valid(&ctx));

        let bad = TxSetFrame::new(Hash256::hash(b"someone else"));
        assert!(!bad.check_valid(&ctx));
    }

    #[test]
    fn test_check_valid_rejects_oversized_set() {
        let ctx = make_context(1, Whitelist::default());
        fund(&ctx, 1, 1_000_000_000, 0);
        fund(&ctx, 2, 1_000_000_000, 0);
        let mut set = TxSetFrame::new(ctx.ledger_manager().last_closed_ledger_hash());
        set.add_tx(make_tx(1, 1, 100));
        set.add_tx(make_tx(2, 1, 100));
        set.sort_for_hash();
        assert!(!set.check_valid(&ctx));
    }

    #[test]
    fn test_check_valid_rejects_unsorted_set() {
        let ctx = make_context(10, Whitelist::default());
        fund(&ctx, 1, 1_000_000_000, 0);
        fund(&ctx, 2, 1_000_000_000, 0);

        let mut set = TxSetFrame::new(ctx.ledger_manager().last_closed_ledger_hash());
        let mut txs = vec![make_tx(1, 1, 100), make_tx(2, 1, 100)];
        txs.sort_by_key(|t| t.full_hash());
        txs.reverse();
        for tx in txs {
            set.add_tx(tx);
        }
        assert!(!set.check_valid(&ctx));

        set.sort_for_hash();
        assert!(set.check_valid(&ctx));
    }

    #[test]
    fn test_check_valid_accepts_contiguous_account_sequence() {
        let ctx = make_context(10, Whitelist::default());
        fund(&ctx, 1, 1_000_000_000, 4);
        let mut set = TxSetFrame::new(ctx.ledger_manager().last_closed_ledger_hash());
        set.add_tx(make_tx(1, 5, 100));
        set.add_tx(make_tx(1, 6, 100));
        set.add_tx(make_tx(1, 7, 100));
        set.sort_for_hash();
        assert!(set.check_valid(&ctx));
    }

    #[test]
    fn test_check_valid_rejects_sequence_gap() {
        let ctx = make_context(10, Whitelist::default());
        fund(&ctx, 1, 1_000_000_000, 4);
        let mut set = TxSetFrame::new(ctx.ledger_manager().last_closed_ledger_hash());
        set.add_tx(make_tx(1, 5, 100));
        set.add_tx(make_tx(1, 7, 100));
        set.sort_for_hash();
        assert!(!set.check_valid(&ctx));
    }

    #[test]
    fn test_check_valid_rejects_insolvent_account() {
        let ctx = make_context(10, Whitelist::default());
        // balance covers the fees but not the minimum reserve afterwards
        fund(&ctx, 1, 10_000_150, 0);
        let mut set = TxSetFrame::new(ctx.ledger_manager().last_closed_ledger_hash());
        set.add_tx(make_tx(1, 1, 100));
        set.add_tx(make_tx(1, 2, 100));
        set.sort_for_hash();
        assert!(!set.check_valid(&ctx));
    }

    #[test]
    fn test_check_valid_whitelisted_fees_do_not_count() {
        let member = AccountId([1; 32]);
        let ctx = make_context(10, Whitelist::new([member], None, 20));
        fund(&ctx, 1, 10_000_150, 0);
        let mut set = TxSetFrame::new(ctx.ledger_manager().last_closed_ledger_hash());
        set.add_tx(make_tx(1, 1, 100));
        set.add_tx(make_tx(1, 2, 100));
        set.sort_for_hash();
        assert!(set.check_valid(&ctx));
    }

    #[test]
    fn test_trim_invalid_drops_invalid_and_keeps_rest() {
        let ctx = make_context(10, Whitelist::default());
        fund(&ctx, 1, 1_000_000_000, 0);
        fund(&ctx, 2, 1_000_000_000, 0);

        let mut set = TxSetFrame::new(ctx.ledger_manager().last_closed_ledger_hash());
        set.add_tx(make_tx(1, 1, 100));
        let stale = make_tx(2, 9, 100); // account 2 is at seq 0
        set.add_tx(stale.clone());

        let mut trimmed = Vec::new();
        set.trim_invalid(&ctx, &mut trimmed);

        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed[0].full_hash(), stale.full_hash());
        assert_eq!(set.len(), 1);
        assert!(set.check_valid(&ctx));
    }

    #[test]
    fn test_trim_invalid_insolvent_account_loses_everything() {
        let ctx = make_context(10, Whitelist::default());
        // can pay one fee above reserve, not three
        fund(&ctx, 1, 10_000_150, 0);
        fund(&ctx, 2, 1_000_000_000, 0);

        let mut set = TxSetFrame::new(ctx.ledger_manager().last_closed_ledger_hash());
        set.add_tx(make_tx(1, 1, 100));
        set.add_tx(make_tx(1, 2, 100));
        set.add_tx(make_tx(1, 3, 100));
        set.add_tx(make_tx(2, 1, 100));

        let mut trimmed = Vec::new();
        set.trim_invalid(&ctx, &mut trimmed);

        assert_eq!(trimmed.len(), 3);
        assert!(trimmed.iter().all(|tx| tx.source_id() == AccountId([1; 32])));
        assert_eq!(set.len(), 1);
        assert_eq!(set.transactions()[0].source_id(), AccountId([2; 32]));
    }

    #[test]
    fn test_trim_invalid_is_idempotent() {
        let ctx = make_context(10, Whitelist::default());
        fund(&ctx, 1, 10_000_150, 0);
        fund(&ctx, 2, 1_000_000_000, 0);

        let mut set = TxSetFrame::new(ctx.ledger_manager().last_closed_ledger_hash());
        set.add_tx(make_tx(1, 1, 100));
        set.add_tx(make_tx(1, 2, 100));
        set.add_tx(make_tx(2, 1, 100));
        set.add_tx(make_tx(3, 4, 100)); // account 3 does not exist

        let mut first = Vec::new();
        set.trim_invalid(&ctx, &mut first);
        let after_first: Vec<_> = set.transactions().iter().map(|t| t.full_hash()).collect();

        let mut second = Vec::new();
        set.trim_invalid(&ctx, &mut second);
        let after_second: Vec<_> = set.transactions().iter().map(|t| t.full_hash()).collect();

        assert!(second.is_empty());
        assert_eq!(after_first, after_second);
    }

    // =========================================================================
    // Wire conversion
    // =========================================================================

    #[test]
    fn test_wire_roundtrip_restores_equivalent_set() {
        let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
        for seed in [3u8, 1, 2] {
            set.add_tx(make_tx(seed, 1, 100));
        }
        let pre_wire_hash = set.contents_hash();

        let mut wire = TransactionSet::default();
        set.to_wire(&mut wire);
        let bytes = wire.to_wire();

        let decoded_wire = TransactionSet::from_wire(&bytes).unwrap();
        let mut decoded = TxSetFrame::from_wire(network(), &decoded_wire);
        assert_eq!(decoded.previous_ledger_hash(), set.previous_ledger_hash());
        assert_eq!(decoded.len(), set.len());
        assert_eq!(decoded.contents_hash(), pre_wire_hash);
    }

    #[test]
    fn test_to_wire_preserves_current_order() {
        let mut set = TxSetFrame::new(Hash256::hash(b"prev"));
        let a = make_tx(3, 1, 100);
        let b = make_tx(1, 1, 100);
        set.add_tx(a.clone());
        set.add_tx(b.clone());

        let mut wire = TransactionSet::default();
        set.to_wire(&mut wire);
        assert_eq!(wire.txs[0], *a.envelope());
        assert_eq!(wire.txs[1], *b.envelope());
    }

    #[test]
    fn test_from_wire_is_not_canonical_until_sorted() {
        let a = make_tx(3, 1, 100);
        let b = make_tx(1, 1, 100);
        let mut txs = vec![a.envelope().clone(), b.envelope().clone()];
        // force descending hash order on the wire
        txs.sort_by_key(|env| {
            TransactionFrame::make_from_wire(network(), env.clone()).full_hash()
        });
        txs.reverse();

        let wire = TransactionSet {
            previous_ledger_hash: Hash256::hash(b"prev"),
            txs,
        };
        let set = TxSetFrame::from_wire(network(), &wire);
        let hashes: Vec<_> = set.transactions().iter().map(|t| t.full_hash()).collect();
        assert!(hashes[0] > hashes[1]);
    }

    #[test]
    fn test_transaction_set_decode_rejects_garbage() {
        assert!(TransactionSet::from_wire(&[1, 2, 3]).is_err());

        let wire = TransactionSet {
            previous_ledger_hash: Hash256::ZERO,
            txs: vec![],
        };
        let mut bytes = wire.to_wire();
        // claim one tx but provide none
        bytes[35] = 1;
        assert!(TransactionSet::from_wire(&bytes).is_err());
    }

    // =========================================================================
    // Summary
    // =========================================================================

    #[test]
    fn test_summary() {
        let mut set = TxSetFrame::new(Hash256::ZERO);
        assert_eq!(set.summary(), "empty tx set");
        set.add_tx(make_tx(1, 1, 100));
        set.add_tx(make_tx(2, 1, 250));
        assert_eq!(set.summary(), "txs:2, ops:2, min_fee:100");
    }
}
