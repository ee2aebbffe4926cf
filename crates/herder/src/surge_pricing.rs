//! Surge-pricing ordering primitives.
//!
//! When more transactions are proposed than the next ledger admits, the set
//! is trimmed by fee attractiveness. An account is only as attractive as its
//! worst-paying transaction: admitting an account's k-th transaction forces
//! admitting all earlier ones, so the account-level ratio is the minimum
//! over the account's transactions.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use hayashi_common::AccountId;
use hayashi_ledger::LedgerManager;
use hayashi_tx::TransactionFramePtr;

/// Per-account minimum fee ratio over the given transactions.
///
/// An unset entry counts as 0 and is replaced on first assignment, so the
/// minimum of a single entry is itself.
pub fn account_fee_ratios(
    txs: &[TransactionFramePtr],
    lm: &LedgerManager,
) -> BTreeMap<AccountId, f64> {
    let mut ratios = BTreeMap::new();
    for tx in txs {
        let r = tx.fee_ratio(lm);
        let entry = ratios.entry(tx.source_id()).or_insert(0.0);
        if *entry == 0.0 || r < *entry {
            *entry = r;
        }
    }
    ratios
}

/// Surge-pricing comparator.
///
/// Transactions from one account always order by sequence number so trimming
/// a suffix never breaks an account's sequence continuity. Across accounts,
/// the whitelist holder wins outright; among whitelisted transactions fees
/// are not charged, so account id alone decides; among non-whitelisted
/// transactions a higher account fee ratio wins, with exactly-equal ratios
/// falling through to account id order for determinism.
pub fn surge_order(
    tx1: &TransactionFramePtr,
    tx2: &TransactionFramePtr,
    fee_ratios: &BTreeMap<AccountId, f64>,
    whitelisted: bool,
    holder: Option<&AccountId>,
) -> Ordering {
    if tx1.source_id() == tx2.source_id() {
        return tx1.seq_num().cmp(&tx2.seq_num());
    }

    // Txs from the whitelist holder get top priority
    if let Some(holder) = holder {
        if tx1.source_id() == *holder {
            return Ordering::Less;
        }
        if tx2.source_id() == *holder {
            return Ordering::Greater;
        }
    }

    if whitelisted {
        return tx1.source_id().cmp(&tx2.source_id());
    }

    let r1 = fee_ratios.get(&tx1.source_id()).copied().unwrap_or(0.0);
    let r2 = fee_ratios.get(&tx2.source_id()).copied().unwrap_or(0.0);
    if r1 == r2 {
        tx1.source_id().cmp(&tx2.source_id())
    } else if r1 > r2 {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}
