//! In-memory account store with scoped read-only access.

use std::collections::BTreeMap;

use parking_lot::{RwLock, RwLockReadGuard};

use hayashi_common::{AccountId, SequenceNumber};

use crate::header::LedgerHeader;

/// Account state consulted by transaction validity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountEntry {
    /// The account's identifier.
    pub account_id: AccountId,

    /// Spendable balance, in the network's smallest unit.
    pub balance: i64,

    /// Sequence number of the last applied transaction.
    pub seq_num: SequenceNumber,

    /// Number of subentries owned by the account (offers, trust lines).
    pub num_sub_entries: u32,
}

impl AccountEntry {
    /// Minimum balance the account must retain.
    ///
    /// Two base reserves for the account itself plus one per subentry.
    pub fn minimum_balance(&self, header: &LedgerHeader) -> i64 {
        (2 + self.num_sub_entries as i64) * header.base_reserve as i64
    }
}

/// Account state keyed by account id.
///
/// Validity checks open a [`ReadScope`] over the store for the duration of a
/// whole check/trim pass so that every per-transaction lookup observes one
/// consistent view. The scope is a read lock guard: it is released on every
/// exit path and exposes no write operations.
pub struct LedgerStore {
    accounts: RwLock<BTreeMap<AccountId, AccountEntry>>,
}

impl LedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert or replace an account entry.
    pub fn upsert_account(&self, entry: AccountEntry) {
        self.accounts.write().insert(entry.account_id, entry);
    }

    /// Remove an account entry.
    pub fn remove_account(&self, id: &AccountId) {
        self.accounts.write().remove(id);
    }

    /// Open a read-only scope over the current account state.
    pub fn read_only_scope(&self) -> ReadScope<'_> {
        ReadScope {
            accounts: self.accounts.read(),
        }
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A consistent read-only view of the account store.
pub struct ReadScope<'a> {
    accounts: RwLockReadGuard<'a, BTreeMap<AccountId, AccountEntry>>,
}

impl ReadScope<'_> {
    /// Look up an account.
    pub fn account(&self, id: &AccountId) -> Option<&AccountEntry> {
        self.accounts.get(id)
    }
}
