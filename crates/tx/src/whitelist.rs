//! The inclusion whitelist.

use std::collections::BTreeSet;

use hayashi_common::config::WhitelistConfig;
use hayashi_common::{AccountId, Error, Result};

/// Accounts granted priority inclusion during surge pricing.
///
/// The optional **holder** is the account that administers the whitelist on
/// the network; its own transactions get absolute top priority. A
/// configured percentage of every transaction set stays reserved for
/// non-whitelisted traffic so the whitelist cannot starve the open network.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    accounts: BTreeSet<AccountId>,
    holder: Option<AccountId>,
    reserve_percent: u32,
}

impl Whitelist {
    /// Build a whitelist from configuration.
    pub fn from_config(config: &WhitelistConfig) -> Result<Self> {
        if config.reserve_percent > 100 {
            return Err(Error::Config(format!(
                "whitelist reserve_percent {} out of range",
                config.reserve_percent
            )));
        }
        let mut accounts = BTreeSet::new();
        for hex in &config.accounts {
            let id = AccountId::from_hex(hex)
                .map_err(|e| Error::Config(format!("bad whitelist account {}: {}", hex, e)))?;
            accounts.insert(id);
        }
        let holder = match &config.holder {
            Some(hex) => Some(
                AccountId::from_hex(hex)
                    .map_err(|e| Error::Config(format!("bad whitelist holder {}: {}", hex, e)))?,
            ),
            None => None,
        };
        Ok(Self {
            accounts,
            holder,
            reserve_percent: config.reserve_percent,
        })
    }

    /// Build a whitelist directly from parts (used by tests and tools).
    pub fn new(
        accounts: impl IntoIterator<Item = AccountId>,
        holder: Option<AccountId>,
        reserve_percent: u32,
    ) -> Self {
        Self {
            accounts: accounts.into_iter().collect(),
            holder,
            reserve_percent,
        }
    }

    /// Whether the account has priority inclusion.
    ///
    /// The holder always counts as whitelisted.
    pub fn contains(&self, id: &AccountId) -> bool {
        self.holder.as_ref() == Some(id) || self.accounts.contains(id)
    }

    /// The whitelist-holder account, if one is configured.
    pub fn account_id(&self) -> Option<&AccountId> {
        self.holder.as_ref()
    }

    /// Capacity that must remain available to non-whitelisted transactions
    /// in a set of at most `max` transactions.
    pub fn unwhitelisted_reserve(&self, max: usize) -> usize {
        max * self.reserve_percent as usize / 100
    }
}
