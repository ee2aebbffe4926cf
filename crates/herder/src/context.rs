//! Application context threaded through herder entry points.

use std::sync::Arc;

use hayashi_common::{Config, NetworkId, Result};
use hayashi_ledger::{LedgerManager, LedgerStore};
use hayashi_tx::Whitelist;

/// The collaborators a transaction set needs, bundled into one value.
///
/// Entry points take this explicitly instead of reaching for process-wide
/// state, which keeps every check reproducible from its arguments alone.
pub struct AppContext {
    network_id: NetworkId,
    ledger_manager: Arc<LedgerManager>,
    store: Arc<LedgerStore>,
    whitelist: Whitelist,
}

impl AppContext {
    /// Bundle an existing set of collaborators.
    pub fn new(
        network_id: NetworkId,
        ledger_manager: Arc<LedgerManager>,
        store: Arc<LedgerStore>,
        whitelist: Whitelist,
    ) -> Self {
        Self {
            network_id,
            ledger_manager,
            store,
            whitelist,
        }
    }

    /// Build a context from configuration with fresh ledger state.
    pub fn from_config(config: &Config) -> Result<Self> {
        let network_id = NetworkId::from_passphrase(&config.network.passphrase);
        let whitelist = Whitelist::from_config(&config.whitelist)?;
        Ok(Self {
            network_id,
            ledger_manager: Arc::new(LedgerManager::genesis(hayashi_common::Hash256::ZERO)),
            store: Arc::new(LedgerStore::new()),
            whitelist,
        })
    }

    /// The network this node participates in.
    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    /// The ledger manager.
    pub fn ledger_manager(&self) -> &LedgerManager {
        &self.ledger_manager
    }

    /// The account store.
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// The inclusion whitelist.
    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }
}
