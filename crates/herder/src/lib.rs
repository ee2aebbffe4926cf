//! Transaction set construction for hayashi.
//!
//! The herder assembles candidate transactions into a [`TxSetFrame`] for the
//! next ledger: it canonicalizes and hashes the set, trims it to capacity
//! under surge pricing, validates per-account sequencing and fee solvency,
//! and emits the deterministic-but-unpredictable apply order.
//!
//! All of this logic is consensus-binding. Any divergence in sorting,
//! hashing, trimming, or validation between replicas forks the network, so
//! every ordering decision in this crate bottoms out in canonical wire bytes
//! or total orders over hashes and account ids.

pub mod context;
pub mod surge_pricing;
pub mod tx_set;

pub use context::AppContext;
pub use tx_set::{TransactionSet, TxSetFrame};
