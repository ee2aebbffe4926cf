//! Transactions for hayashi.
//!
//! This crate provides the wire-form [`TransactionEnvelope`], the immutable
//! [`TransactionFrame`] handle built from it, and the [`Whitelist`] consulted
//! during surge pricing.

pub mod envelope;
pub mod frame;
pub mod whitelist;

pub use envelope::TransactionEnvelope;
pub use frame::{TransactionFrame, TransactionFramePtr};
pub use whitelist::Whitelist;
