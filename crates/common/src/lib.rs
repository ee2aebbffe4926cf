//! Common types and utilities for hayashi.
//!
//! This crate provides shared types, traits, and utilities used across
//! all hayashi modules. It is designed to be dependency-light and contains
//! pure data types and helpers with no I/O or side effects, making it
//! suitable as a foundation for all other crates in the workspace.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`config`] - Configuration types for node setup (network, whitelist)
//! - [`error`] - Common error types and the [`Result`] type alias
//! - [`network`] - Network identity derived from network passphrases
//! - [`types`] - Core types like [`Hash256`] and [`AccountId`]
//! - [`wire`] - Big-endian wire codec primitives for canonical encodings
//!
//! # Example
//!
//! ```rust
//! use hayashi_common::{Hash256, NetworkId};
//!
//! let hash = Hash256::hash(b"hello world");
//! let network_id = NetworkId::from_passphrase("hayashi test network");
//! ```

pub mod config;
pub mod error;
pub mod network;
pub mod types;
pub mod wire;

// Re-export key types at crate root for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use network::NetworkId;
pub use types::*;
pub use wire::{WireReader, WireWriter};
