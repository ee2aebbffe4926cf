//! Common error types for hayashi.
//!
//! This module provides the unified error type [`enum@Error`] and the
//! convenience type alias [`Result`] used throughout the hayashi crates.
//!
//! # Error Handling Philosophy
//!
//! The [`enum@Error`] enum provides broad categories of errors that can occur
//! during hayashi operations. More specific error types can be wrapped in the
//! appropriate variant using the string message. Consensus verdict operations
//! (`check_valid`, `check_or_trim`) deliberately return `bool` rather than
//! `Result`: a rejected transaction set is an expected outcome, not an error.
//!
//! # Example
//!
//! ```rust
//! use hayashi_common::{Error, Result};
//!
//! fn validate_data(data: &[u8]) -> Result<()> {
//!     if data.is_empty() {
//!         return Err(Error::InvalidData("data cannot be empty".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// A type alias for `Result<T, Error>`.
///
/// This is the standard result type used throughout hayashi.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for hayashi operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Wire encoding/decoding error.
    ///
    /// Occurs when serializing or deserializing canonical wire forms fails.
    #[error("codec error: {0}")]
    Codec(String),

    /// I/O error.
    ///
    /// Wraps standard I/O errors from file or network operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    ///
    /// Occurs when configuration is invalid or cannot be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid data error.
    ///
    /// Occurs when data fails validation (wrong format, out of range, etc.).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Resource not found error.
    ///
    /// Occurs when a requested resource (account, transaction, etc.) does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}
