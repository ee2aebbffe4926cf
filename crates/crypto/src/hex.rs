//! Hex encoding and decoding utilities.
//!
//! # Functions
//!
//! - [`bin_to_hex`]: Encode bytes as lowercase hex string
//! - [`hex_abbrev`]: Get a 6-character hex prefix (for logging)
//! - [`hex_to_bin`]: Decode hex string to bytes
//! - [`hex_to_bin_256`]: Decode hex string to exactly 32 bytes

use hayashi_common::{Error, Result};

/// Hex-encode bytes as a lowercase hex string.
#[inline]
pub fn bin_to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Get a 6-character hex prefix of the data.
///
/// Used in log lines to show a short identifier without the full hex string.
///
/// # Example
///
/// ```
/// use hayashi_crypto::hex_abbrev;
///
/// assert_eq!(hex_abbrev(&[0x01, 0x23, 0x45, 0x67]), "012345");
/// assert_eq!(hex_abbrev(&[0xab, 0xcd]), "abcd");
/// assert_eq!(hex_abbrev(&[]), "");
/// ```
pub fn hex_abbrev(data: &[u8]) -> String {
    let full_hex = bin_to_hex(data);
    if full_hex.len() <= 6 {
        full_hex
    } else {
        full_hex[..6].to_string()
    }
}

/// Decode a hex string to bytes.
pub fn hex_to_bin(hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| Error::InvalidData(format!("invalid hex: {}", e)))
}

/// Decode a hex string to exactly 32 bytes.
pub fn hex_to_bin_256(hex_str: &str) -> Result<[u8; 32]> {
    let bytes = hex_to_bin(hex_str)?;
    if bytes.len() != 32 {
        return Err(Error::InvalidData(format!(
            "expected 32 bytes of hex, got {}",
            bytes.len()
        )));
    }
    let mut result = [0u8; 32];
    result.copy_from_slice(&bytes);
    Ok(result)
}
