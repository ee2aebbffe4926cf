//! Canonical wire codec primitives.
//!
//! Implements the network's canonical external-data encoding: fixed-width
//! integers in big-endian byte order, fixed opaques as raw bytes, and
//! variable opaques as a 4-byte big-endian length followed by the payload
//! zero-padded to a 4-byte boundary (RFC 4506 style).
//!
//! Every consensus-critical hash in hayashi is computed over bytes produced
//! by this module, never over in-memory representations, so that
//! independently implemented replicas arrive at identical digests.

use crate::error::{Error, Result};
use crate::types::{AccountId, Hash256};

/// Appends canonically encoded values to a growing byte buffer.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the writer and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Write a fixed opaque: raw bytes, no length prefix.
    pub fn put_opaque(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn put_hash(&mut self, hash: &Hash256) {
        self.put_opaque(hash.as_bytes());
    }

    pub fn put_account_id(&mut self, id: &AccountId) {
        self.put_opaque(id.as_bytes());
    }

    /// Write a variable opaque: 4-byte length, payload, zero padding to a
    /// 4-byte boundary.
    pub fn put_var_opaque(&mut self, bytes: &[u8]) {
        self.put_u32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
        let pad = (4 - bytes.len() % 4) % 4;
        self.buf.extend_from_slice(&[0u8; 3][..pad]);
    }
}

/// Reads canonically encoded values from a byte slice.
///
/// All getters return [`Error::Codec`] on truncated or malformed input; a
/// decode is complete only when [`WireReader::finish`] confirms no trailing
/// bytes remain.
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Create a reader over a byte slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() - self.pos < n {
            return Err(Error::Codec(format!(
                "unexpected end of input: need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.buf.len() - self.pos
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn get_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes(bytes.try_into().expect("4 bytes")))
    }

    pub fn get_u64(&mut self) -> Result<u64> {
        let bytes = self.take(8)?;
        Ok(u64::from_be_bytes(bytes.try_into().expect("8 bytes")))
    }

    pub fn get_i64(&mut self) -> Result<i64> {
        let bytes = self.take(8)?;
        Ok(i64::from_be_bytes(bytes.try_into().expect("8 bytes")))
    }

    pub fn get_hash(&mut self) -> Result<Hash256> {
        let bytes = self.take(32)?;
        Ok(Hash256::from_bytes(bytes.try_into().expect("32 bytes")))
    }

    pub fn get_account_id(&mut self) -> Result<AccountId> {
        let bytes = self.take(32)?;
        Ok(AccountId::from_bytes(bytes.try_into().expect("32 bytes")))
    }

    /// Read a variable opaque written by [`WireWriter::put_var_opaque`].
    ///
    /// Padding bytes must be zero.
    pub fn get_var_opaque(&mut self) -> Result<Vec<u8>> {
        let len = self.get_u32()? as usize;
        let payload = self.take(len)?.to_vec();
        let pad = (4 - len % 4) % 4;
        let padding = self.take(pad)?;
        if padding.iter().any(|b| *b != 0) {
            return Err(Error::Codec("non-zero padding in variable opaque".to_string()));
        }
        Ok(payload)
    }

    /// Assert the input was fully consumed.
    pub fn finish(self) -> Result<()> {
        if self.pos != self.buf.len() {
            return Err(Error::Codec(format!(
                "{} trailing bytes after decode",
                self.buf.len() - self.pos
            )));
        }
        Ok(())
    }
}
