//! The transaction wire envelope.

use hayashi_common::{AccountId, Result, SequenceNumber, WireReader, WireWriter};

/// Wire form of a transaction.
///
/// The canonical encoding of this structure is what gets gossiped between
/// peers, fed into content hashes, and embedded in transaction set wire
/// frames. Two replicas that hold the same envelope always produce the same
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEnvelope {
    /// Source account the transaction spends from.
    pub source: AccountId,

    /// Sequence number; must follow the account's current one.
    pub seq_num: SequenceNumber,

    /// Declared fee, in the network's smallest unit.
    pub fee: i64,

    /// Number of operations carried; the capacity weight used for minimum
    /// fee and fee ratio computation.
    pub op_count: u32,

    /// Signature over the envelope body.
    pub signature: Vec<u8>,
}

impl TransactionEnvelope {
    /// Encode to canonical wire bytes.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.put_account_id(&self.source);
        w.put_u64(self.seq_num);
        w.put_i64(self.fee);
        w.put_u32(self.op_count);
        w.put_var_opaque(&self.signature);
        w.into_bytes()
    }

    /// Decode from canonical wire bytes.
    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        let mut r = WireReader::new(bytes);
        let env = Self::read(&mut r)?;
        r.finish()?;
        Ok(env)
    }

    /// Decode one envelope from an open reader, leaving trailing data alone.
    pub fn read(r: &mut WireReader<'_>) -> Result<Self> {
        let source = r.get_account_id()?;
        let seq_num = r.get_u64()?;
        let fee = r.get_i64()?;
        let op_count = r.get_u32()?;
        let signature = r.get_var_opaque()?;
        Ok(Self {
            source,
            seq_num,
            fee,
            op_count,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_envelope(seed: u8, seq_num: u64) -> TransactionEnvelope {
        TransactionEnvelope {
            source: AccountId([seed; 32]),
            seq_num,
            fee: 100,
            op_count: 1,
            signature: vec![seed; 64],
        }
    }

    #[test]
    fn test_envelope_roundtrip() {
        let env = make_envelope(7, 42);
        let bytes = env.to_wire();
        let decoded = TransactionEnvelope::from_wire(&bytes).unwrap();
        assert_eq!(env, decoded);
    }

    #[test]
    fn test_envelope_encoding_is_deterministic() {
        let env = make_envelope(7, 42);
        assert_eq!(env.to_wire(), env.to_wire());
    }

    #[test]
    fn test_envelope_truncated_decode_fails() {
        let bytes = make_envelope(7, 42).to_wire();
        assert!(TransactionEnvelope::from_wire(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_envelope_trailing_bytes_rejected() {
        let mut bytes = make_envelope(7, 42).to_wire();
        bytes.push(0);
        assert!(TransactionEnvelope::from_wire(&bytes).is_err());
    }

    #[test]
    fn test_distinct_envelopes_encode_differently() {
        assert_ne!(make_envelope(1, 1).to_wire(), make_envelope(2, 1).to_wire());
        assert_ne!(make_envelope(1, 1).to_wire(), make_envelope(1, 2).to_wire());
    }
}
