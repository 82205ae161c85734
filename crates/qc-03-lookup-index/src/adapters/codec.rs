//! # Entry Codecs
//!
//! [`RlpEntryCodec`] writes an entry as the RLP list
//! `[block_hash (32 bytes), block_number, index]`, which is the layout of
//! records already persisted by deployed nodes. [`BincodeEntryCodec`] is a
//! fixed-width alternative for fresh databases.

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use shared_types::Hash;

use crate::domain::LookupEntry;
use crate::ports::{CodecError, LookupEntryCodec};

impl Encodable for LookupEntry {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.block_hash.to_vec());
        s.append(&self.block_number);
        s.append(&self.index);
    }
}

impl Decodable for LookupEntry {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 3 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        let hash: Vec<u8> = rlp.val_at(0)?;
        let block_hash: Hash = hash
            .try_into()
            .map_err(|_| DecoderError::Custom("block hash must be 32 bytes"))?;
        Ok(Self {
            block_hash,
            block_number: rlp.val_at(1)?,
            index: rlp.val_at(2)?,
        })
    }
}

/// RLP entry codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct RlpEntryCodec;

impl LookupEntryCodec for RlpEntryCodec {
    fn encode(&self, entry: &LookupEntry) -> Result<Vec<u8>, CodecError> {
        Ok(rlp::encode(entry).to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<LookupEntry, CodecError> {
        rlp::decode(bytes).map_err(|e| CodecError::new(format!("rlp: {e}")))
    }
}

/// Bincode entry codec (48 bytes per entry).
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeEntryCodec;

impl LookupEntryCodec for BincodeEntryCodec {
    fn encode(&self, entry: &LookupEntry) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(entry).map_err(|e| CodecError::new(format!("bincode: {e}")))
    }

    fn decode(&self, bytes: &[u8]) -> Result<LookupEntry, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::new(format!("bincode: {e}")))
    }
}
