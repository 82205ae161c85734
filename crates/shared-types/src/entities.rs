//! # Core Domain Entities
//!
//! The minimal chain entities whose identities are indexed.
//!
//! ## Clusters
//!
//! - **Chain**: `Block`, `BlockHeader`, `BlockBody`, `Transaction`
//! - **Voting**: `Vote`, keyed by the transaction it references and the
//!   identity of the node that cast it

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte hash.
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// The all-zero hash. Used as the "not found" block locator.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Returns true if every byte of the hash is zero.
pub fn is_zero_hash(hash: &Hash) -> bool {
    hash.iter().all(|&b| b == 0)
}

/// The header of a block containing metadata and root hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Protocol version for this block.
    pub version: u16,
    /// Block height in the chain.
    pub height: u64,
    /// Hash of the parent block.
    pub parent_hash: Hash,
    /// Merkle root of all transactions in the block.
    pub merkle_root: Hash,
    /// Root hash of the state trie after applying this block.
    pub state_root: Hash,
    /// Unix timestamp when the block was proposed.
    pub timestamp: u64,
    /// The validator who proposed this block.
    pub proposer: PublicKey,
}

impl BlockHeader {
    /// Compute the block hash from the header fields.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.parent_hash);
        hasher.update(self.merkle_root);
        hasher.update(self.state_root);
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.proposer);
        hasher.finalize().into()
    }
}

/// A raw transaction.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender's public key.
    pub from: PublicKey,
    /// Recipient's public key (optional for contract creation).
    pub to: Option<PublicKey>,
    /// Transaction amount in base units.
    pub value: u64,
    /// Sender's nonce.
    pub nonce: u64,
    /// Transaction payload.
    pub data: Vec<u8>,
    /// Sender's signature over the transaction.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

impl Transaction {
    /// Compute the transaction hash.
    ///
    /// The signature is not part of the hash.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.from);
        if let Some(to) = &self.to {
            hasher.update(to);
        }
        hasher.update(self.value.to_le_bytes());
        hasher.update(self.nonce.to_le_bytes());
        hasher.update(&self.data);
        hasher.finalize().into()
    }
}

/// A block as handed to the index on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// Transactions in canonical order.
    pub transactions: Vec<Transaction>,
    /// Votes in canonical order.
    pub votes: Vec<Vote>,
}

impl Block {
    pub fn new(header: BlockHeader, transactions: Vec<Transaction>, votes: Vec<Vote>) -> Self {
        Self {
            header,
            transactions,
            votes,
        }
    }

    /// Hash of the block header.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Block number (height).
    pub fn number(&self) -> u64 {
        self.header.height
    }

    /// The body of this block, as stored by block storage.
    pub fn body(&self) -> BlockBody {
        BlockBody {
            transactions: self.transactions.clone(),
            votes: self.votes.clone(),
        }
    }
}

/// The body of a block: its ordered item collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockBody {
    pub transactions: Vec<Transaction>,
    pub votes: Vec<Vote>,
}

// =============================================================================
// CLUSTER B: VOTING
// =============================================================================

/// A vote cast by a node on a transaction.
///
/// A vote is identified by the hash of the transaction it references
/// (`tx_index` into the same block) together with `node_id`.
///
/// The JSON form uses the field names `txHash`, `isExist`, `nodeID`,
/// `func`, `v`, `r`, `s`, `pubKey` and carries the derived `hash` on output
/// only. Hashes and integers are `0x` hex, `pubKey` is standard base64.
/// `isExist` is required on input. `tx_index` travels only in the block
/// body, never in JSON, and decodes as 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vote {
    /// Hash of the data the vote is about.
    pub data_hash: Hash,
    /// Index of the referenced transaction in the enclosing block.
    pub tx_index: u64,
    /// Whether the voter saw the referenced data.
    pub is_exist: U256,
    /// Identity of the casting node.
    pub node_id: String,
    /// Function selector the vote applies to.
    pub func: Hash,
    pub v: U256,
    pub r: U256,
    pub s: U256,
    /// Public key of the casting node.
    pub pub_key: Vec<u8>,
}

impl Vote {
    /// Compute the vote hash over everything except the signature values.
    pub fn hash(&self) -> Hash {
        let mut is_exist = [0u8; 32];
        self.is_exist.to_big_endian(&mut is_exist);

        let mut hasher = Sha256::new();
        hasher.update(self.data_hash);
        hasher.update(self.tx_index.to_be_bytes());
        hasher.update(is_exist);
        hasher.update(self.node_id.as_bytes());
        hasher.update(self.func);
        hasher.update(&self.pub_key);
        hasher.finalize().into()
    }
}

/// Byte string rendered as `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HexData(Vec<u8>);

impl HexData {
    fn into_hash(self, field: &'static str) -> Result<Hash, String> {
        let len = self.0.len();
        self.0
            .try_into()
            .map_err(|_| format!("{field}: expected 32 bytes, got {len}"))
    }
}

impl Serialize for HexData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(&self.0)))
    }
}

impl<'de> Deserialize<'de> for HexData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .ok_or_else(|| de::Error::custom("hex string without 0x prefix"))?;
        hex::decode(digits).map(HexData).map_err(de::Error::custom)
    }
}

/// Byte string rendered as standard base64.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Base64Data(Vec<u8>);

impl Serialize for Base64Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Base64Data {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map(Base64Data)
            .map_err(de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
struct VoteJson {
    #[serde(rename = "txHash")]
    tx_hash: Option<HexData>,
    #[serde(rename = "isExist")]
    is_exist: Option<U256>,
    #[serde(rename = "nodeID")]
    node_id: Option<String>,
    func: Option<HexData>,
    v: Option<U256>,
    r: Option<U256>,
    s: Option<U256>,
    #[serde(rename = "pubKey")]
    pub_key: Option<Base64Data>,
    #[serde(default, skip_deserializing)]
    hash: Option<HexData>,
}

impl Serialize for Vote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        VoteJson {
            tx_hash: Some(HexData(self.data_hash.to_vec())),
            is_exist: Some(self.is_exist),
            node_id: Some(self.node_id.clone()),
            func: Some(HexData(self.func.to_vec())),
            v: Some(self.v),
            r: Some(self.r),
            s: Some(self.s),
            pub_key: Some(Base64Data(self.pub_key.clone())),
            hash: Some(HexData(self.hash().to_vec())),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Vote {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dec = VoteJson::deserialize(deserializer)?;
        let is_exist = dec
            .is_exist
            .ok_or_else(|| de::Error::missing_field("isExist"))?;

        let data_hash = match dec.tx_hash {
            Some(data) => data.into_hash("txHash").map_err(de::Error::custom)?,
            None => Hash::default(),
        };
        let func = match dec.func {
            Some(data) => data.into_hash("func").map_err(de::Error::custom)?,
            None => Hash::default(),
        };

        Ok(Vote {
            data_hash,
            tx_index: 0,
            is_exist,
            node_id: dec.node_id.unwrap_or_default(),
            func,
            v: dec.v.unwrap_or_default(),
            r: dec.r.unwrap_or_default(),
            s: dec.s.unwrap_or_default(),
            pub_key: dec.pub_key.map(|data| data.0).unwrap_or_default(),
        })
    }
}
