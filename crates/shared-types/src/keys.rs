//! # Key Layout
//!
//! Every key the index layer persists is derived here. Each entity kind owns
//! a single-byte namespace prefix; the hash component is fixed-width, so two
//! distinct logical identities can never produce the same key.
//!
//! | Namespace | Layout                                             |
//! |-----------|----------------------------------------------------|
//! | `l`       | `l` ‖ tx hash (32)                                 |
//! | `v`       | `v` ‖ tx hash (32) ‖ node id (UTF-8)               |
//! | `B`       | `B` ‖ bit (u16 BE) ‖ section (u64 BE) ‖ head (32)  |

use std::fmt;

use crate::entities::Hash;

/// Length of a bloom bit-plane key.
pub const BLOOM_BITS_KEY_LEN: usize = 1 + 2 + 8 + 32;

/// Key prefixes for the index namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPrefix {
    /// Transaction lookup entries: `l` ‖ tx_hash
    TxLookup,
    /// Vote lookup entries: `v` ‖ tx_hash ‖ node_id
    VoteLookup,
    /// Bloom bit planes: `B` ‖ bit ‖ section ‖ head
    BloomBits,
}

impl KeyPrefix {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::TxLookup => b"l",
            KeyPrefix::VoteLookup => b"v",
            KeyPrefix::BloomBits => b"B",
        }
    }

    /// Build a key from this prefix and a suffix.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let prefix = self.as_bytes();
        let mut key = Vec::with_capacity(prefix.len() + suffix.len());
        key.extend_from_slice(prefix);
        key.extend_from_slice(suffix);
        key
    }
}

/// Entity kinds tracked by the lookup index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Transaction,
    Vote,
}

impl EntityKind {
    /// The namespace this kind's lookup entries live in.
    pub fn prefix(&self) -> KeyPrefix {
        match self {
            EntityKind::Transaction => KeyPrefix::TxLookup,
            EntityKind::Vote => KeyPrefix::VoteLookup,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Transaction => write!(f, "transaction"),
            EntityKind::Vote => write!(f, "vote"),
        }
    }
}

pub fn tx_lookup_key(hash: &Hash) -> Vec<u8> {
    KeyPrefix::TxLookup.key(hash)
}

pub fn vote_lookup_key(hash: &Hash, node_id: &str) -> Vec<u8> {
    let mut key = KeyPrefix::VoteLookup.key(hash);
    key.extend_from_slice(node_id.as_bytes());
    key
}

/// Key for one bit plane of one section.
pub fn bloom_bits_key(bit: u16, section: u64, head: &Hash) -> Vec<u8> {
    let mut key = Vec::with_capacity(BLOOM_BITS_KEY_LEN);
    key.extend_from_slice(KeyPrefix::BloomBits.as_bytes());
    key.extend_from_slice(&bit.to_be_bytes());
    key.extend_from_slice(&section.to_be_bytes());
    key.extend_from_slice(head);
    key
}

/// Lookup key for an entity of `kind`.
///
/// `secondary` is the vote signer; it is ignored for transactions.
pub fn lookup_key(kind: EntityKind, hash: &Hash, secondary: Option<&str>) -> Vec<u8> {
    match kind {
        EntityKind::Transaction => tx_lookup_key(hash),
        EntityKind::Vote => vote_lookup_key(hash, secondary.unwrap_or_default()),
    }
}
