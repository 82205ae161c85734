//! # Adapters Layer
//!
//! - `codec`: RLP (default, matches records already on disk) and bincode
//! - `memory`: in-memory block bodies for tests and tooling

pub mod codec;
pub mod memory;

pub use codec::{BincodeEntryCodec, RlpEntryCodec};
pub use memory::MemoryBodyProvider;
