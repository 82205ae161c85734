//! # Integration Flows
//!
//! Cross-crate scenarios driven through `IndexService`:
//!
//! - `lookup_flows`: commit, locate, resolve and unindex across a chain
//! - `bloom_sections`: per-block blooms feeding persisted section planes
//! - `consistency`: entries that point at data the chain no longer holds

pub mod bloom_sections;
pub mod consistency;
pub mod lookup_flows;
