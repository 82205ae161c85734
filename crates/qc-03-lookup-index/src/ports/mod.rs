//! # Ports Layer
//!
//! Driven ports (SPIs) the lookup index needs: a byte codec for entries and
//! a source of block bodies. The key-value store port lives in
//! `shared-types` because the bloom index writes through it too.

pub mod outbound;

pub use outbound::*;
