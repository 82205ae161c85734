//! # Domain Layer
//!
//! Lookup entries, composite keys and the entity kinds they index.
//!
//! This module contains NO I/O dependencies.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
