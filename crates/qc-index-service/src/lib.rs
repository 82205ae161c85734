//! # Index Service
//!
//! Runs the secondary indexes on block commit and answers by-hash queries.
//!
//! ```text
//! Block committed ──→ IndexService::index_block
//!                        ├─→ TransactionLookup::write_entries
//!                        ├─→ VoteLookup::write_entries
//!                        ├─→ Bloom over transaction hashes
//!                        └─→ SectionGenerator ──(section full)──→ SectionBloomStore
//! ```
//!
//! ## Error Policy
//!
//! Not found is `Ok(None)`. Consistency violations and store failures are
//! logged once at `error!` here, counted, and returned; the caller decides
//! whether to halt. Nothing in this crate terminates the process.

pub mod adapters;
pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod telemetry;

pub use config::{IndexServiceConfig, SectionConfig};
pub use error::ServiceError;
pub use metrics::{IndexMetrics, MetricsSnapshot};
pub use service::IndexService;
