//! # Quantum-Chain Index Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Block, transaction and vote builders
//! └── integration/      # Cross-crate flows
//!     ├── lookup_flows.rs
//!     ├── bloom_sections.rs
//!     └── consistency.rs
//!
//! tests/benches/
//! └── index_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! cargo test -p qc-tests integration::consistency
//! cargo bench -p qc-tests
//! ```

pub mod fixtures;
pub mod integration;
