//! Service layer for the bloom index

mod section_store;

pub use section_store::SectionBloomStore;
