//! Catalog enrichment and merge logic for toolcatalog.
//!
//! This crate ties together input normalization, page-based enrichment, and
//! catalog reconciliation into one end-to-end run ([`pipeline::run_catalog`]).

pub mod enrich;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod store;
