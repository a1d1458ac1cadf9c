//! Page fetching for tool enrichment.
//!
//! This crate provides [`PageFetcher`], a one-hop HTTP client that turns
//! every transport failure into an empty document. There is no link
//! following: callers ask for exactly the pages they want.

pub mod fetcher;

pub use fetcher::PageFetcher;
