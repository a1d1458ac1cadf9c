//! Heuristic signal extraction from free text and fetched HTML.
//!
//! This crate provides:
//! - [`text`]: slug generation and short-phrase splitting
//! - [`price`]: price model detection over page text
//! - [`platform`]: platform detection over page text
//! - [`name`]: product name guessing from a page title/h1
//! - [`meta`]: flat metadata extraction from an HTML document
//!
//! Everything here is pure and infallible: bad input degrades to empty output.

pub mod meta;
pub mod name;
pub mod platform;
pub mod price;
pub mod text;

pub use meta::extract_page_meta;
pub use name::{NAME_SEPARATORS, guess_name};
pub use platform::{Evidence, PLATFORM_RULES, Platform, PlatformTest, detect_platforms};
pub use price::{PRICE_RULES, PriceModel, PriceRule, detect_price_model};
pub use text::{dedup_preserving, slugify, split_features};
