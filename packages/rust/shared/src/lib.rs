//! Shared types, error model, and configuration for toolcatalog.
//!
//! This crate is the foundation depended on by all other toolcatalog crates.
//! It provides:
//! - [`CatalogError`]: the unified error type
//! - Domain types ([`Tool`], [`ToolInput`], [`Source`], [`Catalog`], [`PageMeta`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, EnrichSettings, FetchConfig, FetchSettings, config_dir, config_file_path,
    load_config, load_config_from,
};
pub use error::{CatalogError, Result};
pub use types::{
    Catalog, InputDocument, PageMeta, SOURCE_TYPE_OFFICIAL, STATUS_ACTIVE, Source, Tool,
    ToolInput, default_comparisons,
};
