//! Failures that abort a catalog run.
//!
//! Most problems in a run are absorbed where they happen: a failed fetch
//! becomes an empty page and a missing input field takes its default. What
//! reaches [`CatalogError`] is what the run cannot recover from, such as an
//! unreadable input file or a catalog that is not JSON.

use std::path::PathBuf;

/// Error returned by catalog loading, merging and writing.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The TOML config file is unparsable or holds an invalid value.
    #[error("config error: {message}")]
    Config { message: String },

    /// The HTTP client could not be built, or a page fetch failed. Page
    /// failures are logged by the fetcher and read as an empty page.
    #[error("network error: {0}")]
    Network(String),

    /// The input document or the existing catalog is not valid JSON, or the
    /// catalog could not be serialized.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Reading the input, or writing the catalog, failed at `path`.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An argument is unusable, such as an output path with no file name.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Result alias for the library crates.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
