//! Reading and writing catalog documents.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use toolcatalog_shared::{Catalog, CatalogError, InputDocument, Result};

/// Read the curated input document. The file must exist.
pub fn read_input(path: &Path) -> Result<InputDocument> {
    let content = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let input: InputDocument = serde_json::from_str(&content)
        .map_err(|e| CatalogError::parse(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), tools = input.tools.len(), "input loaded");
    Ok(input)
}

/// Read the existing catalog, or an empty one if `path` does not exist.
pub fn read_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        debug!(path = %path.display(), "no existing catalog, starting empty");
        return Ok(Catalog::default());
    }

    let content = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let catalog: Catalog = serde_json::from_str(&content)
        .map_err(|e| CatalogError::parse(format!("{}: {e}", path.display())))?;
    debug!(
        path = %path.display(),
        tools = catalog.tools.len(),
        sources = catalog.sources.len(),
        "existing catalog loaded"
    );
    Ok(catalog)
}

/// Pretty JSON with a two-space indent and non-ASCII text left unescaped.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CatalogError::parse(format!("failed to serialize catalog: {e}")))
}

/// Write `catalog` to `path` via a temporary sibling and a rename, creating
/// the parent directory when needed.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let json = to_json_pretty(catalog)?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| CatalogError::validation(format!("{}: not a file path", path.display())))?;
    let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));

    write_synced(&tmp_path, json.as_bytes()).map_err(|e| CatalogError::io(&tmp_path, e))?;

    fs::rename(&tmp_path, path).map_err(|e| CatalogError::io(path, e))?;

    info!(path = %path.display(), tools = catalog.tools.len(), "catalog written");
    Ok(())
}

/// Write `contents` plus a trailing newline and flush it to disk.
fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)?;
    file.write_all(b"\n")?;
    file.sync_all()
}
