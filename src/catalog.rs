//! Catalog files
//!
//! A catalog is a serialized [`TargetDesc`], in TOML or JSON.
//!
//! # Example TOML
//! ```toml
//! os = "linux"
//!
//! [[resource]]
//! name = "fd"
//! kind = ["fd"]
//!
//! [[syscall]]
//! name = "open"
//! args = [{ name = "file", type = { kind = "ptr", elem = { kind = "filename" } } }]
//! ret = { kind = "resource", name = "fd" }
//!
//! [[syscall]]
//! name = "read"
//! args = [{ name = "fd", type = { kind = "resource", name = "fd" } }]
//! ```

use crate::error::CatalogError;
use crate::target::{Target, TargetDesc};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Serialization format of a catalog file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    /// Guess the format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CatalogFormat::Json,
            _ => CatalogFormat::Toml,
        }
    }
}

/// Parse catalog text without initializing a target
pub fn parse_catalog(text: &str, format: CatalogFormat) -> Result<TargetDesc, CatalogError> {
    let desc = match format {
        CatalogFormat::Toml => toml::from_str(text)?,
        CatalogFormat::Json => serde_json::from_str(text)?,
    };
    Ok(desc)
}

/// Parse catalog text and build a target from it
pub fn target_from_str(text: &str, format: CatalogFormat) -> Result<Target, CatalogError> {
    Target::new(parse_catalog(text, format)?)
}

/// Load a catalog file and build a target from it
///
/// # Errors
/// Returns error if the file can't be read, doesn't parse, or describes an
/// inconsistent catalog.
pub fn load_target<P: AsRef<Path>>(path: P) -> Result<Target> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let target = target_from_str(&content, CatalogFormat::from_path(path))
        .with_context(|| format!("Invalid catalog: {}", path.display()))?;
    tracing::debug!(path = %path.display(), syscalls = target.syscalls().len(), "catalog loaded");
    Ok(target)
}
