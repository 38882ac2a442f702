//! Error types for catalog loading and configuration validation
//!
//! Only load-time problems are errors. Invariant violations discovered after
//! a [`crate::target::Target`] is built are fatal and panic instead.

use thiserror::Error;

/// Errors raised while building a target from a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Duplicate resource '{0}'")]
    DuplicateResource(String),

    #[error("Duplicate syscall '{0}'")]
    DuplicateSyscall(String),

    #[error("Resource '{0}' has an empty kind lineage")]
    EmptyKind(String),

    #[error("Resource '{name}' kind lineage must end with its own name, found '{last}'")]
    KindNameMismatch { name: String, last: String },

    #[error("Resource name '{0}' is reserved for a built-in resource")]
    ReservedResource(String),

    #[error("Syscall '{call}' references unknown resource '{resource}'")]
    UnknownResource { call: String, resource: String },

    #[error("Failed to parse TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while validating or applying a check configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Empty syscall pattern")]
    EmptyPattern,

    #[error("Wildcard is only allowed at the end of a pattern: '{0}'")]
    MisplacedWildcard(String),

    #[error("Pattern '{0}' does not match any syscall")]
    UnknownPattern(String),
}
