//! Check configuration: which catalog to load and which calls to want
//!
//! # Example TOML
//! ```toml
//! catalog = "linux_amd64.toml"
//! enable_syscalls = ["open", "read", "socket$*"]
//! disable_syscalls = ["socket$netlink"]
//! ```

use crate::error::ConfigError;
use crate::target::Target;
use crate::types::CallId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for an enablement check
///
/// # Example
/// ```
/// use resdep::config::CheckConfig;
///
/// let config = CheckConfig::default();
/// assert!(config.enable_syscalls.is_empty()); // everything wanted
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Catalog file, relative paths resolve against the working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Call patterns to want; empty wants every call
    pub enable_syscalls: Vec<String>,

    /// Call patterns to drop from the wanted set, applied after enabling
    pub disable_syscalls: Vec<String>,
}

impl CheckConfig {
    /// Load configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CheckConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate every pattern
    pub fn validate(&self) -> Result<(), ConfigError> {
        for pattern in self.enable_syscalls.iter().chain(&self.disable_syscalls) {
            CallPattern::parse(pattern)?;
        }
        Ok(())
    }

    /// Resolve the patterns against `target` into the wanted call set
    ///
    /// # Errors
    /// Returns an error for an invalid pattern or one that matches nothing.
    pub fn select(&self, target: &Target) -> Result<BTreeSet<CallId>, ConfigError> {
        let mut wanted = if self.enable_syscalls.is_empty() {
            target.all_calls()
        } else {
            let mut wanted = BTreeSet::new();
            for pattern in &self.enable_syscalls {
                wanted.extend(CallPattern::parse(pattern)?.resolve(target)?);
            }
            wanted
        };
        for pattern in &self.disable_syscalls {
            for id in CallPattern::parse(pattern)?.resolve(target)? {
                wanted.remove(&id);
            }
        }
        Ok(wanted)
    }
}

/// Exact call name, or a prefix followed by `*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallPattern<'a> {
    Exact(&'a str),
    Prefix(&'a str),
}

impl<'a> CallPattern<'a> {
    pub fn parse(pattern: &'a str) -> Result<Self, ConfigError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        match pattern.find('*') {
            None => Ok(CallPattern::Exact(pattern)),
            Some(pos) if pos == pattern.len() - 1 => Ok(CallPattern::Prefix(&pattern[..pos])),
            Some(_) => Err(ConfigError::MisplacedWildcard(pattern.to_string())),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            CallPattern::Exact(exact) => name == *exact,
            CallPattern::Prefix(prefix) => name.starts_with(prefix),
        }
    }

    fn resolve(&self, target: &Target) -> Result<Vec<CallId>, ConfigError> {
        let ids: Vec<CallId> = target
            .syscalls()
            .iter()
            .filter(|call| self.matches(&call.name))
            .map(|call| call.id())
            .collect();
        if ids.is_empty() {
            let shown = match self {
                CallPattern::Exact(exact) => exact.to_string(),
                CallPattern::Prefix(prefix) => format!("{}*", prefix),
            };
            return Err(ConfigError::UnknownPattern(shown));
        }
        Ok(ids)
    }
}
