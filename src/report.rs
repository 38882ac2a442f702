//! Report rendering for enablement checks and constructor queries

use crate::enablement::Enablement;
use crate::target::Target;
use serde::Serialize;
use std::fmt;

/// Disabled call entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisabledCall {
    pub name: String,
    pub reason: String,
}

/// Name-resolved enablement result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnablementReport {
    pub wanted: usize,
    pub supported: Vec<String>,
    pub disabled: Vec<DisabledCall>,
}

impl EnablementReport {
    pub fn new(target: &Target, result: &Enablement) -> Self {
        Self {
            wanted: result.supported.len() + result.disabled.len(),
            supported: result
                .supported
                .iter()
                .map(|&id| target.call(id).name.clone())
                .collect(),
            disabled: result
                .disabled
                .iter()
                .map(|(&id, reason)| DisabledCall {
                    name: target.call(id).name.clone(),
                    reason: reason.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EnablementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} of {} syscalls supported",
            self.supported.len(),
            self.wanted
        )?;
        for name in &self.supported {
            writeln!(f, "  {}", name)?;
        }
        if !self.disabled.is_empty() {
            writeln!(f, "{} syscalls disabled:", self.disabled.len())?;
            for call in &self.disabled {
                writeln!(f, "  {}: {}", call.name, call.reason)?;
            }
        }
        Ok(())
    }
}

/// Constructors of one resource at both precisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CtorReport {
    pub resource: String,
    pub kind: Vec<String>,
    pub precise: Vec<String>,
    pub imprecise: Vec<String>,
}

impl CtorReport {
    /// # Panics
    /// Panics if `resource` is unknown to `target`.
    pub fn new(target: &Target, resource: &str) -> Self {
        let names = |precise: bool| -> Vec<String> {
            target
                .resource_ctors(resource, precise)
                .iter()
                .map(|c| c.name.clone())
                .collect()
        };
        let res = target.resource_or_panic(resource);
        Self {
            resource: res.name.clone(),
            kind: res.kind.clone(),
            precise: names(true),
            imprecise: names(false),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CtorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "resource {} [{}]", self.resource, self.kind.join(", "))?;
        writeln!(f, "  precise: {}", self.precise.join(" "))?;
        writeln!(f, "  imprecise: {}", self.imprecise.join(" "))
    }
}
