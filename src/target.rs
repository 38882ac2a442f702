//! Target: a fully initialized, read-only call catalog
//!
//! [`Target::new`] is the only way to obtain a target. It validates the
//! declared catalog, extracts every call's resources and then builds the
//! constructor index, in that order. Nothing is computed lazily afterwards,
//! so a `Target` can be shared across threads without synchronization.

use crate::compat::is_compatible_kind;
use crate::ctors::populate_resource_ctors;
use crate::error::CatalogError;
use crate::extract::{Extractor, FILENAME, TIMESPEC, VMA};
use crate::types::{CallId, ResourceDesc, ResourceId, Syscall};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Names of the universal resource sinks
///
/// Any resource may be passed where one of these is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnyResources {
    pub res16: String,
    pub res32: String,
    pub res64: String,
    pub resdec: String,
    pub reshex: String,
    pub resoct: String,
}

impl Default for AnyResources {
    fn default() -> Self {
        Self {
            res16: "ANYRES16".to_string(),
            res32: "ANYRES32".to_string(),
            res64: "ANYRES64".to_string(),
            resdec: "ANYRESDEC".to_string(),
            reshex: "ANYRESHEX".to_string(),
            resoct: "ANYRESOCT".to_string(),
        }
    }
}

impl AnyResources {
    pub fn contains(&self, name: &str) -> bool {
        [
            &self.res16,
            &self.res32,
            &self.res64,
            &self.resdec,
            &self.reshex,
            &self.resoct,
        ]
        .iter()
        .any(|sink| sink.as_str() == name)
    }
}

fn default_os() -> String {
    "linux".to_string()
}

/// Declared catalog, as produced by catalog loading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDesc {
    #[serde(default = "default_os")]
    pub os: String,

    #[serde(default)]
    pub any: AnyResources,

    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceDesc>,

    #[serde(default, rename = "syscall")]
    pub syscalls: Vec<Syscall>,
}

impl TargetDesc {
    pub fn new(resources: Vec<ResourceDesc>, syscalls: Vec<Syscall>) -> Self {
        Self {
            os: default_os(),
            any: AnyResources::default(),
            resources,
            syscalls,
        }
    }

    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }
}

/// Initialized call catalog
#[derive(Debug, Clone)]
pub struct Target {
    os: String,
    any: AnyResources,
    resources: Vec<ResourceDesc>,
    resource_map: HashMap<String, ResourceId>,
    syscalls: Vec<Syscall>,
    syscall_map: HashMap<String, CallId>,
}

impl Target {
    /// Validate `desc` and compute per-call resources and constructors.
    ///
    /// # Errors
    /// Returns an error for duplicate names, malformed kind lineages,
    /// declarations of built-in resource names, or references to
    /// undeclared resources.
    pub fn new(desc: TargetDesc) -> Result<Self, CatalogError> {
        let TargetDesc {
            os,
            any,
            mut resources,
            mut syscalls,
        } = desc;

        let mut resource_map = HashMap::with_capacity(resources.len() + 3);
        for (i, res) in resources.iter().enumerate() {
            if [TIMESPEC, FILENAME, VMA].contains(&res.name.as_str()) {
                return Err(CatalogError::ReservedResource(res.name.clone()));
            }
            match res.kind.last() {
                None => return Err(CatalogError::EmptyKind(res.name.clone())),
                Some(last) if *last != res.name => {
                    return Err(CatalogError::KindNameMismatch {
                        name: res.name.clone(),
                        last: last.clone(),
                    })
                }
                Some(_) => {}
            }
            if resource_map
                .insert(res.name.clone(), ResourceId(i))
                .is_some()
            {
                return Err(CatalogError::DuplicateResource(res.name.clone()));
            }
        }
        for name in [TIMESPEC, FILENAME, VMA] {
            resource_map.insert(name.to_string(), ResourceId(resources.len()));
            resources.push(ResourceDesc::synthetic(name));
        }

        let mut syscall_map = HashMap::with_capacity(syscalls.len());
        for (i, call) in syscalls.iter_mut().enumerate() {
            call.id = CallId(i);
            if syscall_map.insert(call.name.clone(), call.id).is_some() {
                return Err(CatalogError::DuplicateSyscall(call.name.clone()));
            }
        }

        let extractor = Extractor {
            resources: &resource_map,
            timespec: resource_map[TIMESPEC],
            filename: resource_map[FILENAME],
            vma: resource_map[VMA],
            linux: os == "linux",
        };
        for call in syscalls.iter_mut() {
            call.input_resources = extractor.input_resources(call)?;
            call.output_resources = extractor.output_resources(call)?;
        }

        populate_resource_ctors(&mut resources, &syscalls);

        tracing::debug!(
            os = %os,
            resources = resources.len(),
            syscalls = syscalls.len(),
            "target initialized"
        );

        Ok(Self {
            os,
            any,
            resources,
            resource_map,
            syscalls,
            syscall_map,
        })
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn any(&self) -> &AnyResources {
        &self.any
    }

    /// All syscalls in catalog order
    pub fn syscalls(&self) -> &[Syscall] {
        &self.syscalls
    }

    /// Declared resources followed by the built-in ones
    pub fn resources(&self) -> &[ResourceDesc] {
        &self.resources
    }

    pub fn syscall(&self, name: &str) -> Option<&Syscall> {
        self.syscall_map.get(name).map(|id| &self.syscalls[id.0])
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceDesc> {
        self.resource_map.get(name).map(|id| &self.resources[id.0])
    }

    /// Ids of every syscall in the catalog
    pub fn all_calls(&self) -> BTreeSet<CallId> {
        self.syscalls.iter().map(Syscall::id).collect()
    }

    /// # Panics
    /// Panics if `id` does not belong to this target.
    pub fn call(&self, id: CallId) -> &Syscall {
        match self.syscalls.get(id.0) {
            Some(call) => call,
            None => panic!("unknown syscall id {}", id.0),
        }
    }

    pub(crate) fn resource_by_id(&self, id: ResourceId) -> &ResourceDesc {
        &self.resources[id.0]
    }

    pub(crate) fn resource_or_panic(&self, name: &str) -> &ResourceDesc {
        match self.resource(name) {
            Some(res) => res,
            None => panic!("unknown resource '{}'", name),
        }
    }

    /// Input resources of `call`, duplicates preserved
    pub fn input_resources<'a>(
        &'a self,
        call: &'a Syscall,
    ) -> impl Iterator<Item = &'a ResourceDesc> {
        call.input_resources
            .iter()
            .map(move |&id| self.resource_by_id(id))
    }

    /// Output resources of `call`, duplicates preserved
    pub fn output_resources<'a>(
        &'a self,
        call: &'a Syscall,
    ) -> impl Iterator<Item = &'a ResourceDesc> {
        call.output_resources
            .iter()
            .map(move |&id| self.resource_by_id(id))
    }

    /// Calls that can construct resource `name`, in catalog order.
    ///
    /// With `precise` only exact-kind constructors are returned; otherwise
    /// every entry is, so a call carrying both tags appears twice.
    ///
    /// # Panics
    /// Panics if `name` is not a resource of this target.
    pub fn resource_ctors(&self, name: &str, precise: bool) -> Vec<&Syscall> {
        self.resource_or_panic(name)
            .ctors
            .iter()
            .filter(|ctor| !precise || ctor.precise)
            .map(|ctor| &self.syscalls[ctor.call.0])
            .collect()
    }

    /// Returns true if a resource named `src` can be passed as an argument of resource `dst`.
    ///
    /// # Panics
    /// Panics if either name is unknown, unless `dst` is a universal sink.
    pub fn is_compatible_resource(&self, dst: &str, src: &str) -> bool {
        if self.any.contains(dst) {
            return true;
        }
        let dst = self.resource_or_panic(dst);
        let src = self.resource_or_panic(src);
        is_compatible_kind(&dst.kind, &src.kind, false)
    }
}
