//! Transitive enablement of syscalls
//!
//! Given a candidate set of calls, computes which of them are usable because
//! every resource they require can be produced by other usable calls in the
//! same set. Each invocation owns its working state, so concurrent
//! invocations over one [`Target`] never interfere.
//!
//! # Algorithm
//!
//! ```text
//! can_create = {filename, vma}
//! repeat:
//!     for c in wanted \ supported (catalog order):
//!         if every input name of c ∈ can_create:
//!             supported += c
//!             can_create += every kind tag of every output of c
//! until a pass adds nothing
//! ```
//!
//! The number of passes is bounded by the number of distinct kind tags plus one.

use crate::extract::{FILENAME, VMA};
use crate::target::Target;
use crate::types::{CallId, ResourceId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Partition of a wanted call set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enablement {
    pub supported: BTreeSet<CallId>,
    /// Disabled calls with a human-readable reason
    pub disabled: BTreeMap<CallId, String>,
}

impl Enablement {
    pub fn is_supported(&self, call: CallId) -> bool {
        self.supported.contains(&call)
    }

    pub fn reason(&self, call: CallId) -> Option<&str> {
        self.disabled.get(&call).map(String::as_str)
    }
}

impl Target {
    /// Fixpoint over `wanted`: the supported calls and the kind tags they can create.
    ///
    /// # Panics
    /// Panics if `wanted` contains an id that does not belong to this target.
    pub fn transitively_enabled(
        &self,
        wanted: &BTreeSet<CallId>,
    ) -> (BTreeSet<CallId>, BTreeSet<&str>) {
        let mut supported = BTreeSet::new();
        let mut can_create: HashSet<&str> = HashSet::with_capacity(wanted.len());
        can_create.insert(FILENAME);
        can_create.insert(VMA);

        let mut passes = 0usize;
        loop {
            passes += 1;
            let before = supported.len();
            for &id in wanted {
                if supported.contains(&id) {
                    continue;
                }
                let call = self.call(id);
                let ready = self
                    .input_resources(call)
                    .all(|res| can_create.contains(res.name.as_str()));
                if ready {
                    supported.insert(id);
                    for res in self.output_resources(call) {
                        can_create.extend(res.kind.iter().map(String::as_str));
                    }
                }
            }
            if supported.len() == before {
                break;
            }
        }

        tracing::trace!(
            wanted = wanted.len(),
            supported = supported.len(),
            passes,
            "transitive enablement fixpoint reached"
        );

        (supported, can_create.into_iter().collect())
    }

    /// Split `wanted` into supported calls and disabled calls with reasons.
    ///
    /// A disabled call's reason names its first input resource, in argument
    /// order, that nothing in `wanted` can create, along with the calls that
    /// could precisely construct it.
    ///
    /// # Panics
    /// Panics if a wanted call ends up in neither bucket; that can only
    /// happen with an inconsistent catalog.
    pub fn transitively_enabled_calls(&self, wanted: &BTreeSet<CallId>) -> Enablement {
        let (supported, can_create) = self.transitively_enabled(wanted);
        let mut disabled = BTreeMap::new();
        let mut ctors: HashMap<ResourceId, String> = HashMap::new();

        for &id in wanted {
            if supported.contains(&id) {
                continue;
            }
            let call = self.call(id);
            let missing = call
                .input_resources()
                .iter()
                .copied()
                .find(|&res| !can_create.contains(self.resource_by_id(res).name.as_str()));
            if let Some(res) = missing {
                let name = &self.resource_by_id(res).name;
                let names = ctors.entry(res).or_insert_with(|| {
                    let calls: Vec<&str> = self
                        .resource_ctors(name, true)
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect();
                    calls.join(" ")
                });
                let reason = format!(
                    "no syscalls can create resource {}, enable some syscalls that can create it [{}]",
                    name, names
                );
                tracing::debug!(syscall = %call.name, resource = %name, "syscall disabled");
                disabled.insert(id, reason);
            }
        }

        if wanted.len() != supported.len() + disabled.len() {
            panic!(
                "lost syscalls: wanted {}, supported {}, disabled {}",
                wanted.len(),
                supported.len(),
                disabled.len()
            );
        }

        tracing::debug!(
            supported = supported.len(),
            disabled = disabled.len(),
            "classified wanted syscalls"
        );

        Enablement {
            supported,
            disabled,
        }
    }
}
