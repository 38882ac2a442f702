//! Resource constructor index
//!
//! Built once per target, after every call's output resources are known.
//! Each declared resource records the calls whose produced kinds are
//! compatible with its own kind. A call can be listed twice for the same
//! resource, once per precision tag: selection queries one precision or the
//! other, so the entries are kept apart.

use crate::compat::is_compatible_kind;
use crate::extract::{TIMESPEC, TIME_READER};
use crate::types::{ResourceCtor, ResourceDesc, Syscall};

/// Fill `ctors` of every resource in `resources`.
///
/// Synthetic resources skip the kind match; `timespec` instead gains every
/// call named `clock_gettime` as a precise constructor.
pub(crate) fn populate_resource_ctors(resources: &mut [ResourceDesc], syscalls: &[Syscall]) {
    let produced: Vec<Vec<Vec<String>>> = syscalls
        .iter()
        .map(|call| {
            call.output_resources
                .iter()
                .map(|id| resources[id.0].kind.clone())
                .collect()
        })
        .collect();

    for res in resources.iter_mut() {
        if res.synthetic {
            if res.name == TIMESPEC {
                res.ctors.extend(
                    syscalls
                        .iter()
                        .filter(|call| call.name == TIME_READER)
                        .map(|call| ResourceCtor {
                            call: call.id,
                            precise: true,
                        }),
                );
            }
            continue;
        }

        for (call, kinds) in syscalls.iter().zip(&produced) {
            let mut precise_ok = false;
            let mut imprecise_ok = false;
            for kind in kinds {
                if precise_ok && imprecise_ok {
                    break;
                }
                precise_ok |= is_compatible_kind(&res.kind, kind, true);
                imprecise_ok |= is_compatible_kind(&res.kind, kind, false);
            }
            if precise_ok {
                res.ctors.push(ResourceCtor {
                    call: call.id,
                    precise: true,
                });
            }
            if imprecise_ok {
                res.ctors.push(ResourceCtor {
                    call: call.id,
                    precise: false,
                });
            }
        }
    }

    tracing::debug!(
        resources = resources.len(),
        syscalls = syscalls.len(),
        ctors = resources.iter().map(|r| r.ctors.len()).sum::<usize>(),
        "populated resource constructors"
    );
}
