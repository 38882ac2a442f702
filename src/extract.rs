//! Per-call resource extraction
//!
//! Walks a call's argument shape and classifies resource-typed nodes:
//!
//! - inputs: resource nodes that are not output-only and not optional
//! - outputs: resource nodes that are not input-only, optional or not
//!
//! Non-optional filename and memory-region nodes read by a call count as
//! inputs of the synthetic `filename` and `vma` resources, which are always
//! available. Time-value structs are treated as needing the synthetic
//! `timespec` resource, and `clock_gettime` as producing it, since it fills
//! the struct through an output pointer without any resource-typed argument.

use crate::error::CatalogError;
use crate::types::{Dir, ResourceId, Syscall, TypeShape};
use std::collections::HashMap;

pub const TIMESPEC: &str = "timespec";
pub const FILENAME: &str = "filename";
pub const VMA: &str = "vma";

/// Well-known call that produces a time value
///
/// Extraction matches it by base call name, so variants such as
/// `clock_gettime$raw` produce `timespec` too. The constructor index only
/// lists the call named exactly `clock_gettime`, so a catalog holding only
/// variants enables `timespec` consumers while reporting no constructors.
pub const TIME_READER: &str = "clock_gettime";

const TIME_STRUCTS: [&str; 2] = ["timespec", "timeval"];

/// Lookup state shared by extraction of every call in one target
pub(crate) struct Extractor<'a> {
    pub resources: &'a HashMap<String, ResourceId>,
    pub timespec: ResourceId,
    pub filename: ResourceId,
    pub vma: ResourceId,
    /// Time-value structs only count as resources on linux targets
    pub linux: bool,
}

impl Extractor<'_> {
    fn lookup(&self, call: &Syscall, name: &str) -> Result<ResourceId, CatalogError> {
        self.resources
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownResource {
                call: call.name.clone(),
                resource: name.to_string(),
            })
    }

    /// Resources that must be available before `call` can be issued
    pub fn input_resources(&self, call: &Syscall) -> Result<Vec<ResourceId>, CatalogError> {
        let mut resources = Vec::new();
        let mut failure = None;
        call.foreach_type(|typ, dir| {
            if dir == Dir::Out || failure.is_some() {
                return;
            }
            match &typ.shape {
                TypeShape::Resource { name } if !typ.optional => match self.lookup(call, name) {
                    Ok(id) => resources.push(id),
                    Err(err) => failure = Some(err),
                },
                TypeShape::Filename if !typ.optional => resources.push(self.filename),
                TypeShape::Vma if !typ.optional => resources.push(self.vma),
                TypeShape::Struct { name, .. }
                    if self.linux && TIME_STRUCTS.contains(&name.as_str()) =>
                {
                    resources.push(self.timespec)
                }
                _ => {}
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(resources),
        }
    }

    /// Resources `call` can produce
    pub fn output_resources(&self, call: &Syscall) -> Result<Vec<ResourceId>, CatalogError> {
        let mut resources = Vec::new();
        let mut failure = None;
        call.foreach_type(|typ, dir| {
            if dir == Dir::In || failure.is_some() {
                return;
            }
            if let TypeShape::Resource { name } = &typ.shape {
                match self.lookup(call, name) {
                    Ok(id) => resources.push(id),
                    Err(err) => failure = Some(err),
                }
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }
        if call.call_name() == TIME_READER {
            resources.push(self.timespec);
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Type};

    fn resource_map() -> HashMap<String, ResourceId> {
        ["fd", "sock", TIMESPEC, FILENAME, VMA]
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), ResourceId(i)))
            .collect()
    }

    fn extractor(map: &HashMap<String, ResourceId>, linux: bool) -> Extractor<'_> {
        Extractor {
            resources: map,
            timespec: map[TIMESPEC],
            filename: map[FILENAME],
            vma: map[VMA],
            linux,
        }
    }

    #[test]
    fn test_optional_input_is_not_required() {
        let map = resource_map();
        let ex = extractor(&map, true);
        let call = Syscall::new(
            "close_range",
            vec![
                Field::new("first", Type::resource("fd")),
                Field::new("last", Type::resource("sock").optional()),
            ],
            None,
        );

        assert_eq!(ex.input_resources(&call).unwrap(), vec![ResourceId(0)]);
        assert!(ex.output_resources(&call).unwrap().is_empty());
    }

    #[test]
    fn test_inout_resource_is_both() {
        let map = resource_map();
        let ex = extractor(&map, true);
        let call = Syscall::new(
            "dup_into",
            vec![Field::new(
                "fd",
                Type::ptr(Type::resource("fd")).with_dir(Dir::InOut),
            )],
            None,
        );

        assert_eq!(ex.input_resources(&call).unwrap(), vec![ResourceId(0)]);
        assert_eq!(ex.output_resources(&call).unwrap(), vec![ResourceId(0)]);
    }

    #[test]
    fn test_optional_output_still_produced() {
        let map = resource_map();
        let ex = extractor(&map, true);
        let call = Syscall::new(
            "accept",
            vec![Field::new("fd", Type::resource("sock"))],
            Some(Type::resource("sock").optional()),
        );

        assert_eq!(ex.input_resources(&call).unwrap(), vec![ResourceId(1)]);
        assert_eq!(ex.output_resources(&call).unwrap(), vec![ResourceId(1)]);
    }

    #[test]
    fn test_nested_struct_fields_scanned() {
        let map = resource_map();
        let ex = extractor(&map, true);
        let call = Syscall::new(
            "sendmsg",
            vec![Field::new(
                "msg",
                Type::ptr(Type::structure(
                    "msghdr",
                    vec![Field::new(
                        "control",
                        Type::array(Type::union(
                            "cmsg",
                            vec![Field::new("rights", Type::resource("fd"))],
                        )),
                    )],
                )),
            )],
            None,
        );

        assert_eq!(ex.input_resources(&call).unwrap(), vec![ResourceId(0)]);
    }

    #[test]
    fn test_time_struct_requires_timespec() {
        let map = resource_map();
        let call = Syscall::new(
            "nanosleep",
            vec![Field::new("req", Type::ptr(Type::structure("timespec", vec![])))],
            None,
        );

        let on_linux = extractor(&map, true).input_resources(&call).unwrap();
        assert_eq!(on_linux, vec![map[TIMESPEC]]);

        let elsewhere = extractor(&map, false).input_resources(&call).unwrap();
        assert!(elsewhere.is_empty());
    }

    #[test]
    fn test_output_time_struct_not_required() {
        let map = resource_map();
        let ex = extractor(&map, true);
        let call = Syscall::new(
            "gettimeofday",
            vec![Field::new(
                "tv",
                Type::ptr(Type::structure("timeval", vec![])).with_dir(Dir::Out),
            )],
            None,
        );

        assert!(ex.input_resources(&call).unwrap().is_empty());
    }

    #[test]
    fn test_clock_gettime_produces_timespec() {
        let map = resource_map();
        let ex = extractor(&map, true);
        let call = Syscall::new(
            "clock_gettime",
            vec![Field::new(
                "tp",
                Type::ptr(Type::structure("timespec", vec![])).with_dir(Dir::Out),
            )],
            None,
        );

        assert_eq!(ex.output_resources(&call).unwrap(), vec![map[TIMESPEC]]);
    }

    #[test]
    fn test_filename_and_vma_shapes_are_inputs() {
        let map = resource_map();
        let ex = extractor(&map, true);
        let call = Syscall::new(
            "mmap",
            vec![
                Field::new("addr", Type::new(TypeShape::Vma)),
                Field::new("file", Type::ptr(Type::new(TypeShape::Filename))),
                Field::new("hint", Type::new(TypeShape::Vma).optional()),
            ],
            None,
        );

        assert_eq!(
            ex.input_resources(&call).unwrap(),
            vec![map[VMA], map[FILENAME]]
        );
        assert!(ex.output_resources(&call).unwrap().is_empty());
    }

    #[test]
    fn test_output_filename_not_required() {
        let map = resource_map();
        let ex = extractor(&map, true);
        let call = Syscall::new(
            "getcwd",
            vec![Field::new(
                "buf",
                Type::ptr(Type::new(TypeShape::Filename)).with_dir(Dir::Out),
            )],
            None,
        );

        assert!(ex.input_resources(&call).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_resource_reported() {
        let map = resource_map();
        let ex = extractor(&map, true);
        let call = Syscall::new("bogus", vec![Field::new("h", Type::resource("handle"))], None);

        match ex.input_resources(&call) {
            Err(CatalogError::UnknownResource { call, resource }) => {
                assert_eq!(call, "bogus");
                assert_eq!(resource, "handle");
            }
            other => panic!("expected UnknownResource, got {:?}", other),
        }
    }
}
