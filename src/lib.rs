//! resdep - resource-dependency engine for kernel syscall fuzzers
//!
//! Many syscalls consume OS handles (file descriptors, sockets, memory
//! areas) that other syscalls produce. This library answers two questions
//! about an already-built call catalog:
//!
//! - which calls can construct a given resource, precisely or under relaxed
//!   kind compatibility ([`target::Target::resource_ctors`])
//! - which calls of a candidate set are usable because every resource they
//!   need is transitively producible within that set
//!   ([`target::Target::transitively_enabled_calls`])
//!
//! # Example
//! ```
//! use resdep::target::{Target, TargetDesc};
//! use resdep::types::{Field, ResourceDesc, Syscall, Type};
//!
//! let target = Target::new(TargetDesc::new(
//!     vec![ResourceDesc::new("fd", ["fd"])],
//!     vec![
//!         Syscall::new("open", vec![], Some(Type::resource("fd"))),
//!         Syscall::new("read", vec![Field::new("fd", Type::resource("fd"))], None),
//!     ],
//! ))?;
//!
//! let result = target.transitively_enabled_calls(&target.all_calls());
//! assert_eq!(result.supported.len(), 2);
//! # Ok::<(), resdep::error::CatalogError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod compat;
mod ctors;
pub mod config;
pub mod enablement;
pub mod error;
pub mod extract;
pub mod report;
pub mod target;
pub mod types;
