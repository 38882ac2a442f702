//! Call catalog data model
//!
//! Argument shapes are a closed tagged variant ([`TypeShape`]) so every
//! consumer matches exhaustively. Direction is annotated sparsely: a node
//! without an explicit [`Dir`] inherits the direction of its enclosing node,
//! top-level arguments default to [`Dir::In`] and the return value to
//! [`Dir::Out`].

use serde::{Deserialize, Serialize};

/// Index of a syscall in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(pub usize);

/// Index of a resource descriptor in the target's resource table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub usize);

/// Data flow direction of an argument node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    In,
    Out,
    #[serde(alias = "in_out")]
    InOut,
}

/// Argument type node: direction, optionality and shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    /// Explicit direction; `None` inherits from the enclosing node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<Dir>,

    /// Optional values may be omitted by the generator
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,

    #[serde(flatten)]
    pub shape: TypeShape,
}

/// Shape of an argument node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeShape {
    /// OS handle of a named resource type
    Resource { name: String },
    Int,
    Const,
    Flags,
    Len,
    Proc,
    /// Pointer to an allocated memory region
    Vma,
    Buffer,
    Filename,
    Ptr { elem: Box<Type> },
    Array { elem: Box<Type> },
    Struct {
        name: String,
        #[serde(default)]
        fields: Vec<Field>,
    },
    Union {
        name: String,
        #[serde(default)]
        fields: Vec<Field>,
    },
}

/// Named argument or struct/union member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: Type,
}

impl Type {
    pub fn new(shape: TypeShape) -> Self {
        Self {
            dir: None,
            optional: false,
            shape,
        }
    }

    /// Shorthand for a resource-typed node
    pub fn resource(name: impl Into<String>) -> Self {
        Self::new(TypeShape::Resource { name: name.into() })
    }

    pub fn ptr(elem: Type) -> Self {
        Self::new(TypeShape::Ptr {
            elem: Box::new(elem),
        })
    }

    pub fn array(elem: Type) -> Self {
        Self::new(TypeShape::Array {
            elem: Box::new(elem),
        })
    }

    pub fn structure(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(TypeShape::Struct {
            name: name.into(),
            fields,
        })
    }

    pub fn union(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(TypeShape::Union {
            name: name.into(),
            fields,
        })
    }

    pub fn with_dir(mut self, dir: Dir) -> Self {
        self.dir = Some(dir);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Visit this node and every nested node, parents first.
    ///
    /// `parent` is the effective direction of the enclosing node; the
    /// visitor receives each node together with its own effective direction.
    pub fn walk<'a, F>(&'a self, parent: Dir, visit: &mut F)
    where
        F: FnMut(&'a Type, Dir),
    {
        let dir = self.dir.unwrap_or(parent);
        visit(self, dir);
        match &self.shape {
            TypeShape::Ptr { elem } | TypeShape::Array { elem } => elem.walk(dir, visit),
            TypeShape::Struct { fields, .. } | TypeShape::Union { fields, .. } => {
                for field in fields {
                    field.typ.walk(dir, visit);
                }
            }
            TypeShape::Resource { .. }
            | TypeShape::Int
            | TypeShape::Const
            | TypeShape::Flags
            | TypeShape::Len
            | TypeShape::Proc
            | TypeShape::Vma
            | TypeShape::Buffer
            | TypeShape::Filename => {}
        }
    }
}

impl Field {
    pub fn new(name: impl Into<String>, typ: Type) -> Self {
        Self {
            name: name.into(),
            typ,
        }
    }
}

/// Constructor entry of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCtor {
    pub call: CallId,
    /// Produced kind matches the resource kind without relaxation
    pub precise: bool,
}

/// Named resource type with its kind lineage (general → specific)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDesc {
    pub name: String,
    pub kind: Vec<String>,

    #[serde(skip)]
    pub(crate) ctors: Vec<ResourceCtor>,

    #[serde(skip)]
    pub(crate) synthetic: bool,
}

impl ResourceDesc {
    pub fn new<S: Into<String>>(name: impl Into<String>, kind: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into_iter().map(Into::into).collect(),
            ctors: Vec::new(),
            synthetic: false,
        }
    }

    pub(crate) fn synthetic(name: &str) -> Self {
        Self {
            synthetic: true,
            ..Self::new(name, [name])
        }
    }

    /// Constructors populated once at target construction, in catalog order
    pub fn ctors(&self) -> &[ResourceCtor] {
        &self.ctors
    }

    /// True for the built-in resources the catalog never declares
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

/// Syscall descriptor
///
/// Resource lists are filled in by [`crate::target::Target::new`] and stay
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syscall {
    /// Full variant name, e.g. `socket$inet_tcp`
    pub name: String,

    #[serde(default)]
    pub args: Vec<Field>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret: Option<Type>,

    #[serde(skip)]
    pub(crate) id: CallId,

    #[serde(skip)]
    pub(crate) input_resources: Vec<ResourceId>,

    #[serde(skip)]
    pub(crate) output_resources: Vec<ResourceId>,
}

impl Default for CallId {
    fn default() -> Self {
        CallId(usize::MAX)
    }
}

impl Syscall {
    pub fn new(name: impl Into<String>, args: Vec<Field>, ret: Option<Type>) -> Self {
        Self {
            name: name.into(),
            args,
            ret,
            id: CallId::default(),
            input_resources: Vec::new(),
            output_resources: Vec::new(),
        }
    }

    pub fn id(&self) -> CallId {
        self.id
    }

    /// Base kernel call name: the part of [`Syscall::name`] before the first `$`
    pub fn call_name(&self) -> &str {
        self.name.split('$').next().unwrap_or(&self.name)
    }

    /// Resources that must exist before this call can be issued
    pub fn input_resources(&self) -> &[ResourceId] {
        &self.input_resources
    }

    /// Resources this call can produce
    pub fn output_resources(&self) -> &[ResourceId] {
        &self.output_resources
    }

    /// Visit every argument and return node with its effective direction
    pub fn foreach_type<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a Type, Dir),
    {
        for arg in &self.args {
            arg.typ.walk(Dir::In, &mut visit);
        }
        if let Some(ret) = &self.ret {
            ret.walk(Dir::Out, &mut visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_name_strips_variant() {
        let call = Syscall::new("socket$inet_tcp", vec![], None);
        assert_eq!(call.call_name(), "socket");

        let plain = Syscall::new("read", vec![], None);
        assert_eq!(plain.call_name(), "read");
    }

    #[test]
    fn test_foreach_type_inherits_direction() {
        let call = Syscall::new(
            "pipe",
            vec![Field::new(
                "fds",
                Type::ptr(Type::structure(
                    "pipefd",
                    vec![
                        Field::new("rfd", Type::resource("fd")),
                        Field::new("wfd", Type::resource("fd")),
                    ],
                ))
                .with_dir(Dir::Out),
            )],
            None,
        );

        let mut dirs = Vec::new();
        call.foreach_type(|typ, dir| {
            if let TypeShape::Resource { name } = &typ.shape {
                dirs.push((name.clone(), dir));
            }
        });

        assert_eq!(
            dirs,
            vec![("fd".to_string(), Dir::Out), ("fd".to_string(), Dir::Out)]
        );
    }

    #[test]
    fn test_foreach_type_visits_ret_as_output() {
        let call = Syscall::new("open", vec![], Some(Type::resource("fd")));
        let mut seen = Vec::new();
        call.foreach_type(|_, dir| seen.push(dir));
        assert_eq!(seen, vec![Dir::Out]);
    }

    #[test]
    fn test_explicit_dir_overrides_parent() {
        let typ = Type::structure(
            "msg",
            vec![Field::new("fd", Type::resource("fd").with_dir(Dir::In))],
        )
        .with_dir(Dir::Out);

        let mut dirs = Vec::new();
        typ.walk(Dir::In, &mut |_, dir| dirs.push(dir));
        assert_eq!(dirs, vec![Dir::Out, Dir::In]);
    }

    #[test]
    fn test_type_deserializes_from_toml() {
        let typ: Type = toml::from_str(
            r#"
            kind = "ptr"
            dir = "out"
            elem = { kind = "resource", name = "fd", optional = true }
            "#,
        )
        .unwrap();

        assert_eq!(typ.dir, Some(Dir::Out));
        match typ.shape {
            TypeShape::Ptr { elem } => {
                assert!(elem.optional);
                assert_eq!(
                    elem.shape,
                    TypeShape::Resource {
                        name: "fd".to_string()
                    }
                );
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }
}
