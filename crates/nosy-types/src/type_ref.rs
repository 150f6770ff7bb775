//! Structural Go type references.
//!
//! A [`TypeRef`] is a closed set of shape tags. Named types carry identity
//! only; their underlying shape is looked up in a
//! [`TypeUniverse`](crate::universe::TypeUniverse), which keeps recursive
//! declarations (`type Node struct { next *Node }`) finite.

use serde::{Deserialize, Serialize};

/// Identity of a Go package: import path plus the name from its package clause.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    /// Import path (e.g., "github.com/org/repo/pkg/store")
    pub path: String,
    /// Declared package name (e.g., "store")
    pub name: String,
}

impl PackageRef {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Predeclared basic kinds.
///
/// `byte` and `rune` are kept apart from `uint8` and `int32` so generated code
/// spells types the way the source declared them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    #[serde(alias = "unsafe.Pointer")]
    UnsafePointer,
    Byte,
    Rune,
}

impl BasicKind {
    /// Go spelling of the kind.
    pub fn go_name(&self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::Byte => "byte",
            BasicKind::Rune => "rune",
        }
    }

    /// `byte` is an alias of `uint8`.
    pub fn is_byte(&self) -> bool {
        matches!(self, BasicKind::Uint8 | BasicKind::Byte)
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    #[default]
    Both,
    Send,
    Recv,
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub embedded: bool,
}

/// An interface method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub params: Vec<TypeRef>,
    #[serde(default)]
    pub results: Vec<TypeRef>,
    #[serde(default)]
    pub variadic: bool,
}

/// A Go type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Basic {
        basic: BasicKind,
    },
    Pointer {
        elem: Box<TypeRef>,
    },
    Slice {
        elem: Box<TypeRef>,
    },
    Array {
        len: u64,
        elem: Box<TypeRef>,
    },
    Map {
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
    Struct {
        #[serde(default)]
        fields: Vec<Field>,
    },
    Interface {
        #[serde(default)]
        methods: Vec<Method>,
        #[serde(default)]
        embeds: Vec<TypeRef>,
    },
    /// A declared type. `package` is `None` for predeclared names such as `error`.
    Named {
        #[serde(default)]
        package: Option<PackageRef>,
        name: String,
        #[serde(default)]
        type_args: Vec<TypeRef>,
    },
    /// A function type. For variadic signatures the last param is the slice type.
    Signature {
        #[serde(default)]
        params: Vec<TypeRef>,
        #[serde(default)]
        results: Vec<TypeRef>,
        #[serde(default)]
        variadic: bool,
    },
    Chan {
        #[serde(default)]
        dir: ChanDir,
        elem: Box<TypeRef>,
    },
}

impl TypeRef {
    pub fn basic(kind: BasicKind) -> Self {
        TypeRef::Basic { basic: kind }
    }

    pub fn pointer(elem: TypeRef) -> Self {
        TypeRef::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeRef) -> Self {
        TypeRef::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn array(len: u64, elem: TypeRef) -> Self {
        TypeRef::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn chan(elem: TypeRef) -> Self {
        TypeRef::Chan {
            dir: ChanDir::Both,
            elem: Box::new(elem),
        }
    }

    pub fn func(params: Vec<TypeRef>, results: Vec<TypeRef>) -> Self {
        TypeRef::Signature {
            params,
            results,
            variadic: false,
        }
    }

    pub fn empty_struct() -> Self {
        TypeRef::Struct { fields: Vec::new() }
    }

    pub fn empty_interface() -> Self {
        TypeRef::Interface {
            methods: Vec::new(),
            embeds: Vec::new(),
        }
    }

    /// A named type declared in `package`.
    pub fn named(package: &PackageRef, name: impl Into<String>) -> Self {
        TypeRef::Named {
            package: Some(package.clone()),
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    /// The predeclared `error` interface.
    pub fn error() -> Self {
        TypeRef::Named {
            package: None,
            name: "error".to_string(),
            type_args: Vec::new(),
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeRef::Pointer { .. })
    }

    pub fn is_named(&self) -> bool {
        matches!(self, TypeRef::Named { .. })
    }

    /// True for the predeclared `error` type only, not for types implementing it.
    pub fn is_error(&self) -> bool {
        matches!(self, TypeRef::Named { package: None, name, .. } if name == "error")
    }

    /// The named type behind this reference, looking through at most one pointer.
    ///
    /// Returns `None` for anything that is neither a named type nor a pointer
    /// to one; such a type can never match a receiver.
    pub fn named_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Named { .. } => Some(self),
            TypeRef::Pointer { elem } if elem.is_named() => Some(elem),
            _ => None,
        }
    }

    /// Declared name of a named type.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Universe key of a named type: `path.Name`, or just `Name` when predeclared.
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            TypeRef::Named {
                package: Some(pkg),
                name,
                ..
            } => Some(format!("{}.{}", pkg.path, name)),
            TypeRef::Named {
                package: None,
                name,
                ..
            } => Some(name.clone()),
            _ => None,
        }
    }

    /// Visit this type and every type nested inside it, depth first.
    ///
    /// Named types are not expanded; only their type arguments are visited.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a TypeRef)) {
        visit(self);
        match self {
            TypeRef::Basic { .. } => {}
            TypeRef::Pointer { elem }
            | TypeRef::Slice { elem }
            | TypeRef::Array { elem, .. }
            | TypeRef::Chan { elem, .. } => elem.walk(visit),
            TypeRef::Map { key, value } => {
                key.walk(visit);
                value.walk(visit);
            }
            TypeRef::Struct { fields } => {
                for field in fields {
                    field.ty.walk(visit);
                }
            }
            TypeRef::Interface { methods, embeds } => {
                for method in methods {
                    for t in method.params.iter().chain(method.results.iter()) {
                        t.walk(visit);
                    }
                }
                for t in embeds {
                    t.walk(visit);
                }
            }
            TypeRef::Named { type_args, .. } => {
                for t in type_args {
                    t.walk(visit);
                }
            }
            TypeRef::Signature {
                params, results, ..
            } => {
                for t in params.iter().chain(results.iter()) {
                    t.walk(visit);
                }
            }
        }
    }
}
