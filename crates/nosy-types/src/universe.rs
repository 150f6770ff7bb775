//! Named-type resolution.
//!
//! Go's `types.Named.Underlying()` is answered here from declaration tables
//! supplied by the type model. Missing entries are not errors: callers treat
//! an unresolved named type as opaque.

use std::collections::BTreeMap;

use crate::type_ref::{BasicKind, Method, PackageRef, TypeRef};

/// Guards against declaration tables that map a named type to another named type in a loop.
const MAX_NAMED_DEPTH: usize = 16;

/// Table of named types keyed by `path.Name` (or `Name` when predeclared).
#[derive(Debug, Clone)]
pub struct TypeUniverse {
    named: BTreeMap<String, TypeRef>,
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeUniverse {
    /// A universe holding only the predeclared `error` and `any`.
    pub fn new() -> Self {
        let mut named = BTreeMap::new();
        named.insert(
            "error".to_string(),
            TypeRef::Interface {
                methods: vec![Method {
                    name: "Error".to_string(),
                    params: Vec::new(),
                    results: vec![TypeRef::basic(BasicKind::String)],
                    variadic: false,
                }],
                embeds: Vec::new(),
            },
        );
        named.insert("any".to_string(), TypeRef::empty_interface());
        Self { named }
    }

    /// Record the underlying type of `package.name`.
    pub fn declare(&mut self, package: &PackageRef, name: &str, underlying: TypeRef) {
        self.insert(format!("{}.{}", package.path, name), underlying);
    }

    /// Record the underlying type under an already qualified key.
    pub fn insert(&mut self, qualified: impl Into<String>, underlying: TypeRef) {
        self.named.insert(qualified.into(), underlying);
    }

    /// Underlying shape of `ty`.
    ///
    /// Non-named types are their own underlying type. Returns `None` for a
    /// named type with no declaration in the universe.
    pub fn underlying<'a>(&'a self, ty: &'a TypeRef) -> Option<&'a TypeRef> {
        let mut current = ty;
        for _ in 0..MAX_NAMED_DEPTH {
            match current.qualified_name() {
                Some(key) => current = self.named.get(&key)?,
                None => return Some(current),
            }
        }
        None
    }

    /// True when `ty` is, or is declared as, an interface type.
    pub fn is_interface(&self, ty: &TypeRef) -> bool {
        matches!(self.underlying(ty), Some(TypeRef::Interface { .. }))
    }
}
