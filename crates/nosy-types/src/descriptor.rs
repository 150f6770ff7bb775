//! Function, variable and package descriptors.
//!
//! Descriptors are produced once per run by the type-model loader and are
//! read-only afterwards.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::render::FullPath;
use crate::type_ref::{PackageRef, TypeRef};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a declared variable (parameter, receiver or result).
///
/// Two variables with the same name and type are still different variables;
/// clones of one variable keep its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VarId(u64);

impl VarId {
    /// Allocate an identity never handed out before in this process.
    pub fn fresh() -> Self {
        VarId(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A parameter, receiver or result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Declared name; empty for anonymous variables.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(skip, default = "VarId::fresh")]
    pub id: VarId,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            id: VarId::fresh(),
        }
    }

    /// Empty or `_`: the variable cannot be referenced by name.
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty() || self.name == "_"
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

/// Role assigned by the function classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionRole {
    #[default]
    Ordinary,
    Constructor,
}

/// A declared function or method.
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    pub package: PackageRef,
    pub receiver: Option<Variable>,
    pub params: Vec<Variable>,
    pub results: Vec<Variable>,
    /// The last param is `[]T` and is declared `...T`.
    pub variadic: bool,
    pub role: FunctionRole,
}

impl FunctionDescriptor {
    /// A receiver-less, non-variadic function with no params or results.
    pub fn new(package: &PackageRef, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.clone(),
            receiver: None,
            params: Vec::new(),
            results: Vec::new(),
            variadic: false,
            role: FunctionRole::Ordinary,
        }
    }

    pub fn with_receiver(mut self, receiver: Variable) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_params(mut self, params: Vec<Variable>) -> Self {
        self.params = params;
        self
    }

    pub fn with_results(mut self, results: Vec<Variable>) -> Self {
        self.results = results;
        self
    }

    pub fn with_variadic(mut self, variadic: bool) -> Self {
        self.variadic = variadic;
        self
    }

    pub fn with_role(mut self, role: FunctionRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn is_constructor(&self) -> bool {
        self.role == FunctionRole::Constructor
    }

    /// `path.Name` for functions, `path.Recv.Name` for methods.
    pub fn qualified_name(&self) -> String {
        let recv_name = self
            .receiver
            .as_ref()
            .and_then(|r| r.ty.named_type())
            .and_then(|t| t.type_name());
        match recv_name {
            Some(recv) => format!("{}.{}.{}", self.package.path, recv, self.name),
            None => format!("{}.{}", self.package.path, self.name),
        }
    }

    /// Go's `types.Func.String()` form, e.g.
    /// `func (*example.com/demo.T).M(x []example.com/demo.S) error`.
    ///
    /// Used as the deterministic sort key for emission.
    pub fn signature_string(&self) -> String {
        let head = match &self.receiver {
            Some(recv) => format!("({}).{}", recv.ty.render(&mut FullPath), self.name),
            None => format!("{}.{}", self.package.path, self.name),
        };

        let last = self.params.len().saturating_sub(1);
        let params: Vec<String> = self
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let ty = match &p.ty {
                    TypeRef::Slice { elem } if self.variadic && i == last => {
                        format!("...{}", elem)
                    }
                    other => other.to_string(),
                };
                if p.name.is_empty() {
                    ty
                } else {
                    format!("{} {}", p.name, ty)
                }
            })
            .collect();

        let results = match self.results.len() {
            0 => String::new(),
            1 if self.results[0].name.is_empty() => format!(" {}", self.results[0].ty),
            _ => {
                let rs: Vec<String> = self
                    .results
                    .iter()
                    .map(|r| {
                        if r.name.is_empty() {
                            r.ty.to_string()
                        } else {
                            format!("{} {}", r.name, r.ty)
                        }
                    })
                    .collect();
                format!(" ({})", rs.join(", "))
            }
        };

        format!("func {}({}){}", head, params.join(", "), results)
    }
}

/// A package with its functions split by role.
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    pub package: PackageRef,
    /// Directory holding the package sources, if the model recorded one.
    pub dir: Option<PathBuf>,
    /// Ordinary functions and methods: the fuzz targets.
    pub functions: Vec<FunctionDescriptor>,
    /// Constructors: candidates for building method receivers.
    pub constructors: Vec<FunctionDescriptor>,
}

impl PackageDescriptor {
    pub fn new(package: PackageRef) -> Self {
        Self {
            package,
            dir: None,
            functions: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.package.name
    }

    pub fn import_path(&self) -> &str {
        &self.package.path
    }

    /// File a descriptor under `functions` or `constructors` by its role.
    pub fn add(&mut self, function: FunctionDescriptor) {
        match function.role {
            FunctionRole::Constructor => self.constructors.push(function),
            FunctionRole::Ordinary => self.functions.push(function),
        }
    }
}
