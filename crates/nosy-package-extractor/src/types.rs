use nosy_types::{TypeRef, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Current type-model schema version.
pub const TYPE_MODEL_SCHEMA_VERSION: u64 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct TypeModelJson {
    #[serde(default = "default_schema_version")]
    pub schema_version: u64,
    pub packages: Vec<PackageJson>,
    /// Named types declared outside the analyzed packages, keyed by `path.Name`.
    #[serde(default)]
    pub external_types: BTreeMap<String, TypeRef>,
}

fn default_schema_version() -> u64 {
    TYPE_MODEL_SCHEMA_VERSION
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PackageJson {
    pub name: String,
    pub import_path: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Named types declared by this package, keyed by local name.
    #[serde(default)]
    pub types: BTreeMap<String, TypeRef>,
    #[serde(default)]
    pub declarations: Vec<DeclarationJson>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeclarationJson {
    pub name: String,
    #[serde(default)]
    pub receiver: Option<Variable>,
    #[serde(default)]
    pub params: Vec<Variable>,
    #[serde(default)]
    pub results: Vec<Variable>,
    #[serde(default)]
    pub variadic: bool,
}
