//! Type-model loading and descriptor extraction.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use nosy_types::{FunctionDescriptor, PackageDescriptor, PackageRef, TypeRef, TypeUniverse};
use tracing::{debug, warn};

use crate::classifier::classify;
use crate::types::{DeclarationJson, PackageJson, TypeModelJson, TYPE_MODEL_SCHEMA_VERSION};

/// Descriptors for every package in a type model, plus the named-type table
/// needed to look through them.
#[derive(Debug, Clone)]
pub struct ExtractedModel {
    /// Packages in the order the model lists them.
    pub packages: Vec<PackageDescriptor>,
    pub universe: TypeUniverse,
}

impl ExtractedModel {
    pub fn function_count(&self) -> usize {
        self.packages.iter().map(|p| p.functions.len()).sum()
    }

    pub fn constructor_count(&self) -> usize {
        self.packages.iter().map(|p| p.constructors.len()).sum()
    }
}

/// Read and parse a type-model JSON file.
pub fn read_type_model(path: &Path) -> Result<TypeModelJson> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read type model {}", path.display()))?;
    parse_type_model(&raw).with_context(|| format!("parse type model {}", path.display()))
}

/// Parse a type model from a JSON string.
pub fn parse_type_model(raw: &str) -> Result<TypeModelJson> {
    let model: TypeModelJson = serde_json::from_str(raw).context("invalid type model JSON")?;
    if model.schema_version > TYPE_MODEL_SCHEMA_VERSION {
        bail!(
            "unsupported type model schema version {} (max {})",
            model.schema_version,
            TYPE_MODEL_SCHEMA_VERSION
        );
    }
    Ok(model)
}

/// Build package descriptors and the type universe from a parsed model.
pub fn extract_packages(model: TypeModelJson) -> Result<ExtractedModel> {
    let mut universe = TypeUniverse::new();
    for (qualified, underlying) in model.external_types {
        universe.insert(qualified, underlying);
    }

    let mut packages = Vec::with_capacity(model.packages.len());
    for pkg in model.packages {
        let import_path = pkg.import_path.clone();
        let descriptor = extract_package(pkg, &mut universe)
            .with_context(|| format!("extract package {}", import_path))?;
        packages.push(descriptor);
    }

    Ok(ExtractedModel { packages, universe })
}

fn extract_package(pkg: PackageJson, universe: &mut TypeUniverse) -> Result<PackageDescriptor> {
    if pkg.name.is_empty() {
        bail!("package has no name");
    }
    if pkg.import_path.is_empty() {
        bail!("package {} has no import path", pkg.name);
    }

    let package = PackageRef::new(pkg.import_path, pkg.name);
    for (name, underlying) in pkg.types {
        universe.declare(&package, &name, underlying);
    }

    let mut descriptor = PackageDescriptor::new(package.clone());
    descriptor.dir = pkg.dir;

    for decl in pkg.declarations {
        let function = function_from_declaration(&package, decl)?;
        debug!(
            "{} classified as {:?}",
            function.qualified_name(),
            function.role
        );
        descriptor.add(function);
    }

    if descriptor.functions.is_empty() {
        warn!("package {} declares no ordinary functions", package.path);
    }

    Ok(descriptor)
}

fn function_from_declaration(
    package: &PackageRef,
    decl: DeclarationJson,
) -> Result<FunctionDescriptor> {
    if decl.name.is_empty() {
        return Err(anyhow!("declaration without a name"));
    }
    let ends_with_slice = matches!(
        decl.params.last().map(|p| &p.ty),
        Some(TypeRef::Slice { .. })
    );
    if decl.variadic && !ends_with_slice {
        bail!(
            "{}: variadic declaration must end with a slice parameter",
            decl.name
        );
    }

    let mut function = FunctionDescriptor::new(package, decl.name)
        .with_params(decl.params)
        .with_results(decl.results)
        .with_variadic(decl.variadic);
    function.receiver = decl.receiver;
    let role = classify(&function);
    Ok(function.with_role(role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosy_types::{BasicKind, FunctionRole};
    use std::io::Write;

    const DEMO: &str = r#"{
        "packages": [{
            "name": "demo",
            "import_path": "example.com/demo",
            "dir": "demo",
            "types": {
                "T": {"kind": "struct", "fields": []},
                "Celsius": {"kind": "basic", "basic": "float64"}
            },
            "declarations": [
                {
                    "name": "NewT",
                    "results": [{"type": {"kind": "pointer", "elem": {"kind": "named", "package": {"path": "example.com/demo", "name": "demo"}, "name": "T"}}}]
                },
                {
                    "name": "M",
                    "receiver": {"name": "t", "type": {"kind": "pointer", "elem": {"kind": "named", "package": {"path": "example.com/demo", "name": "demo"}, "name": "T"}}},
                    "params": [{"name": "x", "type": {"kind": "basic", "basic": "int"}}]
                },
                {
                    "name": "Join",
                    "params": [{"name": "parts", "type": {"kind": "slice", "elem": {"kind": "basic", "basic": "string"}}}],
                    "results": [{"type": {"kind": "basic", "basic": "string"}}],
                    "variadic": true
                }
            ]
        }],
        "external_types": {"io.Reader": {"kind": "interface", "methods": []}}
    }"#;

    #[test]
    fn test_extract_partitions_by_role() {
        let model = parse_type_model(DEMO).unwrap();
        let extracted = extract_packages(model).unwrap();

        assert_eq!(extracted.packages.len(), 1);
        let pkg = &extracted.packages[0];
        assert_eq!(pkg.name(), "demo");
        assert_eq!(pkg.dir.as_deref(), Some(Path::new("demo")));
        assert_eq!(extracted.constructor_count(), 1);
        assert_eq!(extracted.function_count(), 2);
        assert_eq!(pkg.constructors[0].role, FunctionRole::Constructor);
        assert!(pkg.functions.iter().any(|f| f.name == "Join" && f.variadic));
    }

    #[test]
    fn test_extract_builds_universe() {
        let extracted = extract_packages(parse_type_model(DEMO).unwrap()).unwrap();
        let demo = PackageRef::new("example.com/demo", "demo");
        let celsius = TypeRef::named(&demo, "Celsius");
        assert_eq!(
            extracted.universe.underlying(&celsius),
            Some(&TypeRef::basic(BasicKind::Float64))
        );
        assert!(extracted
            .universe
            .is_interface(&TypeRef::named(&PackageRef::new("io", "io"), "Reader")));
    }

    #[test]
    fn test_variadic_without_slice_is_rejected() {
        let raw = r#"{"packages": [{
            "name": "demo",
            "import_path": "example.com/demo",
            "declarations": [{
                "name": "Bad",
                "params": [{"name": "n", "type": {"kind": "basic", "basic": "int"}}],
                "variadic": true
            }]
        }]}"#;
        let err = extract_packages(parse_type_model(raw).unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("variadic"));
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let err = parse_type_model(r#"{"schema_version": 99, "packages": []}"#).unwrap_err();
        assert!(err.to_string().contains("schema version"));
    }

    #[test]
    fn test_read_type_model_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEMO.as_bytes()).unwrap();

        let model = read_type_model(file.path()).unwrap();
        assert_eq!(model.packages.len(), 1);
        assert_eq!(model.packages[0].declarations.len(), 3);
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let err = read_type_model(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }
}
