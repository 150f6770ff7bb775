//! Nosy Package Extractor
//!
//! Package interface extraction from Go type models.
//!
//! A Go-side loader (built on `golang.org/x/tools/go/packages`) dumps every
//! declared function and method of a repository as JSON. This crate reads that
//! dump, assigns variable identities, builds the [`TypeUniverse`] of named
//! types, and partitions each package's declarations into constructors and
//! ordinary fuzz targets.
//!
//! # Example
//!
//! ```ignore
//! use nosy_package_extractor::{extract_packages, read_type_model};
//!
//! let model = read_type_model(Path::new("type_model.json"))?;
//! let extracted = extract_packages(model)?;
//! for pkg in &extracted.packages {
//!     println!("{}: {} targets", pkg.import_path(), pkg.functions.len());
//! }
//! ```
//!
//! [`TypeUniverse`]: nosy_types::TypeUniverse

pub mod classifier;
pub mod extract;
pub mod types;

// Re-export main entry points
pub use classifier::{classify, constructor_result, ConstructorResult};
pub use extract::{extract_packages, parse_type_model, read_type_model, ExtractedModel};
pub use types::{DeclarationJson, PackageJson, TypeModelJson};
