//! Shared types for the nosy-neighbor workspace.
//!
//! This crate provides the Go type model consumed by the harness generator:
//!
//! - [`type_ref`]: the closed [`TypeRef`] variant describing a Go type's shape
//! - [`render`]: Go-syntax type strings with pluggable package qualification
//! - [`universe`]: resolution of named types to their underlying shapes
//! - [`descriptor`]: function, variable and package descriptors
//!
//! Everything here is plain data. Classification and code generation live in
//! the crates that consume it.

pub mod descriptor;
pub mod render;
pub mod type_ref;
pub mod universe;

// Re-export commonly used types at crate root
pub use descriptor::{FunctionDescriptor, FunctionRole, PackageDescriptor, VarId, Variable};
pub use render::{FullPath, PackageName, Qualifier};
pub use type_ref::{BasicKind, ChanDir, Field, Method, PackageRef, TypeRef};
pub use universe::TypeUniverse;
