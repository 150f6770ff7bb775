//! Fuzz harness synthesis.
//!
//! For each package the pipeline is:
//!
//! 1. [`filter`]: drop ignored packages, functions and parameter types
//! 2. [`fuzzability`]: rate each target's parameters (native / fill / unsupported)
//! 3. [`constructor_map`]: replace method receivers with constructor calls
//! 4. [`naming`]: pick collision-free parameter identifiers
//! 5. [`emitter`]: write the wrapper source and a record per wrapper
//! 6. [`registry`]: collect records into the `fuzzable.txt` manifest
//!
//! [`imports`] tracks the packages a generated file needs; [`errors`] holds
//! the per-target skip taxonomy.

pub mod constructor_map;
pub mod emitter;
pub mod errors;
pub mod filter;
pub mod fuzzability;
pub mod imports;
pub mod naming;
pub mod registry;

pub use constructor_map::{ConstructorMap, ConstructorMatch};
pub use emitter::{HarnessEmitter, PackageHarness};
pub use errors::{SkipReason, TargetOutcome};
pub use filter::TargetFilter;
pub use fuzzability::{FuzzabilityAnalyzer, ParamSupport, SupportReport};
pub use imports::ImportSet;
pub use naming::{NameResolver, ReservedNames};
pub use registry::{FuzzTargetRecord, TargetRegistry};
