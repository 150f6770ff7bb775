//! Nosy Neighbor
//!
//! Automatic fuzz harness synthesis for Go repositories:
//!
//! - **Discovery**: every function and method in a type model is a candidate target
//! - **Fuzzability**: parameters are rated for native `testing.F` support or byte-stream filling
//! - **Constructor injection**: method receivers are built by matching constructors
//! - **Emission**: one `Fuzz_Nosy_*` wrapper per target, plus a `fuzzable.txt` manifest
//!
//! The type model is produced by a Go-side loader and read with
//! [`nosy_package_extractor`]. See [`harness`] for the synthesis pipeline and
//! [`runner`] for a full run.

pub mod args;
pub mod config;
pub mod harness;
pub mod runner;
pub mod utils;
