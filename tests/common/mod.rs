#![allow(dead_code, unused_imports)]
//! Shared test utilities for integration tests.
//!
//! - `fixtures`: the demo type model under `tests/fixtures`
//! - `builders`: in-memory packages and descriptors

pub mod builders;
pub mod fixtures;

pub use builders::{
    demo, function, int, method, model_of, package_of, param, string, t_ptr, universe,
};
pub use fixtures::{demo_model_path, fixture_config, load_demo_model, DEMO_MODEL};
