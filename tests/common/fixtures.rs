//! Fixture loading utilities for tests.

use std::path::{Path, PathBuf};

use nosy_neighbor::config::HarnessConfig;
use nosy_package_extractor::{extract_packages, read_type_model, ExtractedModel};

/// Type model with four packages:
///
/// - `store`: constructor `NewT`, methods `Get`/`Put`, `Join`, `Init`, `Apply`
/// - `cache`: `(*Cache).Evict` with no constructor, recorded dir `pkg/cache`
/// - `broken`: only a parameterless `Reset`
/// - `internal/testdata/fixtures`: ignored by [`fixture_config`]
pub const DEMO_MODEL: &str = "tests/fixtures/demo_model.json";

pub fn demo_model_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEMO_MODEL)
}

/// # Panics
///
/// Panics if the fixture is missing or malformed.
pub fn load_demo_model() -> ExtractedModel {
    let model = read_type_model(&demo_model_path()).expect("demo model should parse");
    extract_packages(model).expect("demo model should extract")
}

/// Config matching the fixture's module layout.
pub fn fixture_config() -> HarnessConfig {
    HarnessConfig::from_yaml(
        "target_mod_self_declaration: example.com/acme\nignore_packages: [testdata]\n",
    )
    .expect("fixture config should parse")
}
