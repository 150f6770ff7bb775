//! Target configuration.
//!
//! The YAML schema is a superset of the target `config.yaml` used by the fuzz
//! campaign scripts: keys this tool does not act on (repository URL, branch,
//! Go version, fuzz time, ...) are accepted and ignored.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::harness::fuzzability::DEFAULT_SUPPORTED_INTERFACES;

pub const DEFAULT_HARNESS_FILE_NAME: &str = "Fuzz_Nosy_test.go";
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "fuzzable.txt";

/// Settings applied by the generated `GetTypeProvider` helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeSettings {
    /// `[min, max]` length of filled strings.
    pub string_bounds: [u32; 2],
    /// `[min, max]` length of filled slices.
    pub slice_bounds: [u32; 2],
    /// Fill biases passed to `SetParamsBiases`, each in `0..=1`.
    pub biases: [f32; 4],
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            string_bounds: [0, 1024],
            slice_bounds: [0, 4096],
            biases: [0.0; 4],
        }
    }
}

impl DecodeSettings {
    pub fn validate(&self) -> Result<()> {
        if self.string_bounds[0] > self.string_bounds[1] {
            bail!(
                "decode.string_bounds: min {} exceeds max {}",
                self.string_bounds[0],
                self.string_bounds[1]
            );
        }
        if self.slice_bounds[0] > self.slice_bounds[1] {
            bail!(
                "decode.slice_bounds: min {} exceeds max {}",
                self.slice_bounds[0],
                self.slice_bounds[1]
            );
        }
        if let Some(b) = self.biases.iter().find(|b| !(0.0..=1.0).contains(*b)) {
            bail!("decode.biases: {} is outside 0..=1", b);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Packages whose import path contains any of these substrings are skipped.
    pub ignore_packages: Vec<String>,
    /// `package.Function` names to skip.
    pub ignore_functions: Vec<String>,
    /// Named types (`path.Name` or `Name`) that exclude any function taking them.
    pub ignore_types: Vec<String>,
    /// Module path stripped from import paths to locate package directories.
    #[serde(rename = "target_mod_self_declaration")]
    pub module_declaration: String,
    /// Emit an external `<pkg>_test` package that imports and qualifies the target.
    pub qualify_all: bool,
    /// Identifiers added to the built-in reserved set.
    pub reserved_names: Vec<String>,
    /// Interface types a type provider can fill.
    pub supported_interfaces: Vec<String>,
    pub decode: DecodeSettings,
    /// Prepend a `// Code generated ... DO NOT EDIT.` line to artifacts.
    pub generated_header: bool,
    pub harness_file_name: String,
    /// Name artifacts `Nosy_fuzz_<pkg>_<hash>_test.go` instead of `harness_file_name`.
    pub unique_harness_file_names: bool,
    pub manifest_file_name: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            ignore_packages: Vec::new(),
            ignore_functions: Vec::new(),
            ignore_types: Vec::new(),
            module_declaration: String::new(),
            qualify_all: false,
            reserved_names: Vec::new(),
            supported_interfaces: DEFAULT_SUPPORTED_INTERFACES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            decode: DecodeSettings::default(),
            generated_header: false,
            harness_file_name: DEFAULT_HARNESS_FILE_NAME.to_string(),
            unique_harness_file_names: false,
            manifest_file_name: DEFAULT_MANIFEST_FILE_NAME.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config =
            Self::from_yaml(&raw).with_context(|| format!("parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.decode.validate()?;
        if self.harness_file_name.is_empty() {
            bail!("harness_file_name must not be empty");
        }
        if !self.harness_file_name.ends_with("_test.go") {
            bail!(
                "harness_file_name {:?} must end in _test.go",
                self.harness_file_name
            );
        }
        if self.manifest_file_name.is_empty() {
            bail!("manifest_file_name must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.harness_file_name, "Fuzz_Nosy_test.go");
        assert_eq!(config.manifest_file_name, "fuzzable.txt");
        assert!(config
            .supported_interfaces
            .iter()
            .any(|s| s == "io.Reader"));
        assert_eq!(config.decode.slice_bounds, [0, 4096]);
        assert!(!config.qualify_all);
    }

    #[test]
    fn test_campaign_config_keys_are_ignored() {
        let raw = r#"
target_repo_name: prysm
target_repo_url: https://github.com/prysmaticlabs/prysm
target_repo_branch: develop
target_repo_import_prefix: github.com/prysmaticlabs/prysm
target_mod_self_declaration: github.com/prysmaticlabs/prysm/v4
go_version: "1.20"
harness_gen_deps: []
ignore_packages:
  - testing
  - mock
ignore_functions:
  - db.Open
seconds_per_target_function: 30
"#;
        let config = HarnessConfig::from_yaml(raw).unwrap();
        assert_eq!(config.module_declaration, "github.com/prysmaticlabs/prysm/v4");
        assert_eq!(config.ignore_packages, vec!["testing", "mock"]);
        assert_eq!(config.ignore_functions, vec!["db.Open"]);
        assert_eq!(config.decode, DecodeSettings::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(HarnessConfig::from_yaml("").unwrap(), HarnessConfig::default());
    }

    #[test]
    fn test_partial_decode_settings() {
        let raw = "decode:\n  string_bounds: [1, 64]\n";
        let config = HarnessConfig::from_yaml(raw).unwrap();
        assert_eq!(config.decode.string_bounds, [1, 64]);
        assert_eq!(config.decode.slice_bounds, [0, 4096]);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let err = HarnessConfig::from_yaml("decode:\n  slice_bounds: [10, 1]\n").unwrap_err();
        assert!(err.to_string().contains("slice_bounds"));

        let err = HarnessConfig::from_yaml("decode:\n  biases: [0, 0, 2, 0]\n").unwrap_err();
        assert!(err.to_string().contains("biases"));

        let err = HarnessConfig::from_yaml("harness_file_name: fuzz.go\n").unwrap_err();
        assert!(err.to_string().contains("_test.go"));
    }

    #[test]
    fn test_load_reports_path() {
        let err = HarnessConfig::load(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/config.yaml"));
    }
}
