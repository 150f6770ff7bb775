//! Target registry and the `fuzzable.txt` manifest.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One emitted wrapper and the directory its harness file lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuzzTargetRecord {
    pub harness_name: String,
    pub destination: PathBuf,
}

impl FuzzTargetRecord {
    pub fn new(harness_name: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            harness_name: harness_name.into(),
            destination: destination.into(),
        }
    }
}

/// Append-only list of emitted targets for one run.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    records: Vec<FuzzTargetRecord>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FuzzTargetRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = FuzzTargetRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[FuzzTargetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Alternating harness-name and destination lines, newline terminated.
    pub fn to_manifest(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.harness_name);
            out.push('\n');
            out.push_str(&record.destination.display().to_string());
            out.push('\n');
        }
        out
    }

    pub fn write_manifest(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create manifest dir {}", parent.display()))?;
        }
        fs::write(path, self.to_manifest())
            .with_context(|| format!("write manifest {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_alternates_name_and_dir() {
        let mut registry = TargetRegistry::new();
        registry.push(FuzzTargetRecord::new("Fuzz_Nosy_F__", "/repo/demo"));
        registry.extend(vec![FuzzTargetRecord::new(
            "Fuzz_Nosy_T_M__",
            "/repo/demo",
        )]);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.to_manifest(),
            "Fuzz_Nosy_F__\n/repo/demo\nFuzz_Nosy_T_M__\n/repo/demo\n"
        );
    }

    #[test]
    fn test_empty_manifest() {
        let registry = TargetRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.to_manifest(), "");
    }

    #[test]
    fn test_write_manifest_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("fuzzable.txt");
        let mut registry = TargetRegistry::new();
        registry.push(FuzzTargetRecord::new("Fuzz_Nosy_F__", "demo"));
        registry.write_manifest(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Fuzz_Nosy_F__\ndemo\n");
    }
}
