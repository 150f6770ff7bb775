//! Harness generation runner.
//!
//! Emits one artifact per includable package, then writes the artifacts, the
//! `fuzzable.txt` manifest and an optional JSON summary. Packages are emitted
//! in parallel; results are collected in model order so output is identical
//! across runs.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use nosy_package_extractor::ExtractedModel;
use nosy_types::PackageDescriptor;

use crate::config::HarnessConfig;
use crate::harness::{HarnessEmitter, PackageHarness, SkipReason, TargetRegistry};
use crate::utils::{short_hash, strip_module_prefix, write_json};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub repo_root: PathBuf,
    /// Manifest location; defaults to `<repo_root>/<manifest_file_name>`.
    pub manifest: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
    /// Emit and report without writing artifacts or the manifest.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    Generated,
    /// Every target was skipped.
    Failed,
    /// Ignored by config or no includable function.
    Excluded,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    pub import_path: String,
    pub status: PackageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    pub wrappers: Vec<String>,
    pub skipped: Vec<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<SkipReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub packages: Vec<PackageSummary>,
    pub emitted: usize,
    pub skipped: usize,
    pub generated_packages: usize,
    pub failed_packages: usize,
    pub excluded_packages: usize,
    pub manifest: PathBuf,
    pub dry_run: bool,
}

/// Directory a package's harness file is written to.
///
/// The package's recorded `dir` wins (relative dirs are joined to the repo
/// root); otherwise the import path minus the module declaration.
pub fn harness_directory(pkg: &PackageDescriptor, config: &HarnessConfig, repo_root: &Path) -> PathBuf {
    match &pkg.dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => repo_root.join(dir),
        None => {
            let rel = strip_module_prefix(pkg.import_path(), &config.module_declaration);
            if rel.is_empty() {
                repo_root.to_path_buf()
            } else {
                repo_root.join(rel)
            }
        }
    }
}

/// Artifact file name for a package.
pub fn harness_file_name(pkg: &PackageDescriptor, config: &HarnessConfig) -> String {
    if config.unique_harness_file_names {
        format!(
            "Nosy_fuzz_{}_{}_test.go",
            pkg.name(),
            short_hash(pkg.import_path())
        )
    } else {
        config.harness_file_name.clone()
    }
}

/// Emit harnesses for every includable package, in model order.
///
/// Writes nothing; see [`run`].
pub fn generate(
    config: &HarnessConfig,
    model: &ExtractedModel,
    repo_root: &Path,
) -> Vec<Option<PackageHarness>> {
    let emitter = HarnessEmitter::new(config, &model.universe);
    model
        .packages
        .par_iter()
        .map(|pkg| {
            if !emitter.filter().package_is_includable(pkg) {
                debug!("excluding package {}", pkg.import_path());
                return None;
            }
            let destination = harness_directory(pkg, config, repo_root);
            let file_name = harness_file_name(pkg, config);
            Some(emitter.emit_package(pkg, &destination, &file_name))
        })
        .collect()
}

/// Full run: generate, write artifacts, manifest and optional summary.
pub fn run(config: &HarnessConfig, model: &ExtractedModel, options: &RunOptions) -> Result<RunSummary> {
    info!(
        "generating harnesses for {} packages ({} targets, {} constructors)",
        model.packages.len(),
        model.function_count(),
        model.constructor_count()
    );

    let harnesses = generate(config, model, &options.repo_root);

    let mut registry = TargetRegistry::new();
    let mut packages = Vec::with_capacity(harnesses.len());
    for (pkg, harness) in model.packages.iter().zip(harnesses) {
        let Some(harness) = harness else {
            packages.push(PackageSummary {
                import_path: pkg.import_path().to_string(),
                status: PackageStatus::Excluded,
                artifact: None,
                wrappers: Vec::new(),
                skipped: Vec::new(),
                failure: None,
            });
            continue;
        };

        let artifact = match &harness.source {
            Some(source) => {
                let path = harness.path();
                if !options.dry_run {
                    write_artifact(&path, source)?;
                }
                info!("created {}", path.display());
                registry.extend(harness.records.iter().cloned());
                Some(path)
            }
            None => {
                match &harness.failure {
                    Some(reason) => warn!("error, skipping {}: {}", pkg.import_path(), reason),
                    None => warn!("error, skipping {}: no targets", pkg.import_path()),
                }
                None
            }
        };

        packages.push(PackageSummary {
            import_path: pkg.import_path().to_string(),
            status: if artifact.is_some() {
                PackageStatus::Generated
            } else {
                PackageStatus::Failed
            },
            artifact,
            wrappers: harness
                .outcomes
                .iter()
                .filter_map(|o| o.wrapper().map(str::to_string))
                .collect(),
            skipped: harness
                .outcomes
                .iter()
                .filter_map(|o| o.skip_reason().cloned())
                .collect(),
            failure: harness.failure.clone(),
        });
    }

    let manifest = options
        .manifest
        .clone()
        .unwrap_or_else(|| options.repo_root.join(&config.manifest_file_name));
    if !options.dry_run {
        registry.write_manifest(&manifest)?;
    }
    info!("{} fuzz targets listed in {}", registry.len(), manifest.display());

    let count = |status: PackageStatus| packages.iter().filter(|p| p.status == status).count();
    let summary = RunSummary {
        emitted: registry.len(),
        skipped: packages.iter().map(|p| p.skipped.len()).sum(),
        generated_packages: count(PackageStatus::Generated),
        failed_packages: count(PackageStatus::Failed),
        excluded_packages: count(PackageStatus::Excluded),
        manifest,
        dry_run: options.dry_run,
        packages,
    };

    if let Some(path) = &options.summary_json {
        write_json(path, &summary)
            .with_context(|| format!("write run summary {}", path.display()))?;
    }

    Ok(summary)
}

fn write_artifact(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, source).with_context(|| format!("write harness {}", path.display()))
}
