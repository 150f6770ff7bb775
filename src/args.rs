use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Type model JSON produced by the Go-side package loader.
    #[arg(long, value_name = "PATH")]
    pub type_model: PathBuf,

    /// Target configuration (YAML). Defaults apply when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root of the target repository; harness directories and the manifest are resolved against it.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo_root: PathBuf,

    /// Where to write the manifest (defaults to `<repo-root>/<manifest_file_name>`).
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Write a JSON run summary (per-package artifacts, wrappers and skip reasons).
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<PathBuf>,

    /// Generate and report, but write no harness files or manifest.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
