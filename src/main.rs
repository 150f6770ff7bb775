use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nosy_neighbor::args::Args;
use nosy_neighbor::config::HarnessConfig;
use nosy_neighbor::runner::{self, RunOptions};
use nosy_package_extractor::{extract_packages, read_type_model};

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };

    let model = extract_packages(read_type_model(&args.type_model)?)?;

    let options = RunOptions {
        repo_root: args.repo_root.clone(),
        manifest: args.manifest.clone(),
        summary_json: args.summary_json.clone(),
        dry_run: args.dry_run,
    };
    let summary = runner::run(&config, &model, &options)?;

    info!(
        "done: {} wrappers emitted, {} targets skipped, {} packages generated, {} failed, {} excluded",
        summary.emitted,
        summary.skipped,
        summary.generated_packages,
        summary.failed_packages,
        summary.excluded_packages
    );
    Ok(())
}
