use crosswalk_core::{CrosswalkConfig, CrosswalkError, CrosswalkReport, Indices, run_crosswalk};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_with(error: CrosswalkError) -> ! {
    eprintln!("error: {error}");
    std::process::exit(1);
}

pub fn load_config_or_exit(path: Option<&Path>, overrides: CrosswalkConfig) -> CrosswalkConfig {
    CrosswalkConfig::discover(path)
        .unwrap_or_else(|e| exit_with(e))
        .merged_with(overrides)
}

pub fn load_indices_or_exit(config: &CrosswalkConfig) -> Indices {
    Indices::load(config).unwrap_or_else(|e| exit_with(e))
}

pub fn crosswalk_or_exit(config: &CrosswalkConfig) -> CrosswalkReport {
    run_crosswalk(config).unwrap_or_else(|e| exit_with(e))
}

pub fn write_mapping_or_exit(report: &CrosswalkReport, dir: &Path) -> PathBuf {
    crosswalk_core::write_mapping_csv_file(report, dir).unwrap_or_else(|e| exit_with(e))
}
