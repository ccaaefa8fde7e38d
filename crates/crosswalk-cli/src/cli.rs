use clap::{Args, Parser, Subcommand};
use crosswalk_core::CrosswalkConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "crosswalk",
    about = "Crosswalk: map SOC 2 criteria onto another framework's controls via shared evidence tasks",
    version
)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./crosswalk.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print which framework controls each SOC criterion satisfies and write the mapping CSV
    Map {
        #[command(flatten)]
        exports: ExportArgs,

        /// Target framework label, e.g. "ISO 27001:2013"
        #[arg(long)]
        framework: Option<String>,

        /// Directory for `SOC 2 _<framework>mapping.csv`
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Attach each evidence task to a control at most once
        #[arg(long, conflicts_with = "no_dedup")]
        dedup: bool,

        /// Keep repeated evidence-task references (overrides the config file)
        #[arg(long)]
        no_dedup: bool,

        /// Skip writing the mapping CSV
        #[arg(long)]
        no_csv: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List frameworks found in the controls export
    Frameworks {
        #[command(flatten)]
        exports: ExportArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Input exports and SOC indexing knobs shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Path to the controls export CSV
    #[arg(long)]
    pub controls: Option<PathBuf>,

    /// Path to the evidence-task export CSV
    #[arg(long)]
    pub evidence_tasks: Option<PathBuf>,

    /// Framework membership that marks SOC controls
    #[arg(long)]
    pub soc_framework: Option<String>,

    /// Classification-code prefix excluded from SOC criteria
    #[arg(long)]
    pub annex_prefix: Option<String>,
}

/// `--dedup` / `--no-dedup` as a config override.
pub fn dedup_override(dedup: bool, no_dedup: bool) -> Option<bool> {
    match (dedup, no_dedup) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl ExportArgs {
    /// Flags as config overrides; unset flags leave the config untouched.
    pub fn into_overrides(self) -> CrosswalkConfig {
        CrosswalkConfig {
            controls_export: self.controls,
            evidence_tasks_export: self.evidence_tasks,
            soc_framework: self.soc_framework,
            annex_prefix: self.annex_prefix,
            ..CrosswalkConfig::default()
        }
    }
}
