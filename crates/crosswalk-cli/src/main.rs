//! Crosswalk CLI: the `crosswalk` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Map {
            exports,
            framework,
            output_dir,
            dedup,
            no_dedup,
            no_csv,
            json,
        } => {
            let mut overrides = exports.into_overrides();
            overrides.framework = framework;
            overrides.output_dir = output_dir;
            overrides.dedup_evidence_tasks = cli::dedup_override(dedup, no_dedup);
            let config = support::load_config_or_exit(config_path, overrides);
            commands::map::run(commands::map::Args {
                config,
                no_csv,
                json,
            })
        }

        Commands::Frameworks { exports, json } => {
            let config = support::load_config_or_exit(config_path, exports.into_overrides());
            commands::frameworks::run(config, json)
        }
    }
}
