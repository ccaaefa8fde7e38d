use crate::support::{crosswalk_or_exit, write_mapping_or_exit};
use crosswalk_core::{CrosswalkConfig, mapping_file_name, render_console};
use serde_json::json;

pub struct Args {
    pub config: CrosswalkConfig,
    pub no_csv: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let Args {
        config,
        no_csv,
        json: json_output,
    } = args;

    let report = crosswalk_or_exit(&config);
    let output_dir = config.effective_output_dir();
    let csv_path = (!no_csv).then(|| output_dir.join(mapping_file_name(&report.framework)));

    // Report goes out before the CSV is written.
    if json_output {
        let payload = json!({
            "controlsExport": config.effective_controls_export().display().to_string(),
            "evidenceTasksExport": config.effective_evidence_tasks_export().display().to_string(),
            "csvPath": csv_path.as_ref().map(|p| p.display().to_string()),
            "report": report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        print!("{}", render_console(&report));
    }

    if csv_path.is_some() {
        let written = write_mapping_or_exit(&report, &output_dir);
        eprintln!("wrote {}", written.display());
    }
}
