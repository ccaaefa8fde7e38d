use crate::support::load_indices_or_exit;
use crosswalk_core::CrosswalkConfig;
use serde_json::json;

pub fn run(config: CrosswalkConfig, json_output: bool) {
    let indices = load_indices_or_exit(&config);
    let summaries = indices.framework_summaries();
    let controls_path = config.effective_controls_export();

    if json_output {
        let payload = json!({
            "controlsExport": controls_path.display().to_string(),
            "criteriaCount": indices.criteria.len(),
            "frameworks": summaries,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("crosswalk frameworks");
        println!("  Source: {}", controls_path.display());
        println!("  SOC criteria: {}", indices.criteria.len());
        for summary in &summaries {
            println!(
                "  - {} (controls={}, evidence_tasks={})",
                summary.label, summary.control_count, summary.evidence_task_count
            );
        }
    }
}
