//! End-to-end run: read both exports, build and link both indices, compare.

use crate::config::CrosswalkConfig;
use crate::coverage::{CrosswalkReport, compare, evidence_task_set};
use crate::error::CrosswalkError;
use crate::export::{
    ControlRow, EvidenceTaskRow, read_control_export, read_evidence_task_export,
};
use crate::index::{
    ControlSet, CriteriaIndex, FrameworkIndex, build_criteria_index, build_framework_index,
};
use crate::link::{LinkOptions, link_criteria_evidence_tasks, link_framework_evidence_tasks};
use serde::Serialize;

/// Both linked indices for one pair of exports.
#[derive(Debug, Clone, Default)]
pub struct Indices {
    pub frameworks: FrameworkIndex,
    pub criteria: CriteriaIndex,
}

/// Per-framework counts, for choosing a target framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkSummary {
    pub label: String,
    pub control_count: usize,
    pub evidence_task_count: usize,
}

impl Indices {
    /// Run the four index stages over already-decoded rows.
    pub fn build(
        controls: &[ControlRow],
        tasks: &[EvidenceTaskRow],
        config: &CrosswalkConfig,
    ) -> Self {
        let soc_framework = config.effective_soc_framework();
        let options = LinkOptions {
            dedup: config.effective_dedup_evidence_tasks(),
        };

        let mut frameworks = build_framework_index(controls);
        link_framework_evidence_tasks(&mut frameworks, tasks, options);

        let mut criteria =
            build_criteria_index(controls, soc_framework, config.effective_annex_prefix());
        link_criteria_evidence_tasks(&mut criteria, tasks, soc_framework, options);

        Self {
            frameworks,
            criteria,
        }
    }

    /// Read the exports named by `config` and build both indices.
    pub fn load(config: &CrosswalkConfig) -> Result<Self, CrosswalkError> {
        let controls_path = config.effective_controls_export();
        let tasks_path = config.effective_evidence_tasks_export();

        let controls = read_control_export(&controls_path)?;
        tracing::info!(
            path = %controls_path.display(),
            rows = controls.len(),
            "read controls export"
        );
        let tasks = read_evidence_task_export(&tasks_path)?;
        tracing::info!(
            path = %tasks_path.display(),
            rows = tasks.len(),
            "read evidence-task export"
        );

        Ok(Self::build(&controls, &tasks, config))
    }

    /// Look up a framework record by label.
    pub fn framework(&self, label: &str) -> Result<&ControlSet, CrosswalkError> {
        self.frameworks
            .get(label)
            .ok_or_else(|| CrosswalkError::UnknownFramework {
                label: label.to_string(),
                available: self.framework_labels(),
            })
    }

    pub fn framework_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.frameworks.keys().cloned().collect();
        labels.sort();
        labels
    }

    /// One summary per framework, ordered by label.
    pub fn framework_summaries(&self) -> Vec<FrameworkSummary> {
        self.framework_labels()
            .into_iter()
            .map(|label| {
                let set = &self.frameworks[&label];
                FrameworkSummary {
                    control_count: set.len(),
                    evidence_task_count: evidence_task_set(set).len(),
                    label,
                }
            })
            .collect()
    }

    /// Compare the SOC criteria against the framework labelled `label`.
    pub fn crosswalk(&self, label: &str) -> Result<CrosswalkReport, CrosswalkError> {
        let framework = self.framework(label)?;
        Ok(compare(&self.criteria, framework))
    }
}

/// Load both exports and map the SOC criteria onto the configured framework.
pub fn run_crosswalk(config: &CrosswalkConfig) -> Result<CrosswalkReport, CrosswalkError> {
    let indices = Indices::load(config)?;
    indices.crosswalk(config.effective_framework())
}
