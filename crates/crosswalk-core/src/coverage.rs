//! Evidence-task coverage and the criterion-by-criterion comparison.
//!
//! A target-framework control is satisfied by a criterion when every
//! evidence task attached to the control also appears somewhere in the
//! criterion. A control with no evidence tasks is satisfied by every
//! criterion; such controls are listed in
//! [`CrosswalkReport::unevidenced_controls`].

use crate::index::{ControlSet, CriteriaIndex, EvidenceTaskId};
use serde::Serialize;
use std::collections::BTreeSet;

/// Union of the evidence-task ids across all controls of `set`, sorted and
/// deduplicated.
pub fn evidence_task_set(set: &ControlSet) -> Vec<EvidenceTaskId> {
    set.controls
        .values()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whether every id in `control_tasks` is present in `covered`.
///
/// `covered` must be sorted, as returned by [`evidence_task_set`].
pub fn is_satisfied(control_tasks: &[EvidenceTaskId], covered: &[EvidenceTaskId]) -> bool {
    control_tasks
        .iter()
        .all(|task| covered.binary_search(task).is_ok())
}

/// Controls of `framework` satisfied by a criterion whose evidence-task set
/// is `covered`, in lexicographic order.
pub fn satisfied_controls(covered: &[EvidenceTaskId], framework: &ControlSet) -> Vec<String> {
    let mut controls: Vec<String> = framework
        .controls
        .iter()
        .filter(|(_, tasks)| is_satisfied(tasks, covered))
        .map(|(name, _)| name.clone())
        .collect();
    controls.sort();
    controls
}

/// One criterion's row in the crosswalk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionMapping {
    pub criterion: String,
    /// Every SOC control under the criterion.
    pub soc_controls: Vec<String>,
    /// Evidence-task union of the criterion.
    pub evidence_tasks: Vec<EvidenceTaskId>,
    /// Target-framework controls satisfied by the criterion.
    pub satisfied_controls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosswalkSummary {
    pub criteria_count: usize,
    pub framework_control_count: usize,
    /// Evidence-task ids attached across the framework's controls, counting
    /// repeated references.
    pub evidence_link_count: usize,
    pub criteria_with_matches: usize,
    pub unevidenced_control_count: usize,
}

/// SOC criteria mapped onto one target framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosswalkReport {
    pub framework: String,
    /// Ordered by criterion code.
    pub criteria: Vec<CriterionMapping>,
    /// Framework controls with no evidence tasks. These are satisfied by
    /// every criterion.
    pub unevidenced_controls: Vec<String>,
    pub summary: CrosswalkSummary,
}

/// Compare every criterion in `criteria` against `framework`.
pub fn compare(criteria: &CriteriaIndex, framework: &ControlSet) -> CrosswalkReport {
    let mut codes: Vec<&String> = criteria.keys().collect();
    codes.sort();

    let mappings: Vec<CriterionMapping> = codes
        .into_iter()
        .map(|code| {
            let criterion = &criteria[code];
            let evidence_tasks = evidence_task_set(criterion);
            let satisfied = satisfied_controls(&evidence_tasks, framework);
            CriterionMapping {
                criterion: code.clone(),
                soc_controls: criterion.control_names(),
                evidence_tasks,
                satisfied_controls: satisfied,
            }
        })
        .collect();

    let mut unevidenced_controls: Vec<String> = framework
        .controls
        .iter()
        .filter(|(_, tasks)| tasks.is_empty())
        .map(|(name, _)| name.clone())
        .collect();
    unevidenced_controls.sort();

    if !unevidenced_controls.is_empty() {
        tracing::warn!(
            framework = %framework.label,
            count = unevidenced_controls.len(),
            "controls without evidence tasks are satisfied by every criterion"
        );
    }

    let summary = CrosswalkSummary {
        criteria_count: mappings.len(),
        framework_control_count: framework.len(),
        evidence_link_count: framework.controls.values().map(Vec::len).sum(),
        criteria_with_matches: mappings
            .iter()
            .filter(|m| !m.satisfied_controls.is_empty())
            .count(),
        unevidenced_control_count: unevidenced_controls.len(),
    };

    CrosswalkReport {
        framework: framework.label.clone(),
        criteria: mappings,
        unevidenced_controls,
        summary,
    }
}
