//! Evidence-task linking.
//!
//! Attaches evidence-task ids to controls that already exist in an index.
//! Linking never creates frameworks, criteria, or controls.

use crate::export::EvidenceTaskRow;
use crate::index::{ControlSet, CriteriaIndex, FrameworkIndex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Skip an id already attached to the control.
    pub dedup: bool,
}

/// Append `task_id` to every covered control present in `set`.
///
/// Returns the number of ids appended.
fn attach_task(
    set: &mut ControlSet,
    covered: &[String],
    task_id: &str,
    options: LinkOptions,
) -> usize {
    let mut attached = 0;
    for control in covered.iter().filter(|c| !c.is_empty()) {
        let Some(tasks) = set.controls.get_mut(control) else {
            continue;
        };
        if options.dedup && tasks.iter().any(|t| t == task_id) {
            continue;
        }
        tasks.push(task_id.to_string());
        attached += 1;
    }
    attached
}

/// Link each task to the controls of every framework it applies to.
///
/// Frameworks missing from `index` are ignored.
pub fn link_framework_evidence_tasks(
    index: &mut FrameworkIndex,
    tasks: &[EvidenceTaskRow],
    options: LinkOptions,
) -> usize {
    let mut attached = 0;
    for task in tasks {
        for framework in &task.frameworks {
            if let Some(set) = index.get_mut(framework) {
                attached += attach_task(set, &task.controls, &task.id, options);
            }
        }
    }
    tracing::info!(tasks = tasks.len(), attached, "linked evidence tasks to frameworks");
    attached
}

/// Link each SOC task to the matching controls of every criterion.
///
/// The evidence-task export has no criterion column, so a task applying to
/// `soc_framework` is checked against all criteria.
pub fn link_criteria_evidence_tasks(
    index: &mut CriteriaIndex,
    tasks: &[EvidenceTaskRow],
    soc_framework: &str,
    options: LinkOptions,
) -> usize {
    let mut attached = 0;
    for task in tasks.iter().filter(|t| t.applies_to(soc_framework)) {
        for set in index.values_mut() {
            attached += attach_task(set, &task.controls, &task.id, options);
        }
    }
    tracing::info!(tasks = tasks.len(), attached, "linked evidence tasks to SOC criteria");
    attached
}
