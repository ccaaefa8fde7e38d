//! Framework and SOC-criteria indices.
//!
//! A framework and a SOC criterion have the same shape: a label plus a map
//! from control name to the evidence-task ids linked to that control. Both
//! are built here from the controls export; evidence tasks are attached
//! afterwards by [`crate::link`].

use crate::export::ControlRow;
use std::collections::HashMap;

/// Opaque evidence-task identifier from the evidence-task export.
pub type EvidenceTaskId = String;

/// Framework label -> framework record.
pub type FrameworkIndex = HashMap<String, ControlSet>;

/// SOC criterion code -> criterion record.
pub type CriteriaIndex = HashMap<String, ControlSet>;

/// A framework or SOC criterion with its controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSet {
    pub label: String,
    /// Classification codes from the first controls-export row that named
    /// this framework. Always empty for criteria.
    pub codes: Vec<String>,
    pub controls: HashMap<String, Vec<EvidenceTaskId>>,
}

impl ControlSet {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_codes(mut self, codes: Vec<String>) -> Self {
        self.codes = codes;
        self
    }

    /// Add a control with no evidence tasks. An existing control keeps the
    /// evidence tasks already collected for it.
    ///
    /// Returns `true` if the control was new.
    pub fn insert_control(&mut self, name: impl Into<String>) -> bool {
        let mut inserted = false;
        self.controls.entry(name.into()).or_insert_with(|| {
            inserted = true;
            Vec::new()
        });
        inserted
    }

    pub fn contains_control(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }

    pub fn evidence_tasks(&self, control: &str) -> Option<&[EvidenceTaskId]> {
        self.controls.get(control).map(Vec::as_slice)
    }

    /// Control names in lexicographic order.
    pub fn control_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.controls.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

/// Group controls by every framework they belong to.
///
/// Rows with an empty framework cell are skipped. A framework's codes come
/// from the first row that names it.
pub fn build_framework_index(rows: &[ControlRow]) -> FrameworkIndex {
    let mut index = FrameworkIndex::new();

    for row in rows {
        if row.frameworks.is_empty() {
            tracing::debug!(control = %row.name, "control has no framework membership; skipped");
            continue;
        }
        for framework in row.frameworks.iter().filter(|f| !f.is_empty()) {
            index
                .entry(framework.clone())
                .or_insert_with(|| {
                    ControlSet::new(framework.clone()).with_codes(row.codes.clone())
                })
                .insert_control(row.name.clone());
        }
    }

    tracing::info!(frameworks = index.len(), "built framework index");
    index
}

/// Whether a classification code names a SOC criterion rather than an
/// annex reference.
pub fn is_criterion_code(code: &str, annex_prefix: &str) -> bool {
    !code.is_empty() && !code.starts_with(annex_prefix)
}

/// Group SOC controls by criterion code.
///
/// Only rows whose framework memberships include `soc_framework` are used.
/// Empty codes and codes starting with `annex_prefix` are discarded.
pub fn build_criteria_index(
    rows: &[ControlRow],
    soc_framework: &str,
    annex_prefix: &str,
) -> CriteriaIndex {
    let mut index = CriteriaIndex::new();

    for row in rows.iter().filter(|row| row.is_member_of(soc_framework)) {
        for code in &row.codes {
            if !is_criterion_code(code, annex_prefix) {
                tracing::debug!(control = %row.name, code = %code, "not a criterion code; skipped");
                continue;
            }
            index
                .entry(code.clone())
                .or_insert_with(|| ControlSet::new(code.clone()))
                .insert_control(row.name.clone());
        }
    }

    tracing::info!(criteria = index.len(), "built SOC criteria index");
    index
}
