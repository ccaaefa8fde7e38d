//! # crosswalk-core
//!
//! Cross-references GRC catalog exports: maps SOC 2 criteria onto the
//! controls of another framework, using shared evidence tasks as the bridge.
//!
//! ## Pipeline
//!
//! ```text
//! controls export ──► framework index ──┐
//!        │                 ▲ link       │
//!        │      evidence-task export    ├──► compare ──► console / CSV / JSON
//!        │                 ▼ link       │
//!        └──────► SOC criteria index ───┘
//! ```
//!
//! A target-framework control is *satisfied* by a criterion when all of its
//! evidence tasks appear among the criterion's evidence tasks.

pub mod config;
pub mod coverage;
pub mod error;
pub mod export;
pub mod index;
pub mod link;
pub mod pipeline;
pub mod report;

pub use config::CrosswalkConfig;
pub use coverage::{
    CriterionMapping, CrosswalkReport, CrosswalkSummary, compare, evidence_task_set,
    is_satisfied, satisfied_controls,
};
pub use error::CrosswalkError;
pub use export::{
    ControlRow, EvidenceTaskRow, read_control_export, read_evidence_task_export, split_cell,
};
pub use index::{
    ControlSet, CriteriaIndex, EvidenceTaskId, FrameworkIndex, build_criteria_index,
    build_framework_index, is_criterion_code,
};
pub use link::{LinkOptions, link_criteria_evidence_tasks, link_framework_evidence_tasks};
pub use pipeline::{FrameworkSummary, Indices, run_crosswalk};
pub use report::{
    list_to_text, mapping_file_name, render_console, write_mapping_csv, write_mapping_csv_file,
};
