//! Run configuration.
//!
//! Every field is optional; `effective_*` accessors supply the defaults that
//! match the GRC tool's standard export names.

use crate::error::CrosswalkError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "crosswalk.toml";
pub const DEFAULT_CONTROLS_EXPORT: &str = "controls_export.csv";
pub const DEFAULT_EVIDENCE_TASKS_EXPORT: &str = "evidence_tasks_export.csv";
pub const DEFAULT_FRAMEWORK: &str = "ISO 27001:2013";
pub const DEFAULT_SOC_FRAMEWORK: &str = "SOC 2";
pub const DEFAULT_ANNEX_PREFIX: &str = "A.";

/// Configuration for one crosswalk run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CrosswalkConfig {
    /// Path to the controls export CSV.
    pub controls_export: Option<PathBuf>,
    /// Path to the evidence-task export CSV.
    pub evidence_tasks_export: Option<PathBuf>,
    /// Target framework label compared against the SOC criteria.
    pub framework: Option<String>,
    /// Directory the mapping CSV is written into.
    pub output_dir: Option<PathBuf>,
    /// Framework membership that marks SOC controls and SOC evidence tasks.
    pub soc_framework: Option<String>,
    /// Classification codes with this prefix are annex codes, not criteria.
    pub annex_prefix: Option<String>,
    /// Append an evidence-task id to a control at most once.
    pub dedup_evidence_tasks: Option<bool>,
}

impl CrosswalkConfig {
    /// Parse a config from TOML text. `path` is only used for error reporting.
    pub fn from_toml_str(text: &str, path: impl AsRef<Path>) -> Result<Self, CrosswalkError> {
        toml::from_str(text).map_err(|source| CrosswalkError::ParseConfig {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// Load a config file. A missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CrosswalkError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CrosswalkError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| CrosswalkError::io(path, e))?;
        Self::from_toml_str(&text, path)
    }

    /// Load `path` if given, otherwise `crosswalk.toml` when it exists,
    /// otherwise the all-defaults config.
    pub fn discover(path: Option<&Path>) -> Result<Self, CrosswalkError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Field-wise overlay: every `Some` in `overrides` replaces the value here.
    pub fn merged_with(mut self, overrides: CrosswalkConfig) -> Self {
        if overrides.controls_export.is_some() {
            self.controls_export = overrides.controls_export;
        }
        if overrides.evidence_tasks_export.is_some() {
            self.evidence_tasks_export = overrides.evidence_tasks_export;
        }
        if overrides.framework.is_some() {
            self.framework = overrides.framework;
        }
        if overrides.output_dir.is_some() {
            self.output_dir = overrides.output_dir;
        }
        if overrides.soc_framework.is_some() {
            self.soc_framework = overrides.soc_framework;
        }
        if overrides.annex_prefix.is_some() {
            self.annex_prefix = overrides.annex_prefix;
        }
        if overrides.dedup_evidence_tasks.is_some() {
            self.dedup_evidence_tasks = overrides.dedup_evidence_tasks;
        }
        self
    }

    pub fn effective_controls_export(&self) -> PathBuf {
        self.controls_export
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTROLS_EXPORT))
    }

    pub fn effective_evidence_tasks_export(&self) -> PathBuf {
        self.evidence_tasks_export
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EVIDENCE_TASKS_EXPORT))
    }

    pub fn effective_framework(&self) -> &str {
        self.framework.as_deref().unwrap_or(DEFAULT_FRAMEWORK)
    }

    pub fn effective_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn effective_soc_framework(&self) -> &str {
        self.soc_framework.as_deref().unwrap_or(DEFAULT_SOC_FRAMEWORK)
    }

    pub fn effective_annex_prefix(&self) -> &str {
        self.annex_prefix.as_deref().unwrap_or(DEFAULT_ANNEX_PREFIX)
    }

    pub fn effective_dedup_evidence_tasks(&self) -> bool {
        self.dedup_evidence_tasks.unwrap_or(false)
    }
}
