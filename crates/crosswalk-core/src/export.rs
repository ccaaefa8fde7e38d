//! GRC export decoding.
//!
//! Both exports are plain CSV with one header row. Cells that hold several
//! values (framework memberships, classification codes, covered controls)
//! separate them with a newline inside the quoted cell. Only the columns
//! below are read; everything else in a row is ignored.

use crate::error::CrosswalkError;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const CONTROL_NAME_COLUMN: usize = 1;
pub const CONTROL_FRAMEWORKS_COLUMN: usize = 6;
pub const CONTROL_CODES_COLUMN: usize = 9;

pub const TASK_ID_COLUMN: usize = 0;
pub const TASK_CONTROLS_COLUMN: usize = 7;
pub const TASK_FRAMEWORKS_COLUMN: usize = 8;

/// One row of the controls export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRow {
    pub name: String,
    /// Framework memberships. Empty when the cell is empty.
    pub frameworks: Vec<String>,
    /// Raw classification codes (SOC criteria, annex references, ...).
    pub codes: Vec<String>,
}

impl ControlRow {
    pub fn is_member_of(&self, framework: &str) -> bool {
        self.frameworks.iter().any(|f| f == framework)
    }
}

/// One row of the evidence-task export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceTaskRow {
    pub id: String,
    /// Control names this task provides evidence for.
    pub controls: Vec<String>,
    /// Frameworks this task applies to.
    pub frameworks: Vec<String>,
}

impl EvidenceTaskRow {
    pub fn applies_to(&self, framework: &str) -> bool {
        self.frameworks.iter().any(|f| f == framework)
    }
}

/// Split a multi-value cell on newlines.
///
/// An empty cell yields no items. Otherwise every item is kept as-is,
/// including empty ones, apart from a trailing `\r` left by CRLF exports.
pub fn split_cell(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split('\n')
        .map(|item| item.strip_suffix('\r').unwrap_or(item).to_string())
        .collect()
}

/// Read the controls export at `path`.
pub fn read_control_export(path: impl AsRef<Path>) -> Result<Vec<ControlRow>, CrosswalkError> {
    let path = path.as_ref();
    let file = open_export(path)?;
    read_control_rows(file, path)
}

/// Read controls-export rows from any reader. `path` labels errors.
pub fn read_control_rows(
    reader: impl Read,
    path: impl AsRef<Path>,
) -> Result<Vec<ControlRow>, CrosswalkError> {
    read_rows(reader, path.as_ref(), |record, cell| {
        Ok(ControlRow {
            name: cell(record, CONTROL_NAME_COLUMN)?.to_string(),
            frameworks: split_cell(cell(record, CONTROL_FRAMEWORKS_COLUMN)?),
            codes: split_cell(cell(record, CONTROL_CODES_COLUMN)?),
        })
    })
}

/// Read the evidence-task export at `path`.
pub fn read_evidence_task_export(
    path: impl AsRef<Path>,
) -> Result<Vec<EvidenceTaskRow>, CrosswalkError> {
    let path = path.as_ref();
    let file = open_export(path)?;
    read_evidence_task_rows(file, path)
}

/// Read evidence-task rows from any reader. `path` labels errors.
pub fn read_evidence_task_rows(
    reader: impl Read,
    path: impl AsRef<Path>,
) -> Result<Vec<EvidenceTaskRow>, CrosswalkError> {
    read_rows(reader, path.as_ref(), |record, cell| {
        Ok(EvidenceTaskRow {
            id: cell(record, TASK_ID_COLUMN)?.to_string(),
            controls: split_cell(cell(record, TASK_CONTROLS_COLUMN)?),
            frameworks: split_cell(cell(record, TASK_FRAMEWORKS_COLUMN)?),
        })
    })
}

fn open_export(path: &Path) -> Result<File, CrosswalkError> {
    if !path.exists() {
        return Err(CrosswalkError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    File::open(path).map_err(|e| CrosswalkError::io(path, e))
}

type CellFn = fn(&StringRecord, usize) -> Result<&str, String>;

fn required_cell(record: &StringRecord, column: usize) -> Result<&str, String> {
    record
        .get(column)
        .ok_or_else(|| format!("missing column {column} (row has {} column(s))", record.len()))
}

/// I/O failures keep their own kind; decode failures become `MalformedRow`.
fn read_error(path: &Path, error: csv::Error) -> CrosswalkError {
    let line = error.position().map(|p| p.line()).unwrap_or(0);
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(source) => CrosswalkError::io(path, source),
        _ => CrosswalkError::MalformedRow {
            path: path.to_path_buf(),
            line,
            message,
        },
    }
}

fn read_rows<T>(
    reader: impl Read,
    path: &Path,
    parse: impl Fn(&StringRecord, CellFn) -> Result<T, String>,
) -> Result<Vec<T>, CrosswalkError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| read_error(path, e))?;
        let row = parse(&record, required_cell).map_err(|message| {
            CrosswalkError::MalformedRow {
                path: path.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
                message,
            }
        })?;
        rows.push(row);
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read export");
    Ok(rows)
}
