//! Console and CSV renderings of a [`CrosswalkReport`].

use crate::coverage::CrosswalkReport;
use crate::error::CrosswalkError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CRITERIA_HEADER: &str = "SOC Criteria";
pub const SOC_CONTROLS_HEADER: &str = "SOC controls";

/// File name of the mapping CSV for `framework`.
///
/// The label is glued directly onto `mapping.csv`, e.g.
/// `SOC 2 _ISO 27001:2013mapping.csv`.
pub fn mapping_file_name(framework: &str) -> String {
    format!("SOC 2 _{framework}mapping.csv")
}

/// Join cell values with a newline after every item, including the last.
pub fn list_to_text(items: &[String]) -> String {
    items.iter().map(|item| format!("{item}\n")).collect()
}

/// Framework label, then each criterion followed by the controls it
/// satisfies, one per line, with a blank line after each criterion.
pub fn render_console(report: &CrosswalkReport) -> String {
    let mut out = String::new();
    out.push_str(&report.framework);
    out.push('\n');
    for mapping in &report.criteria {
        out.push_str(&mapping.criterion);
        out.push('\n');
        out.push_str(&list_to_text(&mapping.satisfied_controls));
        out.push('\n');
    }
    out
}

/// Write the mapping CSV: a header row, then one row per criterion.
pub fn write_mapping_csv(report: &CrosswalkReport, writer: impl Write) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    let framework_header = format!("{} controls", report.framework);
    csv_writer.write_record([CRITERIA_HEADER, SOC_CONTROLS_HEADER, framework_header.as_str()])?;
    for mapping in &report.criteria {
        csv_writer.write_record([
            mapping.criterion.as_str(),
            list_to_text(&mapping.soc_controls).as_str(),
            list_to_text(&mapping.satisfied_controls).as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the mapping CSV into `dir` under [`mapping_file_name`].
pub fn write_mapping_csv_file(
    report: &CrosswalkReport,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, CrosswalkError> {
    let path = dir.as_ref().join(mapping_file_name(&report.framework));
    let file = File::create(&path).map_err(|e| CrosswalkError::io(&path, e))?;
    write_mapping_csv(report, file).map_err(|source| CrosswalkError::Csv {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = report.criteria.len(), "wrote mapping csv");
    Ok(path)
}
