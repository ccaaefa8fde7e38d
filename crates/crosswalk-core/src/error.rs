//! Error types for crosswalk operations.

use std::path::PathBuf;

/// Errors raised while reading exports, building indices, or writing the
/// mapping. Every variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum CrosswalkError {
    /// An input export does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Opening, reading, or writing a file failed.
    #[error("I/O error: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV record could not be decoded or is missing a required column.
    #[error("file {}, line {line}: {message}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// The requested target framework never appeared in the controls export.
    #[error("unknown framework `{label}` (available: {})", available.join(", "))]
    UnknownFramework {
        label: String,
        available: Vec<String>,
    },

    /// Writing the mapping CSV failed.
    #[error("failed to write csv: {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The configuration file is not valid TOML for [`crate::CrosswalkConfig`].
    #[error("invalid toml at {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl CrosswalkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
