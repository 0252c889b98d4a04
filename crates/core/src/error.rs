//! Error taxonomy for a generator run.
//!
//! Every variant except a per-entity `NotFound` I/O error is fatal: the driver
//! stops the batch and the binary maps it to a non-zero exit.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Generated block starting at line {line} of {} has no closing '}}' line", path.display())]
    UnterminatedBlock { path: PathBuf, line: usize },

    #[error("Aggregator file missing: {}", path.display())]
    MissingAggregator { path: PathBuf },

    #[error("No #include line to anchor new includes in {}", path.display())]
    NoIncludeAnchor { path: PathBuf },

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Field pattern for '{kind}' does not compile: {source}")]
    InvalidPattern {
        kind: String,
        #[source]
        source: regex::Error,
    },
}

impl GenError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    /// True for an I/O error caused by a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
