use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced to the user by dashboard actions.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("dataset is empty: no customer records to aggregate")]
    EmptyDataset,

    #[error("invalid limit {limit}: must be a positive integer")]
    InvalidLimit { limit: i64 },

    #[error("no hypotheses supplied")]
    EmptyHypotheses,

    #[error("unsupported file {}: {reason}", path.display())]
    UnsupportedFile { path: PathBuf, reason: String },

    #[error("could not write {}: {reason}", path.display())]
    ExportIo { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl DashboardError {
    pub fn unsupported(path: &Path, reason: impl ToString) -> Self {
        DashboardError::UnsupportedFile {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn export(path: &Path, reason: impl ToString) -> Self {
        DashboardError::ExportIo {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
