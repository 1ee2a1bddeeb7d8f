//! Output error types.
//!
//! All output operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;

use tabload_model::DataPath;
use thiserror::Error;

/// Output operation error.
#[derive(Debug, Error)]
pub enum OutputError {
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target path cannot name a file.
    #[error("invalid output path {path}: {reason}")]
    InvalidTarget { path: PathBuf, reason: String },

    /// The nearest existing ancestor of the target is not a writable directory.
    #[error("cannot write below {ancestor} (needed for {path})")]
    NotWritable { path: PathBuf, ancestor: PathBuf },

    /// The staged file was never written (or was removed) before commit.
    #[error("staged file {temp_path} is missing, nothing to commit to {target_path}")]
    TempFileMissing {
        temp_path: PathBuf,
        target_path: PathBuf,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to move {temp_path} into place at {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Export Errors ===
    #[error("group {path} does not exist")]
    GroupNotFound { path: DataPath },

    #[error("group {path} contains no arrays")]
    EmptyGroup { path: DataPath },

    /// Arrays of one group must hold the same number of values.
    #[error("array {path} holds {actual} values, expected {expected}")]
    RaggedGroup {
        path: DataPath,
        expected: usize,
        actual: usize,
    },

    #[error("failed to write delimited output to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl OutputError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::InvalidTarget { path, reason } => {
                format!("'{}' is not a valid output file: {}", path.display(), reason)
            }
            Self::NotWritable { ancestor, .. } => {
                format!("The folder {} cannot be written to.", ancestor.display())
            }
            Self::TempFileMissing { target_path, .. } => format!(
                "Nothing was written for {}, so it was left unchanged.",
                target_path.display()
            ),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::GroupNotFound { path } => format!("There is no group named '{path}'."),
            Self::EmptyGroup { path } => format!("The group '{path}' has no data to export."),
            Self::RaggedGroup { path, .. } => {
                format!("The arrays in the group containing '{path}' have different lengths.")
            }
            Self::Csv { path, .. } => format!("Could not write {}.", path.display()),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidTarget { .. } => Some("Choose a path that ends in a file name.".into()),
            Self::NotWritable { .. } | Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
            Self::GroupNotFound { .. } | Self::EmptyGroup { .. } => {
                Some("Run an import into this group first.".into())
            }
            Self::TempFileMissing { .. } | Self::RaggedGroup { .. } | Self::Csv { .. } => None,
        }
    }
}

/// Result type alias for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
