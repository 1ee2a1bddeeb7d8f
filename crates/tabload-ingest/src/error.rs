//! Error types for delimited-text ingestion.
//!
//! Every variant carries a stable negative issue code (see
//! [`IngestError::code`]) so callers and tests can tell failures apart without
//! matching on message text.

use std::path::PathBuf;

use tabload_model::{DataPath, ModelError, ScalarType};
use thiserror::Error;

/// Errors that can occur while validating or running an import.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Input File Errors ===
    /// No input file was configured.
    #[error("no input file was specified")]
    EmptyFileReference,

    #[error("input file does not exist: {path}")]
    FileDoesNotExist { path: PathBuf },

    /// The file exists but could not be opened for reading.
    #[error("input file could not be opened for reading: {path}: {source}")]
    FileNotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read failure after the file was opened.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file appears to be binary: {path}")]
    BinaryFileSuspected { path: PathBuf },

    // === Row Range Errors ===
    #[error("start import row {row} is out of range (file has {total_lines} lines)")]
    StartRowOutOfRange { row: usize, total_lines: usize },

    #[error("header line {line} is out of range: {reason}")]
    HeaderLineOutOfRange { line: usize, reason: String },

    // === Header Errors ===
    #[error("no column headers were found")]
    EmptyHeaders,

    /// 1-based column whose header is blank.
    #[error("header of column {column} is empty")]
    EmptyHeaderName { column: usize },

    #[error("header '{header}' contains an illegal character ('&', ':', '/' or '\\')")]
    IllegalHeaderCharacter { header: String },

    #[error("header '{header}' appears more than once")]
    DuplicateHeaderName { header: String },

    /// `what` names the mismatched list ("column types" or "skip mask").
    #[error("number of {what} ({actual}) does not match the number of headers ({expected})")]
    ColumnCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    // === Tuple Shape Errors ===
    #[error("tuple dimensions {tuple_dims:?} describe zero tuples")]
    TupleCountZero { tuple_dims: Vec<usize> },

    #[error(
        "tuple dimensions {tuple_dims:?} require more rows than the {available} lines available from row {start_row}"
    )]
    TupleCountExceedsAvailableLines {
        tuple_dims: Vec<usize>,
        available: usize,
        start_row: usize,
    },

    // === Destination Errors ===
    #[error("destination group path is empty")]
    DestinationGroupEmptyPath,

    #[error("destination group {path} does not exist")]
    DestinationGroupNotFound { path: DataPath },

    #[error("destination group {path} already exists")]
    DestinationGroupAlreadyExists { path: DataPath },

    #[error("destination group {path} already contains an object named '{name}'")]
    DestinationNameCollision { path: DataPath, name: String },

    // === Parser Construction Errors ===
    /// 1-based column whose declared type cannot be used.
    #[error("column {column} has an unsupported array type: {reason}")]
    InvalidArrayType { column: usize, reason: String },

    #[error("destination array {path} for column {column} was not found")]
    ArrayNotFound { path: DataPath, column: usize },

    /// The destination column cannot hold every row of the import.
    #[error("destination array for column '{header}' holds {capacity} rows, {expected} required")]
    ArrayTooShort {
        header: String,
        capacity: usize,
        expected: usize,
    },

    // === Data Line Errors ===
    #[error("could not skip to start row {row}: file ended after {lines_read} lines")]
    CannotSkipToRow { row: usize, lines_read: usize },

    #[error("file ended at line {line} before all {expected} rows were imported")]
    UnexpectedEndOfFile { line: usize, expected: usize },

    #[error("line {line} is empty: '{text}'")]
    EmptyDataLine { line: usize, text: String },

    #[error("line {line} has {actual} columns, expected {expected}: '{text}'")]
    InconsistentColumnCount {
        line: usize,
        expected: usize,
        actual: usize,
        text: String,
    },

    #[error("column '{header}', line {line}: value '{token}' does not fit in {scalar_type}")]
    Overflow {
        header: String,
        line: usize,
        token: String,
        scalar_type: ScalarType,
    },

    #[error("column '{header}', line {line}: '{token}' is not a valid {scalar_type}")]
    InvalidArgument {
        header: String,
        line: usize,
        token: String,
        scalar_type: ScalarType,
    },

    // === Collaborator Errors ===
    /// Applying preflight actions to the destination failed.
    #[error("failed to update data structure: {0}")]
    Structure(#[from] ModelError),

    #[error("invalid import configuration {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl IngestError {
    /// Stable numeric issue code.
    pub const fn code(&self) -> i32 {
        match self {
            Self::EmptyFileReference => -2000,
            Self::FileDoesNotExist { .. } => -2001,
            Self::FileNotOpen { .. } => -2002,
            Self::FileRead { .. } => -2003,
            Self::BinaryFileSuspected { .. } => -2004,
            Self::StartRowOutOfRange { .. } => -2010,
            Self::HeaderLineOutOfRange { .. } => -2011,
            Self::EmptyHeaders => -2020,
            Self::EmptyHeaderName { .. } => -2021,
            Self::IllegalHeaderCharacter { .. } => -2022,
            Self::DuplicateHeaderName { .. } => -2023,
            Self::ColumnCountMismatch { .. } => -2024,
            Self::TupleCountZero { .. } => -2030,
            Self::TupleCountExceedsAvailableLines { .. } => -2031,
            Self::DestinationGroupEmptyPath => -2040,
            Self::DestinationGroupNotFound { .. } => -2041,
            Self::DestinationGroupAlreadyExists { .. } => -2042,
            Self::DestinationNameCollision { .. } => -2043,
            Self::InvalidArrayType { .. } => -2050,
            Self::ArrayNotFound { .. } => -2051,
            Self::ArrayTooShort { .. } => -2052,
            Self::CannotSkipToRow { .. } => -2060,
            Self::UnexpectedEndOfFile { .. } => -2061,
            Self::EmptyDataLine { .. } => -2062,
            Self::InconsistentColumnCount { .. } => -2063,
            Self::Overflow { .. } => -2064,
            Self::InvalidArgument { .. } => -2065,
            Self::Structure(_) => -2070,
            Self::Config { .. } => -2080,
        }
    }

    /// True for failures tied to one data line of the file.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyDataLine { .. }
                | Self::InconsistentColumnCount { .. }
                | Self::Overflow { .. }
                | Self::InvalidArgument { .. }
                | Self::UnexpectedEndOfFile { .. }
        )
    }

    /// 1-based file line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::EmptyDataLine { line, .. }
            | Self::InconsistentColumnCount { line, .. }
            | Self::Overflow { line, .. }
            | Self::InvalidArgument { line, .. }
            | Self::UnexpectedEndOfFile { line, .. } => Some(*line),
            Self::HeaderLineOutOfRange { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Warning codes emitted by preflight.
pub mod warning_codes {
    /// Configured tuple dimensions were replaced by the existing group's shape.
    pub const TUPLE_DIMS_IGNORED: i32 = 2100;
    /// Configured tuple count leaves file lines unread.
    pub const ROWS_NOT_IMPORTED: i32 = 2101;
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
