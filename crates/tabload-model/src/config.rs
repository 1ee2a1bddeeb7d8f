//! Import configuration.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::ScalarType;

/// How column names are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// Names come from one line of the file (`headers_line`).
    #[default]
    LineNumber,
    /// Names come from `custom_headers`.
    CustomList,
    /// Names are generated (`Column 1`, `Column 2`, ...).
    None,
}

/// Everything needed to validate and run one import.
///
/// Row and line numbers are 1-based, matching what a user sees in a text
/// editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub input_file_path: PathBuf,

    #[serde(default)]
    pub header_mode: HeaderMode,

    /// Meaningful only for [`HeaderMode::LineNumber`].
    #[serde(default = "default_headers_line")]
    pub headers_line: usize,

    /// Meaningful only for [`HeaderMode::CustomList`]. Used verbatim, with no
    /// trimming.
    #[serde(default)]
    pub custom_headers: Vec<String>,

    #[serde(default = "default_delimiters")]
    pub delimiters: BTreeSet<char>,

    /// Collapse runs of delimiters instead of producing empty tokens.
    #[serde(default)]
    pub consecutive_delimiters: bool,

    #[serde(default = "default_start_import_row")]
    pub start_import_row: usize,

    /// One entry per header, in header order.
    #[serde(default)]
    pub column_types: Vec<ScalarType>,

    /// One entry per header; `true` leaves the column out of the destination.
    #[serde(default)]
    pub skip_mask: Vec<bool>,

    /// Shape of the imported arrays; the product is the expected row count.
    #[serde(default)]
    pub tuple_dims: Vec<usize>,
}

fn default_headers_line() -> usize {
    1
}

fn default_start_import_row() -> usize {
    2
}

fn default_delimiters() -> BTreeSet<char> {
    BTreeSet::from([','])
}

impl ImportConfig {
    /// Comma-separated file with a header on line 1 and data from line 2.
    pub fn new(input_file_path: impl Into<PathBuf>) -> Self {
        Self {
            input_file_path: input_file_path.into(),
            header_mode: HeaderMode::LineNumber,
            headers_line: default_headers_line(),
            custom_headers: Vec::new(),
            delimiters: default_delimiters(),
            consecutive_delimiters: false,
            start_import_row: default_start_import_row(),
            column_types: Vec::new(),
            skip_mask: Vec::new(),
            tuple_dims: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_headers_line(mut self, line: usize) -> Self {
        self.header_mode = HeaderMode::LineNumber;
        self.headers_line = line;
        self
    }

    #[must_use]
    pub fn with_custom_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_mode = HeaderMode::CustomList;
        self.custom_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn without_headers(mut self) -> Self {
        self.header_mode = HeaderMode::None;
        self
    }

    #[must_use]
    pub fn with_delimiters<I: IntoIterator<Item = char>>(mut self, delimiters: I) -> Self {
        self.delimiters = delimiters.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_consecutive_delimiters(mut self, collapse: bool) -> Self {
        self.consecutive_delimiters = collapse;
        self
    }

    #[must_use]
    pub fn with_start_import_row(mut self, row: usize) -> Self {
        self.start_import_row = row;
        self
    }

    /// Sets the column types and a skip mask that keeps every column.
    #[must_use]
    pub fn with_column_types(mut self, types: impl Into<Vec<ScalarType>>) -> Self {
        self.column_types = types.into();
        self.skip_mask = vec![false; self.column_types.len()];
        self
    }

    #[must_use]
    pub fn with_skip_mask(mut self, mask: impl Into<Vec<bool>>) -> Self {
        self.skip_mask = mask.into();
        self
    }

    #[must_use]
    pub fn with_tuple_dims(mut self, dims: impl Into<Vec<usize>>) -> Self {
        self.tuple_dims = dims.into();
        self
    }

    /// Product of `tuple_dims`.
    ///
    /// Empty dims count as zero tuples; `None` means the product overflows.
    pub fn tuple_count(&self) -> Option<usize> {
        tuple_count(&self.tuple_dims)
    }

    /// Number of columns that will be materialized.
    pub fn imported_column_count(&self) -> usize {
        self.skip_mask.iter().filter(|skip| !**skip).count()
    }
}

/// Product of a tuple shape; zero for an empty shape, `None` on overflow.
pub fn tuple_count(dims: &[usize]) -> Option<usize> {
    if dims.is_empty() {
        return Some(0);
    }
    dims.iter().try_fold(1usize, |acc, dim| acc.checked_mul(*dim))
}
