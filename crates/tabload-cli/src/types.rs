use std::path::PathBuf;
use std::time::Duration;

use tabload_ingest::{ImportReport, Preflight};
use tabload_model::{DataPath, DataStructure, ImportConfig, ScalarType};
use tabload_output::ExportSummary;

#[derive(Debug)]
pub struct ValidateResult {
    pub config: ImportConfig,
    pub group: DataPath,
    pub preflight: Preflight,
}

#[derive(Debug)]
pub struct ImportResult {
    pub config: ImportConfig,
    pub group: DataPath,
    pub report: ImportReport,
    pub structure: DataStructure,
    pub export: Option<(PathBuf, ExportSummary)>,
    pub saved_config: Option<PathBuf>,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct InferResult {
    pub headers: Vec<String>,
    pub types: Vec<ScalarType>,
    pub sampled_rows: usize,
}
