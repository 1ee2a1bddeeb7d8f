//! The import engine: owns the scan cache and ties preflight, action
//! application, parser construction and the import run together.

use tabload_model::{
    DataStructure, DestinationGroup, ImportConfig, StructureView, Warning,
};
use tracing::info;

use crate::cache::HeaderCache;
use crate::error::Result;
use crate::factory::{build_parsers, destination_paths};
use crate::import::{self, ImportOutcome};
use crate::parser::ColumnParser;
use crate::preflight::{self, Preflight};
use crate::progress::{CancelToken, ProgressSink};

/// Result of [`ImportEngine::import_into`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub preflight: Preflight,
    pub outcome: ImportOutcome,
}

impl ImportReport {
    pub fn warnings(&self) -> &[Warning] {
        &self.preflight.warnings
    }
}

/// One import "instance". Repeated validations reuse its scan cache.
#[derive(Debug, Default)]
pub struct ImportEngine {
    cache: HeaderCache,
}

impl ImportEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &HeaderCache {
        &self.cache
    }

    /// Plans the import. Never mutates `structure`.
    pub fn validate<S: StructureView + ?Sized>(
        &mut self,
        config: &ImportConfig,
        destination: &DestinationGroup,
        structure: &S,
    ) -> Result<Preflight> {
        preflight::validate(&mut self.cache, config, destination, structure)
    }

    /// Runs the import against parsers bound to already-created arrays.
    pub fn run<P: ProgressSink + ?Sized>(
        &self,
        config: &ImportConfig,
        tuple_count: usize,
        parsers: &mut [Option<ColumnParser<'_>>],
        cancel: &CancelToken,
        progress: &mut P,
    ) -> Result<ImportOutcome> {
        import::run(config, tuple_count, parsers, cancel, progress)
    }

    /// Validates, applies the planned actions to `structure`, binds parsers
    /// and runs the import.
    pub fn import_into<P: ProgressSink + ?Sized>(
        &mut self,
        config: &ImportConfig,
        destination: &DestinationGroup,
        structure: &mut DataStructure,
        cancel: &CancelToken,
        progress: &mut P,
    ) -> Result<ImportReport> {
        let preflight = self.validate(config, destination, &*structure)?;
        structure.apply(&preflight.actions)?;

        let paths = destination_paths(destination.path(), &preflight.headers);
        let mut parsers = build_parsers(
            &config.column_types,
            &config.skip_mask,
            &preflight.headers,
            &paths,
            structure,
        )?;
        let outcome = self.run(
            config,
            preflight.tuple_count(),
            &mut parsers,
            cancel,
            progress,
        )?;
        info!(
            group = %destination.path(),
            rows = outcome.rows_imported,
            cancelled = outcome.cancelled,
            "import complete"
        );
        Ok(ImportReport { preflight, outcome })
    }
}
