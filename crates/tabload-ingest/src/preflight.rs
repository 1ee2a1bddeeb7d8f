//! Preflight validation: plans the structural changes for an import without
//! touching the destination.
//!
//! Checks run in a fixed order and stop at the first failure, so the same
//! broken configuration always reports the same error:
//!
//! 1. input file (path given, exists, opens, looks like text)
//! 2. start row within the file
//! 3. header line within the file and before the start row
//! 4. at least one header
//! 5. column types and skip mask match the header count
//! 6. header names (non-empty, legal characters, unique)
//! 7. tuple count (non-zero, fits the available rows)
//! 8. destination group (path, existence, name collisions)

use std::collections::HashSet;

use tabload_model::{
    Action, DataPath, DestinationGroup, HeaderMode, ImportConfig, StructureView, Warning,
    tuple_count,
};
use tracing::{debug, warn};

use crate::cache::HeaderCache;
use crate::error::{IngestError, Result, warning_codes};
use crate::text::check_input_file;

/// Characters that may not appear in a header name (they would break paths).
pub const ILLEGAL_HEADER_CHARS: [char; 4] = ['&', ':', '/', '\\'];

/// Outcome of a successful preflight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    /// Structural changes to apply before running the import, in order.
    pub actions: Vec<Action>,
    pub warnings: Vec<Warning>,
    /// Resolved header names, one per column.
    pub headers: Vec<String>,
    /// Tuple shape of the imported arrays (the existing group's shape when
    /// importing into an existing group).
    pub tuple_dims: Vec<usize>,
    pub total_lines: usize,
}

impl Preflight {
    /// Number of rows the import will read.
    pub fn tuple_count(&self) -> usize {
        tuple_count(&self.tuple_dims).unwrap_or(0)
    }

    /// Destination paths of the imported (non-skipped) columns.
    pub fn array_paths(&self) -> impl Iterator<Item = &DataPath> {
        self.actions.iter().filter_map(|action| match action {
            Action::CreateArray { path, .. } => Some(path),
            Action::CreateGroup { .. } => None,
        })
    }
}

/// Validates `config` against the current destination contents.
///
/// Only `cache` is mutated; `structure` is read through [`StructureView`].
pub fn validate<S: StructureView + ?Sized>(
    cache: &mut HeaderCache,
    config: &ImportConfig,
    destination: &DestinationGroup,
    structure: &S,
) -> Result<Preflight> {
    // 1. input file
    check_input_file(&config.input_file_path)?;
    let total_lines = cache.total_lines(config)?;

    // 2. start row
    if config.start_import_row < 1 || config.start_import_row > total_lines {
        return Err(IngestError::StartRowOutOfRange {
            row: config.start_import_row,
            total_lines,
        });
    }

    // 3. header line
    if config.header_mode == HeaderMode::LineNumber {
        check_header_line(config, total_lines)?;
    }

    // 4. headers present
    let headers = cache.ensure_headers(config)?;
    if headers.is_empty() {
        return Err(IngestError::EmptyHeaders);
    }

    // 5. per-column settings
    if config.column_types.len() != headers.len() {
        return Err(IngestError::ColumnCountMismatch {
            what: "column types",
            expected: headers.len(),
            actual: config.column_types.len(),
        });
    }
    if config.skip_mask.len() != headers.len() {
        return Err(IngestError::ColumnCountMismatch {
            what: "skip mask",
            expected: headers.len(),
            actual: config.skip_mask.len(),
        });
    }

    // 6. header names
    check_header_names(&headers)?;

    // 7. tuple count
    let available = total_lines - config.start_import_row + 1;
    let mut warnings = Vec::new();
    let tuple_dims = resolve_tuple_dims(config, destination, structure, &mut warnings)?;
    let count = tuple_count(&tuple_dims);
    if count == Some(0) {
        return Err(IngestError::TupleCountZero { tuple_dims });
    }
    let count = match count {
        Some(count) if count <= available => count,
        _ => {
            return Err(IngestError::TupleCountExceedsAvailableLines {
                tuple_dims,
                available,
                start_row: config.start_import_row,
            });
        }
    };
    if count < available {
        warnings.push(Warning::new(
            warning_codes::ROWS_NOT_IMPORTED,
            format!(
                "{} of {available} available rows will not be imported",
                available - count
            ),
        ));
    }

    // 8. destination
    let group = destination.path();
    if group.is_root() {
        return Err(IngestError::DestinationGroupEmptyPath);
    }
    let mut actions = Vec::new();
    match destination {
        DestinationGroup::Existing(path) => {
            let children: HashSet<String> = structure.child_names(path).into_iter().collect();
            let collision = headers
                .iter()
                .zip(&config.skip_mask)
                .find(|(header, skip)| !**skip && children.contains(header.as_str()));
            if let Some((name, _)) = collision {
                return Err(IngestError::DestinationNameCollision {
                    path: path.clone(),
                    name: name.clone(),
                });
            }
        }
        DestinationGroup::New(path) => {
            if structure.exists(path) {
                return Err(IngestError::DestinationGroupAlreadyExists { path: path.clone() });
            }
            if let Some(parent) = path.parent()
                && !parent.is_root()
                && structure.group_shape(&parent).is_none()
            {
                return Err(IngestError::DestinationGroupNotFound { path: parent });
            }
            actions.push(Action::CreateGroup {
                path: path.clone(),
                tuple_dims: tuple_dims.clone(),
            });
        }
    }

    actions.extend(
        headers
            .iter()
            .zip(&config.column_types)
            .zip(&config.skip_mask)
            .filter(|(_, skip)| !**skip)
            .map(|((header, scalar_type), _)| Action::CreateArray {
                scalar_type: *scalar_type,
                tuple_dims: tuple_dims.clone(),
                component_dims: vec![1],
                path: group.join(header.as_str()),
            }),
    );

    for warning in &warnings {
        warn!(code = warning.code, "{}", warning.message);
    }
    debug!(
        path = %config.input_file_path.display(),
        actions = actions.len(),
        tuples = count,
        "preflight passed"
    );

    Ok(Preflight {
        actions,
        warnings,
        headers,
        tuple_dims,
        total_lines,
    })
}

fn check_header_line(config: &ImportConfig, total_lines: usize) -> Result<()> {
    let line = config.headers_line;
    let reason = if line < 1 {
        Some("header line must be at least 1".to_string())
    } else if line > total_lines {
        Some(format!("file has only {total_lines} lines"))
    } else if line >= config.start_import_row {
        Some(format!(
            "header line must come before start import row {}",
            config.start_import_row
        ))
    } else {
        None
    };
    match reason {
        Some(reason) => Err(IngestError::HeaderLineOutOfRange { line, reason }),
        None => Ok(()),
    }
}

fn check_header_names(headers: &[String]) -> Result<()> {
    for (index, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(IngestError::EmptyHeaderName { column: index + 1 });
        }
        if header.contains(ILLEGAL_HEADER_CHARS) {
            return Err(IngestError::IllegalHeaderCharacter {
                header: header.clone(),
            });
        }
    }
    // Skipped columns count too: a name may appear only once per file.
    let mut seen = HashSet::with_capacity(headers.len());
    for header in headers {
        if !seen.insert(header.as_str()) {
            return Err(IngestError::DuplicateHeaderName {
                header: header.clone(),
            });
        }
    }
    Ok(())
}

/// Tuple shape used for array creation and the row bound.
///
/// An existing group's shape overrides the configured dims, with a warning.
fn resolve_tuple_dims<S: StructureView + ?Sized>(
    config: &ImportConfig,
    destination: &DestinationGroup,
    structure: &S,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<usize>> {
    let DestinationGroup::Existing(path) = destination else {
        return Ok(config.tuple_dims.clone());
    };
    if path.is_root() {
        return Err(IngestError::DestinationGroupEmptyPath);
    }
    let shape = structure
        .group_shape(path)
        .ok_or_else(|| IngestError::DestinationGroupNotFound { path: path.clone() })?;
    warnings.push(Warning::new(
        warning_codes::TUPLE_DIMS_IGNORED,
        format!(
            "importing into existing group {path}: its tuple dimensions {shape:?} are used \
             and the configured tuple dimensions {:?} are ignored",
            config.tuple_dims
        ),
    ));
    Ok(shape)
}
