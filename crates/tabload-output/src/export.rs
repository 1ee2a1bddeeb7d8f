//! Delimited text export of a group's arrays.

use std::io::{BufWriter, Write};
use std::path::Path;

use tabload_model::{DataArray, DataPath, DataStructure};
use tracing::info;

use crate::atomic::AtomicFile;
use crate::error::{OutputError, Result};

/// What [`export_group`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub columns: usize,
}

/// Writes every array directly under `group` to `target` as delimited text:
/// a header row of array names, then one row per value.
///
/// Floats are written in their shortest exact form, so re-importing the file
/// reproduces the values bit for bit. The target is replaced atomically.
pub fn export_group(
    structure: &DataStructure,
    group: &DataPath,
    target: &Path,
    delimiter: u8,
) -> Result<ExportSummary> {
    if structure.group(group).is_none() {
        return Err(OutputError::GroupNotFound {
            path: group.clone(),
        });
    }
    let arrays: Vec<(&DataPath, &DataArray)> = structure.arrays_in(group).collect();
    let Some((_, first)) = arrays.first() else {
        return Err(OutputError::EmptyGroup {
            path: group.clone(),
        });
    };
    let rows = first.data.len();
    if let Some((path, array)) = arrays.iter().find(|(_, array)| array.data.len() != rows) {
        return Err(OutputError::RaggedGroup {
            path: (*path).clone(),
            expected: rows,
            actual: array.data.len(),
        });
    }

    let staged = AtomicFile::stage(target)?;
    let file = staged.create()?;
    let csv_error = |source| OutputError::Csv {
        path: staged.target().to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(BufWriter::new(file));
    writer
        .write_record(arrays.iter().map(|(path, _)| path.name().unwrap_or_default()))
        .map_err(csv_error)?;
    for row in 0..rows {
        writer
            .write_record(
                arrays
                    .iter()
                    .map(|(_, array)| array.data.value_string(row).unwrap_or_default()),
            )
            .map_err(csv_error)?;
    }

    let mut buffered = writer.into_inner().map_err(|e| OutputError::Io {
        operation: "write",
        path: staged.path().to_path_buf(),
        source: e.into_error(),
    })?;
    buffered.flush().map_err(|e| OutputError::Io {
        operation: "write",
        path: staged.path().to_path_buf(),
        source: e,
    })?;
    let file = buffered.into_inner().map_err(|e| OutputError::Io {
        operation: "write",
        path: staged.path().to_path_buf(),
        source: e.into_error(),
    })?;
    file.sync_all().map_err(|e| OutputError::Io {
        operation: "sync",
        path: staged.path().to_path_buf(),
        source: e,
    })?;
    drop(file);
    staged.commit()?;

    info!(
        group = %group,
        rows,
        columns = arrays.len(),
        "exported group"
    );
    Ok(ExportSummary {
        rows,
        columns: arrays.len(),
    })
}
