//! Subcommand implementations behind the `tabload` binary.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info, info_span};

use tabload_ingest::{
    CancelToken, HeaderCache, ImportEngine, check_input_file, generated_headers,
    import_config_to_json, infer_column_types, load_import_config, parse_column_types,
    preview_lines, scan_file,
};
use tabload_model::{DataPath, DataStructure, DestinationGroup, ImportConfig};
use tabload_output::{export_group, write_atomically};

use crate::cli::{ImportArgs, InferArgs, PreviewArgs, TableArgs};
use crate::progress::BarProgress;
use crate::types::{ImportResult, InferResult, ValidateResult};

/// Data rows sampled when column types have to be inferred for an import.
const INFER_SAMPLE_ROWS: usize = 100;

/// Raw lines with their 1-based line numbers.
pub fn run_preview(args: &PreviewArgs) -> Result<Vec<(usize, String)>> {
    check_input_file(&args.file)?;
    let lines = preview_lines(&args.file, args.start_row, args.lines)
        .with_context(|| format!("read {}", args.file.display()))?;
    let first = args.start_row.max(1);
    Ok(lines
        .into_iter()
        .enumerate()
        .map(|(offset, line)| (first + offset, line))
        .collect())
}

pub fn run_infer(args: &InferArgs) -> Result<InferResult> {
    let config = build_config(&args.table)?;
    check_input_file(&config.input_file_path)?;
    let sample = preview_lines(&config.input_file_path, config.start_import_row, args.sample)
        .with_context(|| format!("read {}", config.input_file_path.display()))?;
    let types = infer_column_types(&sample, &config.delimiters, config.consecutive_delimiters);

    // Header problems are reported by `validate`; here they only cost names.
    let headers = match HeaderCache::new().ensure_headers(&config) {
        Ok(headers) if headers.len() == types.len() => headers,
        Ok(_) | Err(_) => generated_headers(types.len()),
    };
    debug!(columns = types.len(), rows = sample.len(), "inferred column types");
    Ok(InferResult {
        headers,
        types,
        sampled_rows: sample.len(),
    })
}

pub fn run_validate(args: &TableArgs) -> Result<ValidateResult> {
    let config = resolve_config(args)?;
    let group = DataPath::parse(&args.group);
    let preflight = ImportEngine::new()
        .validate(
            &config,
            &DestinationGroup::New(group.clone()),
            &DataStructure::new(),
        )
        .with_context(|| format!("{} cannot be imported", config.input_file_path.display()))?;
    Ok(ValidateResult {
        config,
        group,
        preflight,
    })
}

pub fn run_import(args: &ImportArgs) -> Result<ImportResult> {
    let started = Instant::now();
    let config = resolve_config(&args.table)?;
    let group = DataPath::parse(&args.table.group);
    let span = info_span!(
        "import",
        file = %config.input_file_path.display(),
        group = %group
    );
    let _guard = span.enter();

    let mut structure = DataStructure::new();
    let mut progress = BarProgress::new("importing", !args.no_progress);
    let result = ImportEngine::new().import_into(
        &config,
        &DestinationGroup::New(group.clone()),
        &mut structure,
        &CancelToken::new(),
        &mut progress,
    );
    progress.finish(matches!(&result, Ok(report) if report.outcome.is_complete()));
    let report = result
        .with_context(|| format!("import of {} failed", config.input_file_path.display()))?;

    let export = match &args.export {
        Some(path) => {
            let delimiter = u8::try_from(args.export_delimiter)
                .context("export delimiter must be a single-byte character")?;
            let summary = export_group(&structure, &group, path, delimiter)
                .with_context(|| format!("export to {} failed", path.display()))?;
            Some((path.clone(), summary))
        }
        None => None,
    };

    let saved_config = match &args.save_config {
        Some(path) => {
            let json = import_config_to_json(&config)?;
            write_atomically(path, json.as_bytes())
                .with_context(|| format!("save configuration to {}", path.display()))?;
            info!("Saved import configuration to {}", path.display());
            Some(path.clone())
        }
        None => None,
    };

    Ok(ImportResult {
        config,
        group,
        report,
        structure,
        export,
        saved_config,
        elapsed: started.elapsed(),
    })
}

/// Builds a config from `--config` (if any) and the explicit flags.
///
/// Column types may still be empty and the tuple shape unset; see
/// [`resolve_config`].
pub fn build_config(args: &TableArgs) -> Result<ImportConfig> {
    let mut config = match (&args.config, &args.file) {
        (Some(path), _) => load_import_config(path)
            .with_context(|| format!("load configuration {}", path.display()))?,
        (None, Some(file)) => ImportConfig::new(file),
        (None, None) => bail!("no input file given (pass FILE or --config)"),
    };
    if let Some(file) = &args.file {
        config.input_file_path = file.clone();
    }
    if !args.delimiters.is_empty() {
        config = config.with_delimiters(args.delimiters.iter().copied());
    }
    if args.collapse {
        config.consecutive_delimiters = true;
    }
    if let Some(line) = args.headers_line {
        config = config.with_headers_line(line);
    }
    if !args.headers.is_empty() {
        config = config.with_custom_headers(args.headers.iter().map(String::as_str));
    }
    if args.no_headers {
        config = config.without_headers();
    }
    match args.start_row {
        Some(row) => config.start_import_row = row,
        // Without a header line the data starts on line 1.
        None if args.no_headers => config.start_import_row = 1,
        None => {}
    }
    if !args.types.is_empty() {
        config = config.with_column_types(parse_column_types(&args.types)?);
    }
    if !args.tuple_dims.is_empty() {
        config.tuple_dims.clone_from(&args.tuple_dims);
    }
    Ok(config)
}

/// [`build_config`], then fills in what the user left out: column types are
/// inferred from the data, the tuple shape covers every remaining line, and
/// `--skip` is applied once the column count is known.
pub fn resolve_config(args: &TableArgs) -> Result<ImportConfig> {
    let mut config = build_config(args)?;
    let path = config.input_file_path.clone();
    check_input_file(&path)?;

    if config.column_types.is_empty() {
        let sample = sample_rows(&path, config.start_import_row)?;
        let types = infer_column_types(&sample, &config.delimiters, config.consecutive_delimiters);
        info!(columns = types.len(), "no column types given, using inferred types");
        config = config.with_column_types(types);
    }
    if !args.skip.is_empty() {
        config.skip_mask = skip_mask(&args.skip, config.column_types.len())?;
    }
    if config.tuple_dims.is_empty() {
        let total_lines = scan_file(&path, None)?.total_lines;
        let rows = (total_lines + 1).saturating_sub(config.start_import_row);
        debug!(rows, "no tuple shape given, importing every remaining line");
        config.tuple_dims = vec![rows];
    }
    Ok(config)
}

fn sample_rows(path: &Path, start_row: usize) -> Result<Vec<String>> {
    preview_lines(path, start_row, INFER_SAMPLE_ROWS)
        .with_context(|| format!("read {}", path.display()))
}

/// Turns 1-based `--skip` column numbers into a mask over `columns` columns.
fn skip_mask(skip: &[usize], columns: usize) -> Result<Vec<bool>> {
    let mut mask = vec![false; columns];
    for &column in skip {
        let slot = column
            .checked_sub(1)
            .and_then(|index| mask.get_mut(index))
            .ok_or_else(|| anyhow!("--skip {column} is not a column (1..={columns})"))?;
        *slot = true;
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_mask() {
        assert_eq!(skip_mask(&[1, 3], 3).unwrap(), vec![true, false, true]);
        assert!(skip_mask(&[0], 3).is_err());
        assert!(skip_mask(&[4], 3).is_err());
    }
}
