//! Streaming import of data rows into bound column parsers.

use tabload_model::ImportConfig;
use tracing::{debug, info, info_span};

use crate::error::{IngestError, Result};
use crate::parser::{ColumnParser, ParseError};
use crate::progress::{CancelToken, ProgressSink, ProgressTracker};
use crate::text::{LineReader, Tokenizer};

/// What a finished (or cancelled) import did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Rows fully parsed into every imported column.
    pub rows_imported: usize,
    /// Rows the import was asked for.
    pub rows_expected: usize,
    pub cancelled: bool,
}

impl ImportOutcome {
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.rows_imported == self.rows_expected
    }
}

/// Reads `tuple_count` rows starting at `config.start_import_row` and feeds
/// every token to the parser in its column slot.
///
/// Cancellation is checked before each row and ends the import successfully.
/// On a parse failure the import stops; rows already written stay written.
pub fn run<P: ProgressSink + ?Sized>(
    config: &ImportConfig,
    tuple_count: usize,
    parsers: &mut [Option<ColumnParser<'_>>],
    cancel: &CancelToken,
    progress: &mut P,
) -> Result<ImportOutcome> {
    let path = config.input_file_path.as_path();
    let span = info_span!("import", path = %path.display(), rows = tuple_count);
    let _guard = span.enter();

    for parser in parsers.iter().flatten() {
        if parser.capacity() < tuple_count {
            return Err(IngestError::ArrayTooShort {
                header: parser.header().to_string(),
                capacity: parser.capacity(),
                expected: tuple_count,
            });
        }
    }

    let mut reader = LineReader::open(path)?;
    let skip = config.start_import_row.saturating_sub(1);
    let skipped = reader.skip_lines(skip)?;
    if skipped < skip {
        return Err(IngestError::CannotSkipToRow {
            row: config.start_import_row,
            lines_read: skipped,
        });
    }

    let tokenizer = Tokenizer::new(&config.delimiters, config.consecutive_delimiters);
    let column_count = parsers.len();
    let mut tracker = ProgressTracker::new(tuple_count);
    let mut line = String::new();
    info!("importing {tuple_count} rows");

    for row in 0..tuple_count {
        if cancel.is_cancelled() {
            info!(rows_imported = row, "import cancelled");
            return Ok(ImportOutcome {
                rows_imported: row,
                rows_expected: tuple_count,
                cancelled: true,
            });
        }

        if !reader.read_line(&mut line)? {
            return Err(IngestError::UnexpectedEndOfFile {
                line: reader.line_number() + 1,
                expected: tuple_count,
            });
        }
        let line_number = reader.line_number();

        let tokens = tokenizer.split(&line);
        if tokens.is_empty() {
            return Err(IngestError::EmptyDataLine {
                line: line_number,
                text: line.clone(),
            });
        }
        if tokens.len() != column_count {
            return Err(IngestError::InconsistentColumnCount {
                line: line_number,
                expected: column_count,
                actual: tokens.len(),
                text: line.clone(),
            });
        }

        for (slot, token) in parsers.iter_mut().zip(&tokens) {
            let Some(parser) = slot else {
                continue;
            };
            if let Err(e) = parser.parse(token, row) {
                return Err(column_error(parser, e, line_number, token));
            }
        }

        if let Some(percent) = tracker.advance(row + 1) {
            progress.progress(percent);
        }
    }

    debug!(rows_imported = tuple_count, "import finished");
    Ok(ImportOutcome {
        rows_imported: tuple_count,
        rows_expected: tuple_count,
        cancelled: false,
    })
}

fn column_error(
    parser: &ColumnParser<'_>,
    error: ParseError,
    line: usize,
    token: &str,
) -> IngestError {
    let header = parser.header().to_string();
    let scalar_type = parser.scalar_type();
    match error {
        ParseError::Overflow => IngestError::Overflow {
            header,
            line,
            token: token.to_string(),
            scalar_type,
        },
        ParseError::InvalidArgument => IngestError::InvalidArgument {
            header,
            line,
            token: token.to_string(),
            scalar_type,
        },
        ParseError::RowOutOfBounds { len, .. } => IngestError::ArrayTooShort {
            header,
            capacity: len,
            expected: len + 1,
        },
    }
}
