//! Header and line-count cache.
//!
//! Validation runs repeatedly against the same file (every time a setting
//! changes), and counting lines means reading the whole file. The cache keeps
//! the last scan per engine and only redoes the work that a config change
//! actually invalidates:
//!
//! - new path (or the file changed on disk): one full scan
//! - same file, different header line: re-read just that line
//! - custom header list: no header read, but the line count still comes
//!   from a scan of the current file

use std::path::{Path, PathBuf};

use tabload_model::{HeaderMode, ImportConfig};
use tracing::debug;

use crate::error::Result;
use crate::text::{FileFingerprint, Tokenizer, read_line_at, scan_file};

/// Prefix of generated header names in [`HeaderMode::None`].
pub const GENERATED_HEADER_PREFIX: &str = "Column";

/// Last scan of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub file_path: PathBuf,
    pub fingerprint: FileFingerprint,
    pub total_lines: usize,
    /// Header line captured with `header_raw_text`, 0 if none.
    pub headers_line: usize,
    pub header_raw_text: Option<String>,
}

/// Per-engine scan cache. Dropped with its engine.
#[derive(Debug, Default)]
pub struct HeaderCache {
    entry: Option<CacheEntry>,
    full_scans: usize,
}

impl HeaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry, if any scan has happened.
    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    /// How many full file scans this cache has performed.
    pub fn full_scans(&self) -> usize {
        self.full_scans
    }

    /// Forgets the cached scan.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Total line count of the configured file, scanning only on a change.
    pub fn total_lines(&mut self, config: &ImportConfig) -> Result<usize> {
        Ok(self.refresh(config)?.total_lines)
    }

    /// Resolves the header names for `config`.
    ///
    /// Names read from the file are trimmed; a custom list is returned as
    /// given.
    ///
    /// In [`HeaderMode::LineNumber`] the header line must already have been
    /// range-checked against [`total_lines`](Self::total_lines); a line past
    /// the end yields no headers.
    pub fn ensure_headers(&mut self, config: &ImportConfig) -> Result<Vec<String>> {
        let tokenizer = Tokenizer::new(&config.delimiters, config.consecutive_delimiters);
        match config.header_mode {
            HeaderMode::CustomList => {
                self.refresh(config)?;
                Ok(config.custom_headers.clone())
            }
            HeaderMode::LineNumber => {
                let entry = self.refresh(config)?;
                if entry.headers_line != config.headers_line {
                    debug!(
                        path = %entry.file_path.display(),
                        line = config.headers_line,
                        "re-reading header line"
                    );
                    entry.header_raw_text =
                        read_line_at(&config.input_file_path, config.headers_line)?;
                    entry.headers_line = config.headers_line;
                }
                Ok(entry
                    .header_raw_text
                    .as_deref()
                    .map(|raw| {
                        tokenizer
                            .split(raw)
                            .into_iter()
                            .map(|header| header.trim().to_string())
                            .collect()
                    })
                    .unwrap_or_default())
            }
            HeaderMode::None => {
                self.refresh(config)?;
                let first_data_line =
                    read_line_at(&config.input_file_path, config.start_import_row)?;
                let count = first_data_line
                    .as_deref()
                    .map_or(0, |line| tokenizer.split(line).len());
                Ok(generated_headers(count))
            }
        }
    }

    fn refresh(&mut self, config: &ImportConfig) -> Result<&mut CacheEntry> {
        let path = config.input_file_path.as_path();
        let fingerprint = FileFingerprint::of(path)?;
        let entry = match self.entry.take() {
            Some(entry) if entry.file_path == path && entry.fingerprint == fingerprint => {
                debug!(path = %path.display(), "using cached line count");
                entry
            }
            _ => self.scan(path, fingerprint, config)?,
        };
        Ok(self.entry.insert(entry))
    }

    fn scan(
        &mut self,
        path: &Path,
        fingerprint: FileFingerprint,
        config: &ImportConfig,
    ) -> Result<CacheEntry> {
        let capture = match config.header_mode {
            HeaderMode::LineNumber if config.headers_line > 0 => Some(config.headers_line),
            _ => None,
        };
        let scan = scan_file(path, capture)?;
        self.full_scans += 1;
        debug!(
            path = %path.display(),
            total_lines = scan.total_lines,
            "scanned input file"
        );
        Ok(CacheEntry {
            file_path: path.to_path_buf(),
            fingerprint,
            total_lines: scan.total_lines,
            headers_line: capture.unwrap_or(0),
            header_raw_text: scan.captured_line,
        })
    }
}

/// `Column 1` .. `Column count`.
pub fn generated_headers(count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| format!("{GENERATED_HEADER_PREFIX} {i}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_header_line_is_tokenized_and_trimmed() {
        let file = create_temp_file("a, b ,c\n1,2,3\n");
        let mut cache = HeaderCache::new();
        let config = ImportConfig::new(file.path());
        assert_eq!(cache.ensure_headers(&config).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(cache.total_lines(&config).unwrap(), 2);
        assert_eq!(cache.full_scans(), 1);
    }

    #[test]
    fn test_same_path_does_not_rescan() {
        let file = create_temp_file("a,b\n1,2\n3,4\n");
        let mut cache = HeaderCache::new();
        let config = ImportConfig::new(file.path());
        cache.ensure_headers(&config).unwrap();
        cache.ensure_headers(&config).unwrap();
        cache.total_lines(&config).unwrap();
        assert_eq!(cache.full_scans(), 1);
    }

    #[test]
    fn test_changed_header_line_rereads_only_that_line() {
        let file = create_temp_file("title\nx;y\n1;2\n");
        let mut cache = HeaderCache::new();
        let config = ImportConfig::new(file.path())
            .with_delimiters([';'])
            .with_start_import_row(3);
        assert_eq!(cache.ensure_headers(&config).unwrap(), vec!["title"]);

        let config = config.with_headers_line(2);
        assert_eq!(cache.ensure_headers(&config).unwrap(), vec!["x", "y"]);
        assert_eq!(cache.full_scans(), 1);
        assert_eq!(cache.entry().unwrap().headers_line, 2);
    }

    #[test]
    fn test_new_path_rescans() {
        let first = create_temp_file("a\n1\n");
        let second = create_temp_file("b\n1\n2\n");
        let mut cache = HeaderCache::new();
        assert_eq!(cache.total_lines(&ImportConfig::new(first.path())).unwrap(), 2);
        assert_eq!(cache.total_lines(&ImportConfig::new(second.path())).unwrap(), 3);
        assert_eq!(cache.full_scans(), 2);
    }

    #[test]
    fn test_custom_list_still_counts_lines() {
        let file = create_temp_file("1,2\n3,4\n5,6\n");
        let mut cache = HeaderCache::new();
        let config = ImportConfig::new(file.path())
            .with_custom_headers(["left", " right "])
            .with_start_import_row(1);
        assert_eq!(
            cache.ensure_headers(&config).unwrap(),
            vec!["left", " right "]
        );
        assert_eq!(cache.total_lines(&config).unwrap(), 3);
        assert_eq!(cache.full_scans(), 1);
    }

    #[test]
    fn test_no_header_mode_generates_names() {
        let file = create_temp_file("1 2  3\n4 5 6\n");
        let mut cache = HeaderCache::new();
        let config = ImportConfig::new(file.path())
            .without_headers()
            .with_delimiters([' '])
            .with_consecutive_delimiters(true)
            .with_start_import_row(1);
        assert_eq!(
            cache.ensure_headers(&config).unwrap(),
            vec!["Column 1", "Column 2", "Column 3"]
        );
    }
}
