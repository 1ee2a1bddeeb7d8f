//! Line-oriented access to the input file.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{IngestError, Result};

/// Number of leading bytes inspected by the binary-content check.
pub const SNIFF_LEN: usize = 2048;

const UTF8_BOM: &str = "\u{feff}";

/// Opens a file for reading, telling "missing" apart from "not openable".
pub fn open_text_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileDoesNotExist {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileNotOpen {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Checks that `path` names an existing, readable, text-looking file.
pub fn check_input_file(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(IngestError::EmptyFileReference);
    }
    if !path.is_file() {
        return Err(IngestError::FileDoesNotExist {
            path: path.to_path_buf(),
        });
    }

    let mut file = open_text_file(path)?;
    let mut buffer = Vec::with_capacity(SNIFF_LEN);
    file.by_ref()
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut buffer)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    if looks_binary(&buffer) {
        return Err(IngestError::BinaryFileSuspected {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Binary-content heuristic over a leading sample.
///
/// A sample is suspicious if it holds a control byte other than tab, CR or LF,
/// or if it holds none of those three at all.
pub fn looks_binary(sample: &[u8]) -> bool {
    let mut saw_line_structure = false;
    for &byte in sample {
        match byte {
            b'\t' | b'\r' | b'\n' => saw_line_structure = true,
            0x00..=0x1f | 0x7f => return true,
            _ => {}
        }
    }
    !saw_line_structure
}

/// Identity of a file's contents as far as cheap metadata can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFingerprint {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileFingerprint {
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IngestError::FileDoesNotExist {
                    path: path.to_path_buf(),
                }
            } else {
                IngestError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        Ok(Self {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Buffered line reader that tracks the 1-based number of the last line read.
///
/// Line terminators (`\n` or `\r\n`) are stripped, as is a UTF-8 BOM on the
/// first line. Invalid UTF-8 is replaced rather than rejected.
pub struct LineReader {
    path: PathBuf,
    reader: BufReader<File>,
    raw: Vec<u8>,
    line_number: usize,
}

impl LineReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = open_text_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            raw: Vec::new(),
            line_number: 0,
        })
    }

    /// 1-based number of the line most recently returned (0 before the first).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next line into `line`. Returns `false` at end of file.
    pub fn read_line(&mut self, line: &mut String) -> Result<bool> {
        self.raw.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.raw)
            .map_err(|e| IngestError::FileRead {
                path: self.path.clone(),
                source: e,
            })?;
        if read == 0 {
            return Ok(false);
        }
        self.line_number += 1;

        let mut bytes = self.raw.as_slice();
        if let Some(stripped) = bytes.strip_suffix(b"\n") {
            bytes = stripped;
        }
        if let Some(stripped) = bytes.strip_suffix(b"\r") {
            bytes = stripped;
        }

        line.clear();
        line.push_str(&String::from_utf8_lossy(bytes));
        if self.line_number == 1 && line.starts_with(UTF8_BOM) {
            line.drain(..UTF8_BOM.len());
        }
        Ok(true)
    }

    /// Skips `count` lines. Returns how many were actually skipped.
    pub fn skip_lines(&mut self, count: usize) -> Result<usize> {
        let mut scratch = String::new();
        for skipped in 0..count {
            if !self.read_line(&mut scratch)? {
                return Ok(skipped);
            }
        }
        Ok(count)
    }
}

/// Result of one linear pass over a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScan {
    pub total_lines: usize,
    /// Text of the requested line, if it exists.
    pub captured_line: Option<String>,
}

/// Counts every line and optionally captures one of them (1-based).
pub fn scan_file(path: &Path, capture: Option<usize>) -> Result<FileScan> {
    let mut reader = LineReader::open(path)?;
    let mut line = String::new();
    let mut captured_line = None;
    while reader.read_line(&mut line)? {
        if capture == Some(reader.line_number()) {
            captured_line = Some(line.clone());
        }
    }
    Ok(FileScan {
        total_lines: reader.line_number(),
        captured_line,
    })
}

/// Reads a single 1-based line, stopping as soon as it is found.
pub fn read_line_at(path: &Path, line_number: usize) -> Result<Option<String>> {
    if line_number == 0 {
        return Ok(None);
    }
    let mut reader = LineReader::open(path)?;
    if reader.skip_lines(line_number - 1)? < line_number - 1 {
        return Ok(None);
    }
    let mut line = String::new();
    if reader.read_line(&mut line)? {
        Ok(Some(line))
    } else {
        Ok(None)
    }
}

/// Returns up to `count` raw lines starting at the 1-based `start_row`.
pub fn preview_lines(path: &Path, start_row: usize, count: usize) -> Result<Vec<String>> {
    let mut reader = LineReader::open(path)?;
    let skip = start_row.saturating_sub(1);
    if reader.skip_lines(skip)? < skip {
        return Ok(Vec::new());
    }
    let mut lines = Vec::with_capacity(count.min(1024));
    let mut line = String::new();
    while lines.len() < count && reader.read_line(&mut line)? {
        lines.push(line.clone());
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_looks_binary() {
        assert!(!looks_binary(b"a,b\n1,2\n"));
        assert!(!looks_binary(b"a\tb\r\n"));
        assert!(looks_binary(b"a,b\n\x00\x01"));
        assert!(looks_binary(b"no line structure at all"));
        assert!(looks_binary(b""));
    }

    #[test]
    fn test_check_input_file_errors() {
        assert!(matches!(
            check_input_file(Path::new("")),
            Err(IngestError::EmptyFileReference)
        ));
        assert!(matches!(
            check_input_file(Path::new("/definitely/not/here.csv")),
            Err(IngestError::FileDoesNotExist { .. })
        ));

        let binary = create_temp_file(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00]);
        assert!(matches!(
            check_input_file(binary.path()),
            Err(IngestError::BinaryFileSuspected { .. })
        ));

        let text = create_temp_file(b"a,b\n1,2\n");
        check_input_file(text.path()).unwrap();
    }

    #[test]
    fn test_scan_counts_lines_and_captures() {
        let file = create_temp_file(b"h1,h2\r\n1,2\r\n3,4");
        let scan = scan_file(file.path(), Some(1)).unwrap();
        assert_eq!(scan.total_lines, 3);
        assert_eq!(scan.captured_line.as_deref(), Some("h1,h2"));

        let scan = scan_file(file.path(), Some(7)).unwrap();
        assert_eq!(scan.captured_line, None);
    }

    #[test]
    fn test_trailing_newline_is_not_a_line() {
        let file = create_temp_file(b"a,b,c\n1,2,3\n4,5,6\n");
        assert_eq!(scan_file(file.path(), None).unwrap().total_lines, 3);
    }

    #[test]
    fn test_bom_is_stripped() {
        let file = create_temp_file("\u{feff}x,y\n1,2\n".as_bytes());
        assert_eq!(read_line_at(file.path(), 1).unwrap().as_deref(), Some("x,y"));
    }

    #[test]
    fn test_read_line_at() {
        let file = create_temp_file(b"one\ntwo\nthree\n");
        assert_eq!(read_line_at(file.path(), 2).unwrap().as_deref(), Some("two"));
        assert_eq!(read_line_at(file.path(), 4).unwrap(), None);
        assert_eq!(read_line_at(file.path(), 0).unwrap(), None);
    }

    #[test]
    fn test_preview_lines() {
        let file = create_temp_file(b"h\n1\n2\n3\n");
        assert_eq!(preview_lines(file.path(), 2, 2).unwrap(), vec!["1", "2"]);
        assert_eq!(preview_lines(file.path(), 4, 10).unwrap(), vec!["3"]);
        assert!(preview_lines(file.path(), 9, 10).unwrap().is_empty());
    }
}
