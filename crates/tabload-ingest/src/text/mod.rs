//! Delimited text reading utilities.

mod reader;
mod tokenizer;

pub use reader::{
    FileFingerprint, FileScan, LineReader, SNIFF_LEN, check_input_file, looks_binary,
    open_text_file, preview_lines, read_line_at, scan_file,
};
pub use tokenizer::{Tokenizer, split};
