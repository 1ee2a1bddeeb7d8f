//! CLI argument definitions for tabload.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tabload",
    version,
    about = "Import delimited text files into typed column arrays",
    long_about = "Import delimited text files (CSV, TSV, whitespace tables) into typed column arrays.\n\n\
                  Every import is validated first: header names, row ranges, column types and\n\
                  the destination group are checked before any data is read."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the raw lines of a file.
    Preview(PreviewArgs),

    /// Suggest a type for every column from sample rows.
    Infer(InferArgs),

    /// Check an import and list the arrays it would create.
    Validate(TableArgs),

    /// Import a file and print a summary of the imported arrays.
    Import(ImportArgs),
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Text file to show.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// First line to show (1-based).
    #[arg(long = "start-row", default_value_t = 1)]
    pub start_row: usize,

    /// Number of lines to show.
    #[arg(short = 'n', long = "lines", default_value_t = 10)]
    pub lines: usize,
}

#[derive(Args)]
pub struct InferArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Number of data rows to sample.
    #[arg(long = "sample", default_value_t = 100)]
    pub sample: usize,
}

/// How to read a file; shared by `infer`, `validate` and `import`.
///
/// Flags override the values of a `--config` file.
#[derive(Args, Clone, Debug)]
pub struct TableArgs {
    /// Delimited text file to read.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Import configuration file (JSON).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Delimiter character; repeat for several (also: tab, space, comma, semicolon).
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        value_parser = parse_delimiter
    )]
    pub delimiters: Vec<char>,

    /// Treat runs of delimiters as one.
    #[arg(long = "collapse")]
    pub collapse: bool,

    /// Line holding the column names (1-based).
    #[arg(long = "headers-line", value_name = "LINE", conflicts_with_all = ["headers", "no_headers"])]
    pub headers_line: Option<usize>,

    /// Column names, comma separated, instead of a header line.
    #[arg(
        long = "headers",
        value_name = "NAMES",
        value_delimiter = ',',
        conflicts_with = "no_headers"
    )]
    pub headers: Vec<String>,

    /// The file has no header line; columns are named "Column 1", "Column 2", ...
    /// Data then starts on line 1 unless --start-row says otherwise.
    #[arg(long = "no-headers")]
    pub no_headers: bool,

    /// First data line (1-based). Defaults to 2, or 1 with --no-headers.
    #[arg(long = "start-row", value_name = "ROW")]
    pub start_row: Option<usize>,

    /// Column types, comma separated (int8..uint64, float32, float64, bool, text).
    ///
    /// Inferred from the data when neither this flag nor the config sets them.
    #[arg(long = "types", value_name = "TYPES", value_delimiter = ',')]
    pub types: Vec<String>,

    /// Columns to leave out (1-based, comma separated).
    #[arg(long = "skip", value_name = "COLUMNS", value_delimiter = ',')]
    pub skip: Vec<usize>,

    /// Tuple shape of the imported arrays, comma separated.
    ///
    /// Defaults to every line from the start row to the end of the file.
    #[arg(long = "tuple-dims", value_name = "DIMS", value_delimiter = ',')]
    pub tuple_dims: Vec<usize>,

    /// Destination group path.
    #[arg(long = "group", value_name = "PATH", default_value = "Imported")]
    pub group: String,
}

#[derive(Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Export the imported group to a delimited file.
    #[arg(long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Delimiter used for --export.
    #[arg(
        long = "export-delimiter",
        value_name = "CHAR",
        default_value = ",",
        value_parser = parse_delimiter
    )]
    pub export_delimiter: char,

    /// Save the effective import configuration as JSON.
    #[arg(long = "save-config", value_name = "PATH")]
    pub save_config: Option<PathBuf>,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Accepts a single character or one of the names `tab`, `space`, `comma`,
/// `semicolon`, `pipe`.
pub fn parse_delimiter(value: &str) -> Result<char, String> {
    match value {
        "tab" | "\\t" => return Ok('\t'),
        "space" => return Ok(' '),
        "comma" => return Ok(','),
        "semicolon" => return Ok(';'),
        "pipe" => return Ok('|'),
        _ => {}
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && c != '\n' && c != '\r' => Ok(c),
        _ => Err(format!(
            "'{value}' is not a single ASCII delimiter character"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(','));
        assert_eq!(parse_delimiter("tab"), Ok('\t'));
        assert_eq!(parse_delimiter("\\t"), Ok('\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn test_import_flags_parse() {
        let cli = Cli::try_parse_from([
            "tabload",
            "import",
            "data.csv",
            "-d",
            "tab",
            "-d",
            " ",
            "--types",
            "int8,float64",
            "--skip",
            "2",
            "--tuple-dims",
            "4,5",
        ])
        .unwrap();
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.table.delimiters, vec!['\t', ' ']);
        assert_eq!(args.table.types, vec!["int8", "float64"]);
        assert_eq!(args.table.skip, vec![2]);
        assert_eq!(args.table.tuple_dims, vec![4, 5]);
        assert_eq!(args.table.group, "Imported");
        assert_eq!(args.export_delimiter, ',');
    }

    #[test]
    fn test_header_flags_conflict() {
        let result = Cli::try_parse_from([
            "tabload",
            "validate",
            "data.csv",
            "--headers",
            "a,b",
            "--no-headers",
        ]);
        assert!(result.is_err());
    }
}
