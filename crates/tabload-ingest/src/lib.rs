//! Delimited text ingestion.
//!
//! This crate reads line-oriented delimited text files (CSV, TSV,
//! whitespace-separated tables) into typed column arrays of a
//! [`tabload_model::DataStructure`].
//!
//! # Features
//!
//! - **Preflight**: Validate a configuration against the file and the
//!   destination, producing the actions that create the destination arrays
//! - **Streaming Import**: Parse rows one line at a time into typed columns,
//!   with cooperative cancellation and progress reporting
//! - **Header Cache**: Line counts and header text are scanned once per file
//! - **Type Inference**: Suggest column types from sample lines
//!
//! # Example
//!
//! ```ignore
//! use tabload_ingest::{CancelToken, ImportEngine, NoProgress};
//! use tabload_model::{DataStructure, DestinationGroup, ImportConfig, ScalarType};
//!
//! let config = ImportConfig::new("points.csv")
//!     .with_column_types([ScalarType::Float64, ScalarType::Float64])
//!     .with_tuple_dims([100]);
//! let destination = DestinationGroup::New("Imported".into());
//!
//! let mut structure = DataStructure::new();
//! let mut engine = ImportEngine::new();
//! let report = engine.import_into(
//!     &config,
//!     &destination,
//!     &mut structure,
//!     &CancelToken::new(),
//!     &mut NoProgress,
//! )?;
//! ```

mod cache;
mod config;
mod engine;
mod error;
mod factory;
mod import;
mod infer;
mod parser;
mod preflight;
mod progress;
mod text;

// === Error Types ===
pub use error::{IngestError, Result, warning_codes};

// === Text Reading ===
pub use text::{
    FileFingerprint, FileScan, LineReader, SNIFF_LEN, Tokenizer, check_input_file, looks_binary,
    open_text_file, preview_lines, read_line_at, scan_file, split,
};

// === Header Cache ===
pub use cache::{CacheEntry, GENERATED_HEADER_PREFIX, HeaderCache, generated_headers};

// === Column Parsers ===
pub use factory::{build_parsers, destination_paths};
pub use parser::{ColumnParser, ParseError, ParseToken, TypedParser};

// === Validation and Import ===
pub use engine::{ImportEngine, ImportReport};
pub use import::{ImportOutcome, run};
pub use preflight::{ILLEGAL_HEADER_CHARS, Preflight, validate};
pub use progress::{
    CancelToken, MessageSeverity, NoProgress, PROGRESS_STEP, ProgressSink, ProgressTracker,
    TracingProgress,
};

// === Configuration ===
pub use config::{
    import_config_to_json, load_import_config, parse_column_types, parse_import_config,
};
pub use infer::infer_column_types;
