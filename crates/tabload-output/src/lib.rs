//! Output for tabload.
//!
//! Provides the atomic file writer used for every file the tool produces and
//! the delimited export of imported groups.
//!
//! # Atomic Writes
//!
//! Output is staged in a randomized directory next to the target and renamed
//! into place only on commit. An uncommitted [`AtomicFile`] cleans up its
//! staging directory when dropped, so errors and cancellation never leave a
//! partially written target behind.

mod atomic;
mod error;
mod export;

// === Error Types ===
pub use error::{OutputError, Result};

// === Atomic Writer ===
pub use atomic::{AtomicFile, write_atomically};

// === Export ===
pub use export::{ExportSummary, export_group};
