//! Data model shared by the tabload crates.
//!
//! - [`ImportConfig`] / [`HeaderMode`]: what to import and how to read it
//! - [`ScalarType`]: element type tags for imported columns
//! - [`DataPath`], [`DestinationGroup`]: where the results go
//! - [`Action`], [`Warning`]: the plan produced by preflight
//! - [`DataStructure`]: in-memory host structure that applies actions and
//!   owns the typed arrays the importer writes into

mod action;
mod config;
mod error;
mod path;
mod structure;
mod types;

pub use action::{Action, DestinationGroup, Warning};
pub use config::{HeaderMode, ImportConfig, tuple_count};
pub use error::{ModelError, Result};
pub use path::{DataPath, PATH_SEPARATOR};
pub use structure::{ArrayData, DataArray, DataStructure, Element, Group, StructureView};
pub use types::ScalarType;
