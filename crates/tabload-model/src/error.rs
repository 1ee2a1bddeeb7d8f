//! Error types for the data model.

use thiserror::Error;

use crate::path::DataPath;

/// Errors raised by the model types and by applying actions to a
/// [`DataStructure`](crate::DataStructure).
///
/// [`ScalarType`]: crate::ScalarType
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Type tag that does not name a [`ScalarType`].
    #[error("unknown scalar type tag '{0}'")]
    UnknownScalarType(String),

    /// The root path cannot hold a node.
    #[error("path is empty")]
    EmptyPath,

    #[error("node already exists at {path}")]
    AlreadyExists { path: DataPath },

    #[error("parent group {path} does not exist")]
    ParentNotFound { path: DataPath },

    #[error("{path} is not a group")]
    NotAGroup { path: DataPath },

    #[error("no node at {path}")]
    NotFound { path: DataPath },

    /// Tuple and component shape multiply past `usize::MAX`.
    #[error("shape of array {path} is too large")]
    ShapeOverflow { path: DataPath },
}

pub type Result<T> = std::result::Result<T, ModelError>;
