//! Structural actions produced by preflight and applied by the host.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::DataPath;
use crate::types::ScalarType;

/// Where the imported arrays go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum DestinationGroup {
    /// Group that already exists; its tuple shape wins over the configured one.
    Existing(DataPath),
    /// Group created by the import; the path must be free.
    New(DataPath),
}

impl DestinationGroup {
    pub fn path(&self) -> &DataPath {
        match self {
            Self::Existing(path) | Self::New(path) => path,
        }
    }

    pub fn is_existing(&self) -> bool {
        matches!(self, Self::Existing(_))
    }
}

/// One structural change. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    CreateGroup {
        path: DataPath,
        tuple_dims: Vec<usize>,
    },
    CreateArray {
        scalar_type: ScalarType,
        tuple_dims: Vec<usize>,
        component_dims: Vec<usize>,
        path: DataPath,
    },
}

impl Action {
    pub fn path(&self) -> &DataPath {
        match self {
            Self::CreateGroup { path, .. } | Self::CreateArray { path, .. } => path,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateGroup { path, tuple_dims } => {
                write!(f, "create group {path} {tuple_dims:?}")
            }
            Self::CreateArray {
                scalar_type,
                tuple_dims,
                component_dims,
                path,
            } => write!(
                f,
                "create {scalar_type} array {path} {tuple_dims:?}x{component_dims:?}"
            ),
        }
    }
}

/// Non-blocking preflight finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: i32,
    pub message: String,
}

impl Warning {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
