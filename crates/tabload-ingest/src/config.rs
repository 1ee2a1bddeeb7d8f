//! Loading import configurations from JSON files.

use std::path::Path;

use serde::Deserialize;
use tabload_model::{ImportConfig, ScalarType};

use crate::error::{IngestError, Result};

/// On-disk shape: type tags stay strings until each can be checked against
/// its column.
#[derive(Deserialize)]
struct ImportConfigFile {
    #[serde(default)]
    column_types: Vec<String>,
    #[serde(flatten)]
    config: ImportConfig,
}

/// Reads an [`ImportConfig`] from a JSON file.
///
/// Unknown type tags fail with [`IngestError::InvalidArrayType`] naming the
/// 1-based column.
pub fn load_import_config(path: &Path) -> Result<ImportConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
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
    parse_import_config(&text, path)
}

/// Parses an [`ImportConfig`] from JSON text; `origin` is used in errors.
pub fn parse_import_config(text: &str, origin: &Path) -> Result<ImportConfig> {
    let file: ImportConfigFile =
        serde_json::from_str(text).map_err(|e| IngestError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
    let mut config = file.config;
    config.column_types = parse_column_types(&file.column_types)?;
    if config.skip_mask.is_empty() {
        config.skip_mask = vec![false; config.column_types.len()];
    }
    Ok(config)
}

/// Resolves type tags (`int8`, `float64`, `bool`, ...) in column order.
pub fn parse_column_types<S: AsRef<str>>(tags: &[S]) -> Result<Vec<ScalarType>> {
    tags.iter()
        .enumerate()
        .map(|(index, tag)| {
            tag.as_ref()
                .parse::<ScalarType>()
                .map_err(|e| IngestError::InvalidArrayType {
                    column: index + 1,
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Serializes a config in the format [`load_import_config`] reads.
///
/// Fails with [`IngestError::Config`] when a path is not valid UTF-8.
pub fn import_config_to_json(config: &ImportConfig) -> Result<String> {
    serde_json::to_string_pretty(config).map_err(|e| IngestError::Config {
        path: config.input_file_path.clone(),
        reason: e.to_string(),
    })
}
