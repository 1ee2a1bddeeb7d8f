//! Scalar element types for imported columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Element type of one imported column.
///
/// Tags are lower-case (`int8`, `uint16`, `float32`, `bool`, `text`).
/// `float`, `double`, `boolean` and `string` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    #[serde(alias = "float")]
    Float32,
    #[serde(alias = "double")]
    Float64,
    #[serde(alias = "boolean")]
    Bool,
    #[serde(alias = "string")]
    Text,
}

impl ScalarType {
    /// Every supported type, narrowest integers first.
    pub const ALL: [ScalarType; 12] = [
        ScalarType::Int8,
        ScalarType::UInt8,
        ScalarType::Int16,
        ScalarType::UInt16,
        ScalarType::Int32,
        ScalarType::UInt32,
        ScalarType::Int64,
        ScalarType::UInt64,
        ScalarType::Float32,
        ScalarType::Float64,
        ScalarType::Bool,
        ScalarType::Text,
    ];

    /// Canonical tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Text => "text",
        }
    }

    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::UInt8
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Int64
                | Self::UInt64
        )
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Size of one element in bytes; `None` for variable-width text.
    pub const fn byte_width(&self) -> Option<usize> {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bool => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::Text => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = ModelError;

    /// Parses a type tag (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let parsed = match normalized.as_str() {
            "int8" => Self::Int8,
            "uint8" => Self::UInt8,
            "int16" => Self::Int16,
            "uint16" => Self::UInt16,
            "int32" => Self::Int32,
            "uint32" => Self::UInt32,
            "int64" => Self::Int64,
            "uint64" => Self::UInt64,
            "float32" | "float" => Self::Float32,
            "float64" | "double" => Self::Float64,
            "bool" | "boolean" => Self::Bool,
            "text" | "string" => Self::Text,
            _ => return Err(ModelError::UnknownScalarType(s.to_string())),
        };
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_from_str() {
        for ty in ScalarType::ALL {
            assert_eq!(ty.as_str().parse::<ScalarType>().unwrap(), ty);
        }
    }

    #[test]
    fn aliases_are_accepted() {
        assert_eq!("Double".parse::<ScalarType>().unwrap(), ScalarType::Float64);
        assert_eq!(" float ".parse::<ScalarType>().unwrap(), ScalarType::Float32);
        assert_eq!("string".parse::<ScalarType>().unwrap(), ScalarType::Text);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "complex128".parse::<ScalarType>().unwrap_err();
        assert!(matches!(err, ModelError::UnknownScalarType(tag) if tag == "complex128"));
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&ScalarType::UInt16).unwrap();
        assert_eq!(json, "\"uint16\"");
        let parsed: ScalarType = serde_json::from_str("\"double\"").unwrap();
        assert_eq!(parsed, ScalarType::Float64);
    }
}
