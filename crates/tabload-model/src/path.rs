//! Slash-separated addresses into the data structure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between path components.
pub const PATH_SEPARATOR: char = '/';

/// Address of a group or array, e.g. `Imported/Cell Data/Phase`.
///
/// Empty components are dropped when parsing, so `"/a//b/"` and `"a/b"` name
/// the same node. The empty path is the root and never names a node itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct DataPath(Vec<String>);

impl DataPath {
    /// The root path (no components).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a path from already-split components.
    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            components
                .into_iter()
                .map(Into::into)
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }

    /// Parses a `/`-separated path.
    pub fn parse(value: &str) -> Self {
        Self::from_components(value.split(PATH_SEPARATOR))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// Last component, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Parent path, or `None` for the root.
    pub fn parent(&self) -> Option<DataPath> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Appends one child component.
    #[must_use]
    pub fn join(&self, child: impl Into<String>) -> DataPath {
        let mut components = self.0.clone();
        let child = child.into();
        if !child.is_empty() {
            components.push(child);
        }
        Self(components)
    }

    /// True when `self` is the direct parent of `other`.
    pub fn is_parent_of(&self, other: &DataPath) -> bool {
        other.0.len() == self.0.len() + 1 && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl FromStr for DataPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for DataPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for DataPath {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<DataPath> for String {
    fn from(value: DataPath) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_empty_components() {
        let path = DataPath::parse("/Imported//Cell Data/");
        assert_eq!(path.components(), ["Imported", "Cell Data"]);
        assert_eq!(path.to_string(), "Imported/Cell Data");
    }

    #[test]
    fn parent_and_name() {
        let path = DataPath::parse("a/b/c");
        assert_eq!(path.name(), Some("c"));
        assert_eq!(path.parent(), Some(DataPath::parse("a/b")));
        assert!(DataPath::parse("a/b").is_parent_of(&path));
        assert!(!DataPath::parse("a").is_parent_of(&path));
        assert_eq!(DataPath::root().parent(), None);
    }

    #[test]
    fn join_appends_component() {
        let group = DataPath::parse("Imported");
        assert_eq!(group.join("x").to_string(), "Imported/x");
        assert_eq!(group.join(""), group);
    }
}
