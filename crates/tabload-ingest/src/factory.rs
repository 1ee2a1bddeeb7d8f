//! Builds one [`ColumnParser`] per imported column.

use std::collections::HashMap;

use tabload_model::{DataArray, DataPath, DataStructure, ScalarType};

use crate::error::{IngestError, Result};
use crate::parser::ColumnParser;

/// Destination path of every header under `group`, in header order.
pub fn destination_paths(group: &DataPath, headers: &[String]) -> Vec<DataPath> {
    headers.iter().map(|header| group.join(header.as_str())).collect()
}

/// Binds a parser to the destination array of every non-skipped column.
///
/// The result is indexed by absolute column position: skipped columns hold
/// `None`, so token `i` of a line always belongs to slot `i`.
pub fn build_parsers<'a>(
    column_types: &[ScalarType],
    skip_mask: &[bool],
    headers: &[String],
    destination_paths: &[DataPath],
    structure: &'a mut DataStructure,
) -> Result<Vec<Option<ColumnParser<'a>>>> {
    let expected = headers.len();
    for (what, actual) in [
        ("column types", column_types.len()),
        ("skip mask", skip_mask.len()),
        ("destination paths", destination_paths.len()),
    ] {
        if actual != expected {
            return Err(IngestError::ColumnCountMismatch {
                what,
                expected,
                actual,
            });
        }
    }

    let mut arrays: HashMap<&DataPath, &'a mut DataArray> = structure.arrays_mut().collect();
    let mut parsers = Vec::with_capacity(headers.len());

    for (index, header) in headers.iter().enumerate() {
        if skip_mask[index] {
            parsers.push(None);
            continue;
        }
        let column = index + 1;
        let path = &destination_paths[index];
        let array = arrays
            .remove(path)
            .ok_or_else(|| IngestError::ArrayNotFound {
                path: path.clone(),
                column,
            })?;
        let declared = column_types[index];
        let stored = array.scalar_type();
        let parser = ColumnParser::bind(declared, &mut array.data, header.as_str(), index)
            .ok_or_else(|| IngestError::InvalidArrayType {
                column,
                reason: format!("declared {declared} but array {path} holds {stored}"),
            })?;
        parsers.push(Some(parser));
    }

    Ok(parsers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabload_model::{Action, ArrayData};

    fn structure_with(arrays: &[(&str, ScalarType)]) -> DataStructure {
        let mut structure = DataStructure::new();
        let mut actions = vec![Action::CreateGroup {
            path: DataPath::parse("G"),
            tuple_dims: vec![2],
        }];
        actions.extend(arrays.iter().map(|(name, ty)| Action::CreateArray {
            scalar_type: *ty,
            tuple_dims: vec![2],
            component_dims: vec![1],
            path: DataPath::parse("G").join(*name),
        }));
        structure.apply(&actions).unwrap();
        structure
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_skipped_columns_keep_their_slot() {
        let mut structure = structure_with(&[("a", ScalarType::Int8), ("c", ScalarType::Float32)]);
        let headers = headers(&["a", "b", "c"]);
        let paths = destination_paths(&DataPath::parse("G"), &headers);
        let types = [ScalarType::Int8, ScalarType::Text, ScalarType::Float32];

        let mut parsers =
            build_parsers(&types, &[false, true, false], &headers, &paths, &mut structure)
                .unwrap();

        assert_eq!(parsers.len(), 3);
        assert!(parsers[1].is_none());
        assert_eq!(parsers[2].as_ref().unwrap().column(), 2);
        parsers[0].as_mut().unwrap().parse("5", 1).unwrap();
        parsers[2].as_mut().unwrap().parse("0.5", 0).unwrap();
        drop(parsers);

        let a = structure.array(&DataPath::parse("G/a")).unwrap();
        assert_eq!(a.data, ArrayData::Int8(vec![0, 5]));
        let c = structure.array(&DataPath::parse("G/c")).unwrap();
        assert_eq!(c.data, ArrayData::Float32(vec![0.5, 0.0]));
    }

    #[test]
    fn test_type_mismatch_names_column() {
        let mut structure = structure_with(&[("a", ScalarType::Int8), ("b", ScalarType::Int8)]);
        let headers = headers(&["a", "b"]);
        let paths = destination_paths(&DataPath::parse("G"), &headers);

        let err = build_parsers(
            &[ScalarType::Int8, ScalarType::UInt64],
            &[false, false],
            &headers,
            &paths,
            &mut structure,
        )
        .unwrap_err();

        assert!(matches!(err, IngestError::InvalidArrayType { column: 2, .. }));
    }

    #[test]
    fn test_missing_array() {
        let mut structure = structure_with(&[("a", ScalarType::Int8)]);
        let headers = headers(&["a", "z"]);
        let paths = destination_paths(&DataPath::parse("G"), &headers);

        let err = build_parsers(
            &[ScalarType::Int8, ScalarType::Int8],
            &[false, false],
            &headers,
            &paths,
            &mut structure,
        )
        .unwrap_err();

        assert!(matches!(err, IngestError::ArrayNotFound { column: 2, .. }));
    }

    #[test]
    fn test_length_mismatch() {
        let mut structure = structure_with(&[]);
        let err = build_parsers(
            &[ScalarType::Int8],
            &[false, false],
            &headers(&["a", "b"]),
            &[],
            &mut structure,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IngestError::ColumnCountMismatch {
                what: "column types",
                expected: 2,
                actual: 1
            }
        ));
    }
}
