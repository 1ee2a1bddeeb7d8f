//! Export followed by re-import reproduces the original values exactly.

use proptest::prelude::*;
use tabload_ingest::{CancelToken, ImportEngine, NoProgress};
use tabload_model::{
    ArrayData, DataArray, DataPath, DataStructure, DestinationGroup, ImportConfig, ScalarType,
};
use tabload_output::export_group;
use tempfile::tempdir;

fn column(data: ArrayData) -> DataArray {
    DataArray {
        tuple_dims: vec![data.len()],
        component_dims: vec![1],
        data,
    }
}

fn reimport(
    target: &std::path::Path,
    delimiter: char,
    types: Vec<ScalarType>,
    rows: usize,
) -> DataStructure {
    let config = ImportConfig::new(target)
        .with_delimiters([delimiter])
        .with_column_types(types)
        .with_tuple_dims([rows]);
    let mut structure = DataStructure::new();
    ImportEngine::new()
        .import_into(
            &config,
            &DestinationGroup::New(DataPath::parse("Back")),
            &mut structure,
            &CancelToken::new(),
            &mut NoProgress,
        )
        .unwrap();
    structure
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_export_then_import_is_bit_exact(
        rows in prop::collection::vec(
            (
                any::<i64>(),
                any::<u8>(),
                any::<f32>().prop_filter("finite", |v| v.is_finite()),
                any::<f64>().prop_filter("finite", |v| v.is_finite()),
                any::<bool>(),
            ),
            1..30,
        ),
        delimiter in prop::sample::select(vec![b',', b';', b'\t']),
    ) {
        let dir = tempdir().unwrap();
        let target = dir.path().join("export.txt");
        let group = DataPath::parse("Source");
        let mut source = DataStructure::new();
        source.create_group(&group, vec![rows.len()]).unwrap();
        // Array names sort in column order.
        let columns = [
            ("c1", ArrayData::Int64(rows.iter().map(|r| r.0).collect())),
            ("c2", ArrayData::UInt8(rows.iter().map(|r| r.1).collect())),
            ("c3", ArrayData::Float32(rows.iter().map(|r| r.2).collect())),
            ("c4", ArrayData::Float64(rows.iter().map(|r| r.3).collect())),
            ("c5", ArrayData::Bool(rows.iter().map(|r| r.4).collect())),
        ];
        for (name, data) in columns {
            source.insert_array(&group.join(name), column(data)).unwrap();
        }

        let summary = export_group(&source, &group, &target, delimiter).unwrap();
        prop_assert_eq!(summary.rows, rows.len());
        prop_assert_eq!(summary.columns, 5);

        let back = reimport(
            &target,
            char::from(delimiter),
            vec![
                ScalarType::Int64,
                ScalarType::UInt8,
                ScalarType::Float32,
                ScalarType::Float64,
                ScalarType::Bool,
            ],
            rows.len(),
        );
        let array = |name: &str| &back.array(&DataPath::parse("Back").join(name)).unwrap().data;

        prop_assert_eq!(array("c1").as_slice::<i64>().unwrap(), source.array(&group.join("c1")).unwrap().data.as_slice::<i64>().unwrap());
        prop_assert_eq!(array("c2").as_slice::<u8>().unwrap(), source.array(&group.join("c2")).unwrap().data.as_slice::<u8>().unwrap());
        let f32_bits: Vec<u32> = array("c3").as_slice::<f32>().unwrap().iter().map(|v| v.to_bits()).collect();
        let f32_expected: Vec<u32> = rows.iter().map(|r| r.2.to_bits()).collect();
        prop_assert_eq!(f32_bits, f32_expected);
        let f64_bits: Vec<u64> = array("c4").as_slice::<f64>().unwrap().iter().map(|v| v.to_bits()).collect();
        let f64_expected: Vec<u64> = rows.iter().map(|r| r.3.to_bits()).collect();
        prop_assert_eq!(f64_bits, f64_expected);
        let bools: Vec<bool> = rows.iter().map(|r| r.4).collect();
        prop_assert_eq!(array("c5").as_slice::<bool>().unwrap(), bools.as_slice());
    }
}

#[test]
fn test_exported_file_layout() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("out.csv");
    let group = DataPath::parse("G");
    let mut structure = DataStructure::new();
    structure.create_group(&group, vec![2]).unwrap();
    structure
        .insert_array(&group.join("n"), column(ArrayData::Int16(vec![-3, 7])))
        .unwrap();
    structure
        .insert_array(&group.join("x"), column(ArrayData::Float64(vec![0.1, 2.0])))
        .unwrap();

    export_group(&structure, &group, &target, b',').unwrap();

    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "n,x\n-3,0.1\n7,2\n"
    );
}
