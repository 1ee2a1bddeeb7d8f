//! Tests for applying actions to the in-memory data structure.

use tabload_model::{
    Action, ArrayData, DataPath, DataStructure, DestinationGroup, ModelError, ScalarType,
    StructureView,
};

fn create_array(path: &str, scalar_type: ScalarType, tuples: usize) -> Action {
    Action::CreateArray {
        scalar_type,
        tuple_dims: vec![tuples],
        component_dims: vec![1],
        path: DataPath::parse(path),
    }
}

#[test]
fn apply_creates_group_and_arrays() {
    let mut structure = DataStructure::new();
    let actions = vec![
        Action::CreateGroup {
            path: DataPath::parse("Imported"),
            tuple_dims: vec![3],
        },
        create_array("Imported/a", ScalarType::Int8, 3),
        create_array("Imported/b", ScalarType::Float64, 3),
    ];

    structure.apply(&actions).expect("apply actions");

    let group = DataPath::parse("Imported");
    assert!(structure.exists(&group));
    assert_eq!(structure.group_shape(&group), Some(vec![3]));
    assert_eq!(structure.child_names(&group), vec!["a", "b"]);

    let a = structure.array(&group.join("a")).unwrap();
    assert_eq!(a.data, ArrayData::Int8(vec![0, 0, 0]));
    assert_eq!(a.tuple_count(), 3);
    let b = structure.array(&group.join("b")).unwrap();
    assert_eq!(b.scalar_type(), ScalarType::Float64);
}

#[test]
fn apply_rejects_missing_parent() {
    let mut structure = DataStructure::new();
    let err = structure
        .apply(&[create_array("Missing/a", ScalarType::Int32, 1)])
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::ParentNotFound {
            path: DataPath::parse("Missing")
        }
    );
}

#[test]
fn apply_rejects_duplicate_path() {
    let mut structure = DataStructure::new();
    structure
        .create_group(&DataPath::parse("G"), vec![1])
        .unwrap();
    let err = structure
        .apply(&[Action::CreateGroup {
            path: DataPath::parse("G"),
            tuple_dims: vec![1],
        }])
        .unwrap_err();
    assert!(matches!(err, ModelError::AlreadyExists { .. }));
}

#[test]
fn arrays_cannot_hold_children() {
    let mut structure = DataStructure::new();
    structure
        .apply(&[
            Action::CreateGroup {
                path: DataPath::parse("G"),
                tuple_dims: vec![1],
            },
            create_array("G/a", ScalarType::UInt8, 1),
        ])
        .unwrap();
    let err = structure
        .apply(&[create_array("G/a/b", ScalarType::UInt8, 1)])
        .unwrap_err();
    assert!(matches!(err, ModelError::NotAGroup { .. }));
}

#[test]
fn typed_views_match_element_type() {
    let mut structure = DataStructure::new();
    structure
        .apply(&[
            Action::CreateGroup {
                path: DataPath::parse("G"),
                tuple_dims: vec![2],
            },
            create_array("G/x", ScalarType::UInt16, 2),
        ])
        .unwrap();

    let path = DataPath::parse("G/x");
    {
        let array = structure.array_mut(&path).unwrap();
        let values = array.data.as_vec_mut::<u16>().expect("u16 storage");
        values[1] = 65535;
        assert!(array.data.as_vec_mut::<i16>().is_none());
    }
    let array = structure.array(&path).unwrap();
    assert_eq!(array.data.as_slice::<u16>(), Some(&[0u16, 65535][..]));
    assert_eq!(array.data.value_string(1).as_deref(), Some("65535"));
}

#[test]
fn arrays_mut_yields_disjoint_borrows() {
    let mut structure = DataStructure::new();
    structure
        .apply(&[
            Action::CreateGroup {
                path: DataPath::parse("G"),
                tuple_dims: vec![1],
            },
            create_array("G/a", ScalarType::Int32, 1),
            create_array("G/b", ScalarType::Int32, 1),
        ])
        .unwrap();

    let mut borrowed: Vec<_> = structure.arrays_mut().map(|(_, array)| array).collect();
    assert_eq!(borrowed.len(), 2);
    for (i, array) in borrowed.iter_mut().enumerate() {
        array.data.as_vec_mut::<i32>().unwrap()[0] = i as i32 + 10;
    }

    let group = DataPath::parse("G");
    let values: Vec<_> = structure
        .arrays_in(&group)
        .map(|(_, array)| array.data.value_string(0).unwrap())
        .collect();
    assert_eq!(values, vec!["10", "11"]);
}

#[test]
fn destination_group_serializes_with_kind() {
    let destination = DestinationGroup::New(DataPath::parse("Imported/Data"));
    let json = serde_json::to_string(&destination).unwrap();
    assert_eq!(json, r#"{"kind":"new","path":"Imported/Data"}"#);
    let back: DestinationGroup = serde_json::from_str(&json).unwrap();
    assert_eq!(back, destination);
    assert!(!back.is_existing());
}
