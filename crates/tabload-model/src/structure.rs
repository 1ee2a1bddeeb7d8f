//! In-memory destination structure: groups with a tuple shape, and typed
//! arrays addressed by [`DataPath`].
//!
//! The import engine only reads it through [`StructureView`]; all mutation
//! goes through [`DataStructure::apply`] with the actions preflight produced.

use std::collections::BTreeMap;

use crate::action::Action;
use crate::config::tuple_count;
use crate::error::{ModelError, Result};
use crate::path::DataPath;
use crate::types::ScalarType;

/// Read-only queries the engine needs from the host structure.
pub trait StructureView {
    fn exists(&self, path: &DataPath) -> bool;

    /// Names of the direct children of a group (empty if `path` is not a group).
    fn child_names(&self, path: &DataPath) -> Vec<String>;

    /// Tuple shape of a group, `None` if `path` is not a group.
    fn group_shape(&self, path: &DataPath) -> Option<Vec<usize>>;
}

/// A container node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub tuple_dims: Vec<usize>,
}

/// Typed element storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
}

impl ArrayData {
    /// Default-initialized storage of `len` elements.
    pub fn zeroed(scalar_type: ScalarType, len: usize) -> Self {
        match scalar_type {
            ScalarType::Int8 => Self::Int8(vec![0; len]),
            ScalarType::UInt8 => Self::UInt8(vec![0; len]),
            ScalarType::Int16 => Self::Int16(vec![0; len]),
            ScalarType::UInt16 => Self::UInt16(vec![0; len]),
            ScalarType::Int32 => Self::Int32(vec![0; len]),
            ScalarType::UInt32 => Self::UInt32(vec![0; len]),
            ScalarType::Int64 => Self::Int64(vec![0; len]),
            ScalarType::UInt64 => Self::UInt64(vec![0; len]),
            ScalarType::Float32 => Self::Float32(vec![0.0; len]),
            ScalarType::Float64 => Self::Float64(vec![0.0; len]),
            ScalarType::Bool => Self::Bool(vec![false; len]),
            ScalarType::Text => Self::Text(vec![String::new(); len]),
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Int8(_) => ScalarType::Int8,
            Self::UInt8(_) => ScalarType::UInt8,
            Self::Int16(_) => ScalarType::Int16,
            Self::UInt16(_) => ScalarType::UInt16,
            Self::Int32(_) => ScalarType::Int32,
            Self::UInt32(_) => ScalarType::UInt32,
            Self::Int64(_) => ScalarType::Int64,
            Self::UInt64(_) => ScalarType::UInt64,
            Self::Float32(_) => ScalarType::Float32,
            Self::Float64(_) => ScalarType::Float64,
            Self::Bool(_) => ScalarType::Bool,
            Self::Text(_) => ScalarType::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element rendered as text. Floats use the shortest representation
    /// that parses back to the same bits.
    pub fn value_string(&self, index: usize) -> Option<String> {
        let text = match self {
            Self::Int8(v) => v.get(index)?.to_string(),
            Self::UInt8(v) => v.get(index)?.to_string(),
            Self::Int16(v) => v.get(index)?.to_string(),
            Self::UInt16(v) => v.get(index)?.to_string(),
            Self::Int32(v) => v.get(index)?.to_string(),
            Self::UInt32(v) => v.get(index)?.to_string(),
            Self::Int64(v) => v.get(index)?.to_string(),
            Self::UInt64(v) => v.get(index)?.to_string(),
            Self::Float32(v) => v.get(index)?.to_string(),
            Self::Float64(v) => v.get(index)?.to_string(),
            Self::Bool(v) => v.get(index)?.to_string(),
            Self::Text(v) => v.get(index)?.clone(),
        };
        Some(text)
    }

    /// Typed view; `None` when `T` is not this array's element type.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::view(self).map(Vec::as_slice)
    }

    /// Typed mutable storage; `None` when `T` is not this array's element type.
    pub fn as_vec_mut<T: Element>(&mut self) -> Option<&mut Vec<T>> {
        T::view_mut(self)
    }
}

/// Rust element type stored by one [`ArrayData`] variant.
pub trait Element: Sized + 'static {
    const SCALAR_TYPE: ScalarType;

    fn view(data: &ArrayData) -> Option<&Vec<Self>>;

    fn view_mut(data: &mut ArrayData) -> Option<&mut Vec<Self>>;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const SCALAR_TYPE: ScalarType = ScalarType::$variant;

                fn view(data: &ArrayData) -> Option<&Vec<Self>> {
                    match data {
                        ArrayData::$variant(values) => Some(values),
                        _ => None,
                    }
                }

                fn view_mut(data: &mut ArrayData) -> Option<&mut Vec<Self>> {
                    match data {
                        ArrayData::$variant(values) => Some(values),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_element!(
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    bool => Bool,
    String => Text,
);

/// A typed array with a tuple shape and a per-tuple component shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    pub tuple_dims: Vec<usize>,
    pub component_dims: Vec<usize>,
    pub data: ArrayData,
}

impl DataArray {
    pub fn scalar_type(&self) -> ScalarType {
        self.data.scalar_type()
    }

    pub fn tuple_count(&self) -> usize {
        tuple_count(&self.tuple_dims).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Group(Group),
    Array(DataArray),
}

/// Tree of groups and arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStructure {
    nodes: BTreeMap<DataPath, Node>,
}

impl DataStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a group. The parent must be the root or an existing group.
    pub fn create_group(&mut self, path: &DataPath, tuple_dims: Vec<usize>) -> Result<()> {
        self.check_insertable(path)?;
        self.nodes
            .insert(path.clone(), Node::Group(Group { tuple_dims }));
        Ok(())
    }

    /// Creates a default-initialized array.
    pub fn create_array(
        &mut self,
        path: &DataPath,
        scalar_type: ScalarType,
        tuple_dims: Vec<usize>,
        component_dims: Vec<usize>,
    ) -> Result<()> {
        self.check_insertable(path)?;
        let len = tuple_count(&tuple_dims)
            .zip(tuple_count(&component_dims))
            .and_then(|(tuples, components)| tuples.checked_mul(components))
            .ok_or_else(|| ModelError::ShapeOverflow { path: path.clone() })?;
        self.nodes.insert(
            path.clone(),
            Node::Array(DataArray {
                tuple_dims,
                component_dims,
                data: ArrayData::zeroed(scalar_type, len),
            }),
        );
        Ok(())
    }

    /// Inserts a fully built array (used when assembling fixtures or results
    /// from other sources).
    pub fn insert_array(&mut self, path: &DataPath, array: DataArray) -> Result<()> {
        self.check_insertable(path)?;
        self.nodes.insert(path.clone(), Node::Array(array));
        Ok(())
    }

    /// Applies preflight actions in order. Stops at the first failure;
    /// actions applied before it stay applied.
    pub fn apply(&mut self, actions: &[Action]) -> Result<()> {
        for action in actions {
            match action {
                Action::CreateGroup { path, tuple_dims } => {
                    self.create_group(path, tuple_dims.clone())?;
                }
                Action::CreateArray {
                    scalar_type,
                    tuple_dims,
                    component_dims,
                    path,
                } => {
                    self.create_array(
                        path,
                        *scalar_type,
                        tuple_dims.clone(),
                        component_dims.clone(),
                    )?;
                }
            }
        }
        Ok(())
    }

    pub fn array(&self, path: &DataPath) -> Option<&DataArray> {
        match self.nodes.get(path)? {
            Node::Array(array) => Some(array),
            Node::Group(_) => None,
        }
    }

    pub fn array_mut(&mut self, path: &DataPath) -> Option<&mut DataArray> {
        match self.nodes.get_mut(path)? {
            Node::Array(array) => Some(array),
            Node::Group(_) => None,
        }
    }

    pub fn group(&self, path: &DataPath) -> Option<&Group> {
        match self.nodes.get(path)? {
            Node::Group(group) => Some(group),
            Node::Array(_) => None,
        }
    }

    /// Mutable access to every array at once. Borrows are disjoint, so callers
    /// can hold several of them simultaneously.
    pub fn arrays_mut(&mut self) -> impl Iterator<Item = (&DataPath, &mut DataArray)> {
        self.nodes.iter_mut().filter_map(|(path, node)| match node {
            Node::Array(array) => Some((path, array)),
            Node::Group(_) => None,
        })
    }

    /// Arrays directly under `group`, in path order.
    pub fn arrays_in<'a>(
        &'a self,
        group: &'a DataPath,
    ) -> impl Iterator<Item = (&'a DataPath, &'a DataArray)> + 'a {
        self.nodes
            .iter()
            .filter(move |(path, _)| group.is_parent_of(path))
            .filter_map(|(path, node)| match node {
                Node::Array(array) => Some((path, array)),
                Node::Group(_) => None,
            })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn check_insertable(&self, path: &DataPath) -> Result<()> {
        let parent = path.parent().ok_or(ModelError::EmptyPath)?;
        if self.nodes.contains_key(path) {
            return Err(ModelError::AlreadyExists { path: path.clone() });
        }
        if parent.is_root() {
            return Ok(());
        }
        match self.nodes.get(&parent) {
            Some(Node::Group(_)) => Ok(()),
            Some(Node::Array(_)) => Err(ModelError::NotAGroup { path: parent }),
            None => Err(ModelError::ParentNotFound { path: parent }),
        }
    }
}

impl StructureView for DataStructure {
    fn exists(&self, path: &DataPath) -> bool {
        self.nodes.contains_key(path)
    }

    fn child_names(&self, path: &DataPath) -> Vec<String> {
        if !path.is_root() && self.group(path).is_none() {
            return Vec::new();
        }
        self.nodes
            .keys()
            .filter(|child| path.is_parent_of(child))
            .filter_map(|child| child.name().map(str::to_string))
            .collect()
    }

    fn group_shape(&self, path: &DataPath) -> Option<Vec<usize>> {
        self.group(path).map(|group| group.tuple_dims.clone())
    }
}
