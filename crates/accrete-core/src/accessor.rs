//! Read accessors: how a declaration extracts its value from a tuple object.

use std::sync::Arc;

use crate::types::ValueType;
use crate::value::Value;

/// Failures reading a declaration's value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadError {
    #[error("no object at tuple offset {offset}")]
    MissingObject { offset: usize },

    #[error("expected a fact, found {found}")]
    NotAFact { found: ValueType },

    #[error("`{object_type}` has no field `{field}`")]
    MissingField { object_type: String, field: String },

    #[error("expected a list, found {found}")]
    NotAList { found: ValueType },

    #[error("index {index} out of bounds for result array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Extracts a typed value from the object a declaration's pattern matched.
#[derive(Clone, Debug, PartialEq)]
pub enum ReadAccessor {
    /// The matched object itself (`$o : Order()`, or a single aggregate result).
    SelfReference { value_type: ValueType },

    /// A named field of a fact (`$a : amount`).
    Field { field: String, value_type: ValueType },

    /// Slot `index` of the list produced by `array`.
    ///
    /// Multi-function accumulates bind every result through one shared
    /// self-referencing array reader; the slot is fixed at build time.
    ArrayElement {
        array: Arc<ReadAccessor>,
        index: usize,
        value_type: ValueType,
    },
}

impl ReadAccessor {
    pub fn self_reference(value_type: ValueType) -> Self {
        Self::SelfReference { value_type }
    }

    pub fn field(field: impl Into<String>, value_type: ValueType) -> Self {
        Self::Field {
            field: field.into(),
            value_type,
        }
    }

    pub fn array_element(array: &Arc<ReadAccessor>, index: usize, value_type: ValueType) -> Self {
        Self::ArrayElement {
            array: Arc::clone(array),
            index,
            value_type,
        }
    }

    pub fn value_type(&self) -> &ValueType {
        match self {
            Self::SelfReference { value_type }
            | Self::Field { value_type, .. }
            | Self::ArrayElement { value_type, .. } => value_type,
        }
    }

    /// Slot index for array-element accessors.
    pub fn array_index(&self) -> Option<usize> {
        match self {
            Self::ArrayElement { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Read this accessor's value out of `object`.
    pub fn read<'v>(&self, object: &'v Value) -> Result<&'v Value, ReadError> {
        match self {
            Self::SelfReference { .. } => Ok(object),
            Self::Field { field, .. } => {
                let Value::Fact(fact) = object else {
                    return Err(ReadError::NotAFact {
                        found: object.value_type(),
                    });
                };
                fact.field(field).ok_or_else(|| ReadError::MissingField {
                    object_type: fact.object_type().to_owned(),
                    field: field.clone(),
                })
            }
            Self::ArrayElement { array, index, .. } => {
                let list = array.read(object)?;
                let Value::List(items) = list else {
                    return Err(ReadError::NotAList {
                        found: list.value_type(),
                    });
                };
                items.get(*index).ok_or(ReadError::IndexOutOfBounds {
                    index: *index,
                    len: items.len(),
                })
            }
        }
    }
}
