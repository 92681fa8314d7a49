//! Partial matches.

use crate::accessor::ReadError;
use crate::value::Value;

/// A partial match: one object per pattern offset, left to right.
///
/// Offsets are assigned by the pattern builder. An accumulate's result pattern
/// sees the aggregate result (a single value, or a list for multi-function
/// accumulates) at its own offset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tuple {
    objects: Vec<Value>,
}

impl Tuple {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, offset: usize) -> Option<&Value> {
        self.objects.get(offset)
    }

    /// Object at `offset`, or a [`ReadError`] naming the missing offset.
    pub fn object(&self, offset: usize) -> Result<&Value, ReadError> {
        self.objects
            .get(offset)
            .ok_or(ReadError::MissingObject { offset })
    }

    pub fn push(&mut self, object: impl Into<Value>) {
        self.objects.push(object.into());
    }

    /// Copy of this tuple with `object` appended at the next offset.
    pub fn extended(&self, object: impl Into<Value>) -> Self {
        let mut objects = self.objects.clone();
        objects.push(object.into());
        Self { objects }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.objects.iter()
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(objects: Vec<Value>) -> Self {
        Self { objects }
    }
}

impl FromIterator<Value> for Tuple {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}
