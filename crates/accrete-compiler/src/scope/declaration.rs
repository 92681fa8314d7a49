use accrete_core::{ReadAccessor, ReadError, Tuple, Value, ValueType};

/// A named variable binding visible inside a rule.
///
/// The declaration is owned by the pattern that bound it. Its value is read by
/// taking the tuple object at `pattern_offset` and applying `accessor`.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    identifier: String,
    pattern_offset: usize,
    accessor: ReadAccessor,
}

impl Declaration {
    pub fn new(identifier: impl Into<String>, pattern_offset: usize, accessor: ReadAccessor) -> Self {
        Self {
            identifier: identifier.into(),
            pattern_offset,
            accessor,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn pattern_offset(&self) -> usize {
        self.pattern_offset
    }

    pub fn accessor(&self) -> &ReadAccessor {
        &self.accessor
    }

    pub fn value_type(&self) -> &ValueType {
        self.accessor.value_type()
    }

    /// Read this declaration's value from a partial match.
    pub fn value<'t>(&self, tuple: &'t Tuple) -> Result<&'t Value, ReadError> {
        self.accessor.read(tuple.object(self.pattern_offset)?)
    }

    /// Read this declaration's value from the object its pattern matched.
    pub fn value_of<'v>(&self, object: &'v Value) -> Result<&'v Value, ReadError> {
        self.accessor.read(object)
    }
}
