use accrete_core::{ReadAccessor, ValueType};
use indexmap::IndexMap;

use super::Declaration;

/// A pattern: matches one object per tuple at a fixed offset and owns the
/// declarations bound on it.
///
/// The pattern consuming an accumulate's output is the *result pattern*;
/// declarations bound to aggregate results are added to it by the builder.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    offset: usize,
    object_type: ValueType,
    declarations: IndexMap<String, Declaration>,
    /// Whether the pattern reads from a nested source (`from`/`accumulate`).
    nested_source: bool,
}

impl Pattern {
    pub fn new(offset: usize, object_type: ValueType) -> Self {
        Self {
            offset,
            object_type,
            declarations: IndexMap::new(),
            nested_source: false,
        }
    }

    /// Mark this pattern as fed by a nested source.
    pub fn with_nested_source(mut self) -> Self {
        self.nested_source = true;
        self
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn object_type(&self) -> &ValueType {
        &self.object_type
    }

    pub fn has_nested_source(&self) -> bool {
        self.nested_source
    }

    /// Bind `identifier` on this pattern.
    ///
    /// An existing declaration with the same identifier is replaced; callers
    /// check [`declaration`](Self::declaration) first when duplicates matter.
    pub fn add_declaration(&mut self, identifier: &str, accessor: ReadAccessor) -> &Declaration {
        let declaration = Declaration::new(identifier, self.offset, accessor);
        self.declarations.insert(identifier.to_owned(), declaration);
        &self.declarations[identifier]
    }

    pub fn declaration(&self, identifier: &str) -> Option<&Declaration> {
        self.declarations.get(identifier)
    }

    /// Declarations in binding order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }
}
