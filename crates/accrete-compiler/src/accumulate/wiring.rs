use std::sync::Arc;

use accrete_core::{ReadAccessor, ValueType};

/// Builds the accessors through which result bindings read aggregate outputs.
///
/// Multi-function nodes produce a list; every binding reads one slot of it
/// through the same self-array reader.
#[derive(Clone, Debug)]
pub(crate) struct ResultWiring {
    array: Option<Arc<ReadAccessor>>,
}

impl ResultWiring {
    pub(crate) fn for_functions(count: usize) -> Self {
        let array =
            (count > 1).then(|| Arc::new(ReadAccessor::self_reference(ValueType::List)));
        Self { array }
    }

    pub(crate) fn accessor(&self, index: usize, value_type: ValueType) -> ReadAccessor {
        match &self.array {
            Some(array) => ReadAccessor::array_element(array, index, value_type),
            None => ReadAccessor::self_reference(value_type),
        }
    }
}
