//! Aggregate function registry.
//!
//! Maps function names (`sum`, `count`, ...) to shared [`AggregateFunction`]
//! implementations. A registry is filled once, then only read.

mod builtin;
mod function;


use std::sync::Arc;

use indexmap::IndexMap;

pub use builtin::{Average, CollectList, CollectSet, Count, Extremum, Sum};
pub use function::{AggregateFunction, FunctionError, FunctionState, state_mut, state_ref};

/// Named aggregate functions, in registration order.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, Arc<dyn AggregateFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in function.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    pub fn register_builtins(&mut self) {
        let builtins: [Arc<dyn AggregateFunction>; 7] = [
            Arc::new(Count),
            Arc::new(Sum),
            Arc::new(Average),
            Arc::new(Extremum::min()),
            Arc::new(Extremum::max()),
            Arc::new(CollectList),
            Arc::new(CollectSet),
        ];
        for function in builtins {
            let name = function.name().to_owned();
            self.register(name, function);
        }
    }

    /// Register `function` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, function: Arc<dyn AggregateFunction>) {
        let name = name.into();
        tracing::trace!(%name, "registering aggregate function");
        self.functions.insert(name, function);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn AggregateFunction>> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
