use std::sync::Arc;

use crate::registry::{AggregateFunction, FunctionRegistry};

/// Builder-wide configuration shared by every rule build.
///
/// Accumulate functions registered here take precedence over functions
/// declared by the rule's package.
#[derive(Clone, Debug)]
pub struct BuilderConfig {
    functions: FunctionRegistry,
    warn_ignored_arguments: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new().with_builtins()
    }
}

impl BuilderConfig {
    /// A configuration with no functions registered.
    pub fn new() -> Self {
        Self {
            functions: FunctionRegistry::new(),
            warn_ignored_arguments: true,
        }
    }

    /// Register the built-in functions (`count`, `sum`, `average`, ...).
    pub fn with_builtins(mut self) -> Self {
        self.functions.register_builtins();
        self
    }

    /// Register `function` under `name`.
    pub fn function(mut self, name: impl Into<String>, function: Arc<dyn AggregateFunction>) -> Self {
        self.functions.register(name, function);
        self
    }

    /// Warn when a function call passes more than one argument. Default: `true`.
    pub fn warn_ignored_arguments(mut self, value: bool) -> Self {
        self.warn_ignored_arguments = value;
        self
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn warns_ignored_arguments(&self) -> bool {
        self.warn_ignored_arguments
    }
}
